//! Spatial index for fast zone containment lookups.

use std::sync::Arc;

use geo::{BoundingRect, LineString};
use rstar::{RTree, RTreeObject, AABB};
use tracing::info;

use super::geometry;
use crate::models::DeliveryZone;

/// Wrapper for R-tree indexing of delivery zones.
///
/// Keeps the zone's position in the input sequence so lookup results come
/// back in input order even though the R-tree itself has none.
#[derive(Clone)]
pub struct IndexedZone {
    pub zone: Arc<DeliveryZone>,
    envelope: AABB<[f64; 2]>,
    seq: usize,
}

impl RTreeObject for IndexedZone {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        self.envelope
    }
}

impl IndexedZone {
    /// Returns `None` for zones whose boundary cannot contain any point
    /// (invalid or empty rings); those are skipped at build time.
    pub fn new(zone: DeliveryZone, seq: usize) -> Option<Self> {
        if !geometry::is_valid_ring(&zone.boundary) {
            return None;
        }
        let rect = LineString::new(zone.boundary.clone()).bounding_rect()?;
        Some(Self {
            zone: Arc::new(zone),
            envelope: AABB::from_corners(
                [rect.min().x, rect.min().y],
                [rect.max().x, rect.max().y],
            ),
            seq,
        })
    }
}

/// Spatial index over delivery zones using an R-tree.
pub struct ZoneSpatialIndex {
    tree: RTree<IndexedZone>,
}

impl ZoneSpatialIndex {
    /// Build the index from a zone collection. Zones with invalid
    /// boundaries are dropped here; they can never match a lookup.
    pub fn build(zones: Vec<DeliveryZone>) -> Self {
        let total = zones.len();

        let indexed: Vec<IndexedZone> = zones
            .into_iter()
            .enumerate()
            .filter_map(|(seq, zone)| IndexedZone::new(zone, seq))
            .collect();

        if indexed.len() < total {
            info!(
                "Skipped {} zones with degenerate boundaries",
                total - indexed.len()
            );
        }

        let tree = RTree::bulk_load(indexed);
        info!("Spatial index built with {} zones", tree.size());

        Self { tree }
    }

    /// Find all zones containing a point, in input order.
    ///
    /// Takes `(lat, lng)` like [`geometry::contains`], the reverse of the
    /// `(lng, lat)` ring storage order.
    ///
    /// Zones may overlap; every match is returned. Candidates are narrowed
    /// by envelope intersection, then confirmed with the exact ray cast.
    pub fn lookup(&self, lat: f64, lng: f64) -> Vec<Arc<DeliveryZone>> {
        let query_envelope = AABB::from_point([lng, lat]);

        let mut hits: Vec<&IndexedZone> = self
            .tree
            .locate_in_envelope_intersecting(&query_envelope)
            .filter(|iz| geometry::contains(&iz.zone.boundary, lat, lng))
            .collect();
        hits.sort_by_key(|iz| iz.seq);

        hits.into_iter().map(|iz| Arc::clone(&iz.zone)).collect()
    }

    /// Get total number of indexed zones
    pub fn len(&self) -> usize {
        self.tree.size()
    }

    pub fn is_empty(&self) -> bool {
        self.tree.size() == 0
    }

    /// Iterate over all indexed zones
    pub fn zones(&self) -> impl Iterator<Item = &Arc<DeliveryZone>> {
        self.tree.iter().map(|iz| &iz.zone)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use geo::Coord;

    fn zone(id: i64, ring: &[(f64, f64)]) -> DeliveryZone {
        DeliveryZone {
            id,
            name: format!("Zone {id}"),
            active: true,
            boundary: ring.iter().map(|&(x, y)| Coord { x, y }).collect(),
            updated_at: Utc::now(),
        }
    }

    const SQUARE: &[(f64, f64)] = &[(0.0, 0.0), (0.0, 10.0), (10.0, 10.0), (10.0, 0.0), (0.0, 0.0)];
    // Overlaps SQUARE on [5,10]x[5,10]
    const OFFSET: &[(f64, f64)] =
        &[(5.0, 5.0), (5.0, 15.0), (15.0, 15.0), (15.0, 5.0), (5.0, 5.0)];

    #[test]
    fn lookup_single_zone() {
        let index = ZoneSpatialIndex::build(vec![zone(1, SQUARE)]);
        let hits = index.lookup(5.0, 5.0);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id, 1);
        assert!(index.lookup(20.0, 20.0).is_empty());
    }

    #[test]
    fn overlapping_zones_returned_in_input_order() {
        let index = ZoneSpatialIndex::build(vec![zone(2, OFFSET), zone(1, SQUARE)]);
        let hits = index.lookup(7.0, 7.0);
        let ids: Vec<i64> = hits.iter().map(|z| z.id).collect();
        assert_eq!(ids, vec![2, 1]);
    }

    #[test]
    fn degenerate_zone_skipped_at_build() {
        let open = &[(0.0, 0.0), (10.0, 0.0), (10.0, 10.0)];
        let index = ZoneSpatialIndex::build(vec![zone(1, SQUARE), zone(2, open)]);
        assert_eq!(index.len(), 1);
    }

    #[test]
    fn empty_index_matches_nothing() {
        let index = ZoneSpatialIndex::build(vec![]);
        assert!(index.is_empty());
        assert!(index.lookup(0.0, 0.0).is_empty());
    }
}
