//! Zone locator service for "which zones cover this point" queries.

use std::sync::Arc;

use tracing::debug;

use super::{geometry, ZoneSpatialIndex};
use crate::models::DeliveryZone;

/// Point-in-zone lookup service.
///
/// Wraps a [`ZoneSpatialIndex`]; rebuilt whole whenever the zone set
/// changes. Holds no interior mutability.
pub struct ZoneLocator {
    index: ZoneSpatialIndex,
}

impl ZoneLocator {
    pub fn new(index: ZoneSpatialIndex) -> Self {
        Self { index }
    }

    /// All zones containing the point, in input order.
    /// Coordinate order is `(lat, lng)`, see [`geometry::contains`].
    pub fn locate(&self, lat: f64, lng: f64) -> Vec<Arc<DeliveryZone>> {
        let zones = self.index.lookup(lat, lng);
        debug!("Locate ({}, {}): {} zones match", lat, lng, zones.len());
        zones
    }

    /// Like [`locate`](Self::locate), restricted to active zones. This is
    /// what the storefront uses; inactive zones stay visible to admins.
    pub fn locate_active(&self, lat: f64, lng: f64) -> Vec<Arc<DeliveryZone>> {
        let mut zones = self.locate(lat, lng);
        zones.retain(|z| z.active);
        zones
    }

    /// Approximate area of a zone's boundary in square kilometers.
    pub fn zone_area_sq_km(zone: &DeliveryZone) -> f64 {
        geometry::area_sq_km(&zone.boundary)
    }

    /// Get the spatial index (for stats/debugging)
    pub fn index(&self) -> &ZoneSpatialIndex {
        &self.index
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use geo::Coord;

    fn zone(id: i64, active: bool) -> DeliveryZone {
        let ring = [(0.0, 0.0), (0.0, 10.0), (10.0, 10.0), (10.0, 0.0), (0.0, 0.0)];
        DeliveryZone {
            id,
            name: format!("Zone {id}"),
            active,
            boundary: ring.iter().map(|&(x, y)| Coord { x, y }).collect(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn empty_index_locates_nothing() {
        let locator = ZoneLocator::new(ZoneSpatialIndex::build(vec![]));
        assert!(locator.locate(5.0, 5.0).is_empty());
    }

    #[test]
    fn locate_active_filters_inactive_zones() {
        let locator =
            ZoneLocator::new(ZoneSpatialIndex::build(vec![zone(1, true), zone(2, false)]));

        assert_eq!(locator.locate(5.0, 5.0).len(), 2);

        let active = locator.locate_active(5.0, 5.0);
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].id, 1);
    }

    #[test]
    fn zone_area_matches_geometry() {
        let z = zone(1, true);
        assert!(ZoneLocator::zone_area_sq_km(&z) > 0.0);
    }
}
