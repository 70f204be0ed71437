//! Delivery zone records and their ingestion boundary.

use chrono::{DateTime, Utc};
use geo::Coord;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::zones::geometry::{close_ring, is_valid_ring, Ring};

/// A delivery zone with a validated, closed boundary ring.
#[derive(Debug, Clone, Serialize)]
pub struct DeliveryZone {
    /// Marketplace zone ID
    pub id: i64,

    /// Display name (e.g., "Brooklyn North")
    pub name: String,

    /// Inactive zones are kept for history but excluded from storefront lookups
    pub active: bool,

    /// Closed boundary ring, `(lng, lat)` order
    #[serde(serialize_with = "serialize_ring")]
    pub boundary: Ring,

    /// Last modification timestamp
    pub updated_at: DateTime<Utc>,
}

/// Zone document as it arrives from the admin console or a seed file.
///
/// Loosely shaped on purpose: coordinates come as raw `[lng, lat]` pairs
/// and the ring may be open or degenerate. Conversion into [`DeliveryZone`]
/// validates exactly once; nothing downstream re-checks optional fields.
#[derive(Debug, Clone, Deserialize)]
pub struct ZoneDto {
    pub id: i64,
    pub name: String,
    #[serde(default = "default_active")]
    pub active: bool,
    /// Boundary as `[lng, lat]` pairs (GeoJSON coordinate order)
    pub coordinates: Vec<[f64; 2]>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

fn default_active() -> bool {
    true
}

/// Rejection reasons for a zone document at the ingestion boundary.
#[derive(Debug, Error, PartialEq)]
pub enum ZoneBoundaryError {
    #[error("zone {id}: boundary ring is empty")]
    EmptyRing { id: i64 },

    #[error("zone {id}: boundary has {points} points, need at least 3 distinct vertices")]
    TooFewPoints { id: i64, points: usize },
}

impl TryFrom<ZoneDto> for DeliveryZone {
    type Error = ZoneBoundaryError;

    /// Validate-and-convert once at ingestion. The ring is closed here so
    /// every stored zone satisfies `is_valid_ring`.
    fn try_from(dto: ZoneDto) -> Result<Self, Self::Error> {
        if dto.coordinates.is_empty() {
            return Err(ZoneBoundaryError::EmptyRing { id: dto.id });
        }

        let ring: Ring = dto
            .coordinates
            .iter()
            .map(|&[x, y]| Coord { x, y })
            .collect();

        let ring = close_ring(ring);
        if !is_valid_ring(&ring) {
            return Err(ZoneBoundaryError::TooFewPoints {
                id: dto.id,
                points: dto.coordinates.len(),
            });
        }

        Ok(DeliveryZone {
            id: dto.id,
            name: dto.name,
            active: dto.active,
            boundary: ring,
            updated_at: dto.updated_at.unwrap_or_else(Utc::now),
        })
    }
}

fn serialize_ring<S>(ring: &Ring, serializer: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    serializer.collect_seq(ring.iter().map(|c| [c.x, c.y]))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dto(coordinates: Vec<[f64; 2]>) -> ZoneDto {
        ZoneDto {
            id: 7,
            name: "Test Zone".to_string(),
            active: true,
            coordinates,
            updated_at: None,
        }
    }

    #[test]
    fn open_ring_is_closed_on_ingestion() {
        let zone =
            DeliveryZone::try_from(dto(vec![[0.0, 0.0], [4.0, 0.0], [4.0, 4.0], [0.0, 4.0]]))
                .unwrap();
        assert_eq!(zone.boundary.len(), 5);
        assert_eq!(zone.boundary.first(), zone.boundary.last());
        assert!(is_valid_ring(&zone.boundary));
    }

    #[test]
    fn already_closed_ring_kept_as_is() {
        let zone = DeliveryZone::try_from(dto(vec![
            [0.0, 0.0],
            [4.0, 0.0],
            [4.0, 4.0],
            [0.0, 0.0],
        ]))
        .unwrap();
        assert_eq!(zone.boundary.len(), 4);
    }

    #[test]
    fn empty_ring_rejected() {
        let err = DeliveryZone::try_from(dto(vec![])).unwrap_err();
        assert_eq!(err, ZoneBoundaryError::EmptyRing { id: 7 });
    }

    #[test]
    fn two_point_ring_rejected() {
        let err = DeliveryZone::try_from(dto(vec![[0.0, 0.0], [1.0, 1.0]])).unwrap_err();
        assert_eq!(err, ZoneBoundaryError::TooFewPoints { id: 7, points: 2 });
    }

    #[test]
    fn dto_defaults_active_true() {
        let parsed: ZoneDto = serde_json::from_str(
            r#"{"id": 3, "name": "Queens", "coordinates": [[0,0],[1,0],[1,1],[0,0]]}"#,
        )
        .unwrap();
        assert!(parsed.active);
    }
}
