//! Core data models for the zone and catalog services.

pub mod category;
pub mod seller;
pub mod zone;

pub use category::{CategoryNode, CategoryRecord};
pub use seller::Seller;
pub use zone::{DeliveryZone, ZoneBoundaryError, ZoneDto};
