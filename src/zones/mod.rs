//! Delivery-zone geometry and point-in-zone lookup.
//!
//! Hand-rolled ring math (validation, spherical area, ray casting) plus an
//! R-tree spatial index for lookups across the full zone set.

pub mod geometry;
mod index;
mod service;

pub use index::ZoneSpatialIndex;
pub use service::ZoneLocator;
