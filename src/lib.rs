//! Dovetail - delivery-zone geometry and lookup services for a furniture marketplace
//!
//! This library provides shared types and modules for the serve and admin binaries.

pub mod allocation;
pub mod categories;
pub mod models;
pub mod repository;
pub mod zones;

pub use models::{CategoryNode, CategoryRecord, DeliveryZone, Seller};
