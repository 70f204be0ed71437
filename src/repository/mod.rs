//! Repository abstraction over zone and category storage.
//!
//! The admin console's original backend kept zones and categories in
//! global mutable arrays behind a mock API. Here the same operations sit
//! behind traits so business logic runs identically against the in-memory
//! implementation (tests, demos) or a real backend.

mod memory;

use thiserror::Error;

use crate::models::{CategoryRecord, DeliveryZone};

pub use memory::{InMemoryCategoryRepository, InMemoryZoneRepository};

/// Result type for repository operations
pub type RepoResult<T> = Result<T, RepositoryError>;

/// Errors surfaced by repository implementations.
#[derive(Debug, Error, PartialEq)]
pub enum RepositoryError {
    #[error("record {id} not found")]
    NotFound { id: i64 },

    #[error("record {id} already exists")]
    DuplicateId { id: i64 },
}

/// Zone storage. Implementations must preserve insertion order in `list`
/// so downstream lookup results stay deterministic.
pub trait ZoneRepository: Send + Sync {
    fn list(&self) -> Vec<DeliveryZone>;

    fn get(&self, id: i64) -> RepoResult<DeliveryZone>;

    fn insert(&self, zone: DeliveryZone) -> RepoResult<()>;

    /// Replace an existing zone wholesale. The caller supplies a fully
    /// validated zone; partial updates happen at the DTO boundary.
    fn update(&self, zone: DeliveryZone) -> RepoResult<()>;

    fn delete(&self, id: i64) -> RepoResult<DeliveryZone>;
}

/// Category storage, insertion-ordered like [`ZoneRepository`].
pub trait CategoryRepository: Send + Sync {
    fn list(&self) -> Vec<CategoryRecord>;

    fn get(&self, id: i64) -> RepoResult<CategoryRecord>;

    fn insert(&self, record: CategoryRecord) -> RepoResult<()>;

    fn update(&self, record: CategoryRecord) -> RepoResult<()>;

    fn delete(&self, id: i64) -> RepoResult<CategoryRecord>;
}
