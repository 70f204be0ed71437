//! Seller records referenced by the allocation workflow.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A marketplace seller eligible for zone allocation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Seller {
    pub id: Uuid,
    pub name: String,
}
