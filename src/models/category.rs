//! Category records and tree nodes for the storefront catalog.

use serde::{Deserialize, Serialize};

/// Flat category row as managed by the admin console.
///
/// `parent_id == None` marks a root. Siblings are ordered ascending by
/// `sort_order`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryRecord {
    pub id: i64,

    #[serde(default)]
    pub parent_id: Option<i64>,

    pub name: String,

    /// URL slug (e.g., "sofas-sectionals")
    #[serde(default)]
    pub slug: String,

    #[serde(default)]
    pub sort_order: i32,

    #[serde(default = "default_active")]
    pub active: bool,
}

fn default_active() -> bool {
    true
}

/// A category with its nested children, produced by the tree builder.
///
/// Built fresh on every assembly; rebuilding is the only update operation.
#[derive(Debug, Clone, Serialize)]
pub struct CategoryNode {
    #[serde(flatten)]
    pub record: CategoryRecord,

    /// Distance from the root (roots are 0)
    pub depth: usize,

    pub children: Vec<CategoryNode>,
}

impl CategoryNode {
    pub fn new(record: CategoryRecord) -> Self {
        Self {
            record,
            depth: 0,
            children: Vec::new(),
        }
    }
}
