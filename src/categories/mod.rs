//! Category catalog: tree assembly from flat admin records.

mod tree;

pub use tree::{build_tree, flatten};
