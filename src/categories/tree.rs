//! Category tree assembly and flattening.
//!
//! The admin console manages categories as flat rows; the storefront wants
//! a rooted forest. Assembly is read-only over the input and builds a
//! fresh tree every time.

use hashbrown::{HashMap, HashSet};

use crate::models::{CategoryNode, CategoryRecord};

/// Assemble flat records into a rooted, ordered forest.
///
/// Records whose `parent_id` does not resolve to any input record are
/// dropped from the output entirely, along with their descendants; they
/// are not promoted to root. Every sibling list (roots included) is sorted
/// ascending by `sort_order`; ties keep input order.
pub fn build_tree(records: &[CategoryRecord]) -> Vec<CategoryNode> {
    let known_ids: HashSet<i64> = records.iter().map(|r| r.id).collect();

    let mut roots: Vec<&CategoryRecord> = Vec::new();
    let mut children_of: HashMap<i64, Vec<&CategoryRecord>> = HashMap::new();

    for record in records {
        match record.parent_id {
            None => roots.push(record),
            Some(parent_id) if known_ids.contains(&parent_id) => {
                children_of.entry(parent_id).or_default().push(record);
            }
            // Orphan: declared parent is absent from the input set.
            Some(_) => {}
        }
    }

    let mut tree: Vec<CategoryNode> = roots
        .into_iter()
        .map(|record| assemble(record, 0, &children_of))
        .collect();
    tree.sort_by_key(|node| node.record.sort_order);
    tree
}

fn assemble(
    record: &CategoryRecord,
    depth: usize,
    children_of: &HashMap<i64, Vec<&CategoryRecord>>,
) -> CategoryNode {
    let mut children: Vec<CategoryNode> = children_of
        .get(&record.id)
        .into_iter()
        .flatten()
        .map(|child| assemble(child, depth + 1, children_of))
        .collect();
    children.sort_by_key(|node| node.record.sort_order);

    CategoryNode {
        record: record.clone(),
        depth,
        children,
    }
}

/// Depth-first pre-order flattening, preserving the sibling order produced
/// by [`build_tree`]. Used for parent-selection dropdowns.
pub fn flatten(nodes: &[CategoryNode]) -> Vec<(&CategoryRecord, usize)> {
    let mut out = Vec::new();
    for node in nodes {
        push_subtree(node, &mut out);
    }
    out
}

fn push_subtree<'a>(node: &'a CategoryNode, out: &mut Vec<(&'a CategoryRecord, usize)>) {
    out.push((&node.record, node.depth));
    for child in &node.children {
        push_subtree(child, out);
    }
}
