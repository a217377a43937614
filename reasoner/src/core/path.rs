//! Depth-first lookups over the reasoning tree.
//!
//! Every lookup starts at the given root and visits children in insertion
//! order; ids are unique so the first match is the only match.

use crate::core::error::TreeError;
use crate::tree::{Node, NodeId};

/// Find the node carrying `target_id`.
pub fn find_node(root: &Node, target_id: NodeId) -> Result<&Node, TreeError> {
    find_node_inner(root, target_id).ok_or(TreeError::NotFound(target_id))
}

fn find_node_inner(node: &Node, target_id: NodeId) -> Option<&Node> {
    if node.id == target_id {
        return Some(node);
    }
    node.children
        .iter()
        .find_map(|child| find_node_inner(child, target_id))
}

/// Mutable variant of [`find_node`], used to append children.
pub fn find_node_mut(node: &mut Node, target_id: NodeId) -> Option<&mut Node> {
    if node.id == target_id {
        return Some(node);
    }
    for child in &mut node.children {
        if let Some(found) = find_node_mut(child, target_id) {
            return Some(found);
        }
    }
    None
}

/// Return the ids from `root` to `target_id`, both inclusive.
pub fn path_to_node(root: &Node, target_id: NodeId) -> Option<Vec<NodeId>> {
    let mut path = Vec::new();
    if path_to_node_inner(root, target_id, &mut path) {
        return Some(path);
    }
    None
}

fn path_to_node_inner(node: &Node, target_id: NodeId, path: &mut Vec<NodeId>) -> bool {
    path.push(node.id);
    if node.id == target_id {
        return true;
    }
    for child in &node.children {
        if path_to_node_inner(child, target_id, path) {
            return true;
        }
    }
    path.pop();
    false
}
