//! Partially-redacted views of the reasoning tree.
//!
//! A view mirrors the tree shape exactly. Every node keeps its id and brief;
//! `reasoning` is only kept for nodes on the active path.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::tree::{Node, NodeId, ROOT_ID};

/// One node of a rendered view.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct RenderedNode {
    pub id: NodeId,
    pub brief: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reasoning: Option<String>,
    pub children: Vec<RenderedNode>,
}

impl RenderedNode {
    /// All ids in the view, depth-first in insertion order.
    pub fn ids(&self) -> Vec<NodeId> {
        let mut ids = Vec::new();
        collect_ids(self, &mut ids);
        ids
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.id == id || self.children.iter().any(|child| child.contains(id))
    }

    /// Ids of the nodes that carry `reasoning`.
    pub fn detailed_ids(&self) -> HashSet<NodeId> {
        let mut ids = HashSet::new();
        collect_detailed(self, &mut ids);
        ids
    }
}

fn collect_ids(node: &RenderedNode, ids: &mut Vec<NodeId>) {
    ids.push(node.id);
    for child in &node.children {
        collect_ids(child, ids);
    }
}

fn collect_detailed(node: &RenderedNode, ids: &mut HashSet<NodeId>) {
    if node.reasoning.is_some() {
        ids.insert(node.id);
    }
    for child in &node.children {
        collect_detailed(child, ids);
    }
}

/// Render `node` and its subtree, keeping `reasoning` only for ids in `active_path`.
pub fn render_node(node: &Node, active_path: &HashSet<NodeId>) -> RenderedNode {
    RenderedNode {
        id: node.id,
        brief: node.brief.clone(),
        reasoning: active_path
            .contains(&node.id)
            .then(|| node.reasoning.clone()),
        children: node
            .children
            .iter()
            .map(|child| render_node(child, active_path))
            .collect(),
    }
}

/// Plain-text outline of a view: one line per node, indented by depth.
///
/// Nodes carrying reasoning are marked with `*`.
pub fn outline(view: &RenderedNode) -> String {
    let mut lines = Vec::new();
    outline_inner(view, 0, &mut lines);
    lines.join("\n")
}

fn outline_inner(node: &RenderedNode, depth: usize, lines: &mut Vec<String>) {
    let indent = "  ".repeat(depth);
    let marker = if node.reasoning.is_some() { "*" } else { " " };
    let brief = if node.id == ROOT_ID {
        "(root)"
    } else {
        node.brief.as_str()
    };
    lines.push(format!("{indent}-{marker}{}: {brief}", node.id));
    for child in &node.children {
        outline_inner(child, depth + 1, lines);
    }
}
