use serde::{Deserialize, Serialize};

/// Identifier of a reasoning step, assigned in creation order (root is `0`).
pub type NodeId = u32;

/// Id of the root node every tree starts with.
pub const ROOT_ID: NodeId = 0;

/// A single reasoning step. Each node is owned by its parent; only `children`
/// ever changes after creation, and only by appending.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Node {
    pub id: NodeId,
    pub reasoning: String,
    pub brief: String,
    pub children: Vec<Node>,
}

impl Node {
    pub fn new(id: NodeId, reasoning: impl Into<String>, brief: impl Into<String>) -> Self {
        Self {
            id,
            reasoning: reasoning.into(),
            brief: brief.into(),
            children: Vec::new(),
        }
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Ids of the direct children, in insertion order.
    pub fn child_ids(&self) -> Vec<NodeId> {
        self.children.iter().map(|child| child.id).collect()
    }
}

/// The root node: id `0`, empty reasoning and brief.
pub fn root_node() -> Node {
    Node::new(ROOT_ID, "", "")
}
