//! Typed failures raised by the reasoning-tree core.
//!
//! Orchestration code wraps these in `anyhow::Error`; callers that need to
//! react to a specific failure recover it with `downcast_ref`.

use thiserror::Error;

use crate::tree::NodeId;

/// Failure to resolve a node id against the tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TreeError {
    #[error("node {0} not found")]
    NotFound(NodeId),
}

/// Failure to interpret the decision-maker's output as an action.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecisionError {
    #[error("invalid action: {0}")]
    InvalidAction(String),
}

impl DecisionError {
    pub fn invalid(msg: impl Into<String>) -> Self {
        Self::InvalidAction(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_names_the_id() {
        assert_eq!(TreeError::NotFound(99).to_string(), "node 99 not found");
    }

    #[test]
    fn invalid_action_carries_detail() {
        let err = DecisionError::invalid("jump without node_id");
        assert_eq!(err.to_string(), "invalid action: jump without node_id");
    }
}
