//! The reasoning-tree state machine.
//!
//! A [`Navigator`] owns the tree, a count of non-root nodes and a pointer to
//! the current node. Its state is `(size, current_node_id)`, starting at
//! `(0, 0)`:
//!
//! - [`Navigator::extend`] moves `(n, c)` to `(n + 1, n + 1)`.
//! - [`Navigator::jump`] moves `(n, c)` to `(n, target)` without checking `target`.
//!
//! A dangling pointer left by `jump` surfaces as [`TreeError::NotFound`] on the
//! next `extend`.

use std::collections::HashSet;

use tracing::{debug, warn};

use crate::core::error::TreeError;
use crate::core::path::{find_node, find_node_mut, path_to_node};
use crate::core::render::{RenderedNode, render_node};
use crate::tree::{Node, NodeId, ROOT_ID, root_node};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Navigator {
    root: Node,
    size: u32,
    current_node_id: NodeId,
}

impl Default for Navigator {
    fn default() -> Self {
        Self::new()
    }
}

impl Navigator {
    pub fn new() -> Self {
        Self {
            root: root_node(),
            size: 0,
            current_node_id: ROOT_ID,
        }
    }

    pub fn root(&self) -> &Node {
        &self.root
    }

    /// Number of nodes created by `extend` (the root is not counted).
    pub fn size(&self) -> u32 {
        self.size
    }

    pub fn current_node_id(&self) -> NodeId {
        self.current_node_id
    }

    pub fn find_node(&self, id: NodeId) -> Result<&Node, TreeError> {
        find_node(&self.root, id)
    }

    pub fn path_to(&self, id: NodeId) -> Option<Vec<NodeId>> {
        path_to_node(&self.root, id)
    }

    /// Ids from the root to the current node, if the current node exists.
    pub fn active_path(&self) -> Option<Vec<NodeId>> {
        self.path_to(self.current_node_id)
    }

    /// Append a new node under the current node and make it current.
    pub fn extend(
        &mut self,
        reasoning: impl Into<String>,
        brief: impl Into<String>,
    ) -> Result<&Node, TreeError> {
        let parent_id = self.current_node_id;
        let parent =
            find_node_mut(&mut self.root, parent_id).ok_or(TreeError::NotFound(parent_id))?;

        let id = self.size + 1;
        parent.children.push(Node::new(id, reasoning, brief));
        self.size = id;
        self.current_node_id = id;
        debug!(node_id = id, parent_id, size = self.size, "extended reasoning");

        parent.children.last().ok_or(TreeError::NotFound(id))
    }

    /// Point the navigator at `target_id`. Existence is checked on next use.
    pub fn jump(&mut self, target_id: NodeId) {
        debug!(from = self.current_node_id, target_id, "jumped");
        self.current_node_id = target_id;
    }

    /// Render the whole tree with reasoning kept only along the active path.
    ///
    /// If the current node does not resolve, only the root is treated as active.
    pub fn render(&self) -> RenderedNode {
        let active: HashSet<NodeId> = match self.active_path() {
            Some(path) => path.into_iter().collect(),
            None => {
                warn!(
                    current_node_id = self.current_node_id,
                    "current node not in tree; rendering with root as the only active node"
                );
                HashSet::from([ROOT_ID])
            }
        };
        render_node(&self.root, &active)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_at_root_with_zero_size() {
        let nav = Navigator::new();
        assert_eq!(nav.size(), 0);
        assert_eq!(nav.current_node_id(), 0);
        assert!(nav.root().is_leaf());
        assert_eq!(nav.root().reasoning, "");
        assert_eq!(nav.root().brief, "");
    }

    #[test]
    fn extend_assigns_sequential_ids() {
        let mut nav = Navigator::new();
        for k in 1..=5u32 {
            let node = nav
                .extend(format!("r{k}"), format!("b{k}"))
                .expect("extend")
                .clone();
            assert_eq!(node.id, k);
            assert!(node.is_leaf());
            assert_eq!(node.brief, format!("b{k}"));
            assert_eq!(nav.size(), k);
            assert_eq!(nav.current_node_id(), k);
        }
        assert_eq!(nav.path_to(5), Some(vec![0, 1, 2, 3, 4, 5]));
    }

    #[test]
    fn extend_appends_as_last_child_of_current() {
        let mut nav = Navigator::new();
        nav.extend("A", "a").expect("extend");
        nav.jump(0);
        nav.extend("B", "b").expect("extend");
        nav.jump(0);
        let id = nav.extend("C", "c").expect("extend").id;
        assert_eq!(id, 3);
        assert_eq!(nav.root().child_ids(), vec![1, 2, 3]);
    }

    #[test]
    fn extend_ids_ignore_parent_child_count() {
        let mut nav = Navigator::new();
        nav.extend("A", "a").expect("extend");
        nav.extend("B", "b").expect("extend");
        nav.jump(1);
        let id = nav.extend("C", "c").expect("extend").id;
        assert_eq!(id, 3);
        assert_eq!(nav.find_node(1).expect("node 1").child_ids(), vec![2, 3]);
    }

    #[test]
    fn extend_returns_the_node_stored_in_the_tree() {
        let mut nav = Navigator::new();
        nav.extend("A", "a").expect("extend");
        let returned = nav.extend("B", "b").expect("extend").clone();
        assert_eq!(&returned, nav.find_node(2).expect("node 2"));
        assert_eq!(returned.reasoning, "B");
    }

    #[test]
    fn jump_does_not_check_existence() {
        let mut nav = Navigator::new();
        nav.jump(99);
        assert_eq!(nav.current_node_id(), 99);
        assert_eq!(nav.size(), 0);
    }

    #[test]
    fn extend_after_stale_jump_fails_without_mutation() {
        let mut nav = Navigator::new();
        nav.extend("A", "a").expect("extend");
        nav.extend("B", "b").expect("extend");
        nav.jump(99);
        let before = nav.clone();

        let err = nav.extend("C", "c").unwrap_err();
        assert_eq!(err, TreeError::NotFound(99));
        assert_eq!(nav, before);
    }

    #[test]
    fn render_falls_back_to_root_when_current_is_stale() {
        let mut nav = Navigator::new();
        nav.extend("A", "a").expect("extend");
        nav.jump(7);
        let view = nav.render();
        assert_eq!(view.detailed_ids(), HashSet::from([0]));
        assert_eq!(view.ids(), vec![0, 1]);
    }

    #[test]
    fn render_is_idempotent() {
        let mut nav = Navigator::new();
        nav.extend("A", "a").expect("extend");
        nav.extend("B", "b").expect("extend");
        nav.jump(1);
        assert_eq!(nav.render(), nav.render());
    }

    #[test]
    fn render_follows_jump_target() {
        let mut nav = Navigator::new();
        nav.extend("A", "a").expect("extend");
        nav.extend("B", "b").expect("extend");
        nav.jump(0);
        nav.extend("C", "c").expect("extend");
        nav.jump(1);

        let view = nav.render();
        assert_eq!(view.detailed_ids(), HashSet::from([0, 1]));
    }

    #[test]
    fn scenario_branches_from_root() {
        let mut nav = Navigator::new();
        nav.extend("A", "a").expect("extend");
        nav.extend("B", "b").expect("extend");
        nav.jump(0);
        nav.extend("C", "c").expect("extend");
        assert_eq!(nav.current_node_id(), 3);

        let view = nav.render();
        let child_ids: Vec<NodeId> = view.children.iter().map(|child| child.id).collect();
        assert_eq!(child_ids, vec![1, 3]);
        assert_eq!(view.reasoning.as_deref(), Some(""));

        let node1 = &view.children[0];
        assert_eq!(node1.brief, "a");
        assert_eq!(node1.reasoning, None);
        assert_eq!(node1.children[0].id, 2);
        assert_eq!(node1.children[0].reasoning, None);

        let node3 = &view.children[1];
        assert_eq!(node3.brief, "c");
        assert_eq!(node3.reasoning.as_deref(), Some("C"));
    }
}
