//! Test-only helpers for building trees and scripting the decision-maker.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::fs;

use anyhow::{Result, anyhow};

use crate::core::action::{Action, RawDecision};
use crate::core::navigator::Navigator;
use crate::io::decision::{DecisionMaker, DecisionRequest};
use crate::tree::{Node, NodeId};

/// Create a node with deterministic `r<id>` reasoning and `b<id>` brief.
pub fn node(id: NodeId) -> Node {
    Node::new(id, format!("r{id}"), format!("b{id}"))
}

/// Create a node with children using deterministic defaults.
pub fn node_with_children(id: NodeId, children: Vec<Node>) -> Node {
    Node {
        children,
        ..node(id)
    }
}

/// Shorthand for an extend action.
pub fn extend(reasoning: &str, brief: &str) -> Action {
    Action::Extend {
        reasoning: reasoning.to_string(),
        brief: brief.to_string(),
    }
}

/// Navigator in the state of the branching scenario:
/// extend A, extend B, jump 0, extend C (current = 3).
pub fn branching_navigator() -> Navigator {
    let mut nav = Navigator::new();
    for step in [
        extend("A", "a"),
        extend("B", "b"),
        Action::Jump { node_id: 0 },
        extend("C", "c"),
    ] {
        crate::core::action::apply_action(&mut nav, step).expect("scenario step");
    }
    nav
}

/// One scripted response: either a well-formed action or raw JSON text.
#[derive(Debug, Clone)]
pub enum ScriptedOutput {
    Action(Action),
    Raw(String),
    /// Write nothing, simulating a decision-maker that produced no output.
    Missing,
}

/// Decision-maker that replays queued outputs and records every prompt.
#[derive(Debug, Default)]
pub struct ScriptedDecisionMaker {
    queue: RefCell<VecDeque<ScriptedOutput>>,
    prompts: RefCell<Vec<String>>,
}

impl ScriptedDecisionMaker {
    pub fn new(outputs: Vec<ScriptedOutput>) -> Self {
        Self {
            queue: RefCell::new(outputs.into()),
            prompts: RefCell::new(Vec::new()),
        }
    }

    pub fn from_actions(actions: Vec<Action>) -> Self {
        Self::new(actions.into_iter().map(ScriptedOutput::Action).collect())
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.borrow().clone()
    }

    pub fn remaining(&self) -> usize {
        self.queue.borrow().len()
    }
}

impl DecisionMaker for ScriptedDecisionMaker {
    fn decide(&self, request: &DecisionRequest) -> Result<()> {
        self.prompts.borrow_mut().push(request.prompt.clone());
        let next = self
            .queue
            .borrow_mut()
            .pop_front()
            .ok_or_else(|| anyhow!("scripted decision-maker exhausted"))?;
        let body = match next {
            ScriptedOutput::Action(action) => {
                let mut buf = serde_json::to_string_pretty(&RawDecision::from(&action))?;
                buf.push('\n');
                buf
            }
            ScriptedOutput::Raw(text) => text,
            ScriptedOutput::Missing => return Ok(()),
        };
        if let Some(parent) = request.output_path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&request.output_path, body)?;
        Ok(())
    }
}
