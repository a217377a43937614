//! Actions chosen by the decision-maker and how they move the navigator.

use serde::{Deserialize, Serialize};

use crate::core::error::{DecisionError, TreeError};
use crate::core::navigator::Navigator;
use crate::tree::NodeId;

/// The three things the decision-maker may ask for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Append a reasoning step under the current node.
    Extend { reasoning: String, brief: String },
    /// Move the current pointer to an existing node.
    Jump { node_id: NodeId },
    /// Stop the loop.
    Finish,
}

/// Discriminant of the decision-maker's structured output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActionKind {
    Extend,
    Jump,
    Finish,
}

/// Flat structured output produced by the decision-maker.
///
/// Every key is always present; fields that do not apply to `action` are null.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawDecision {
    pub action: ActionKind,
    pub reasoning: Option<String>,
    pub brief: Option<String>,
    pub node_id: Option<i64>,
}

impl TryFrom<RawDecision> for Action {
    type Error = DecisionError;

    fn try_from(raw: RawDecision) -> Result<Self, Self::Error> {
        match raw.action {
            ActionKind::Extend => {
                let reasoning = raw
                    .reasoning
                    .ok_or_else(|| DecisionError::invalid("extend without reasoning"))?;
                let brief = raw
                    .brief
                    .ok_or_else(|| DecisionError::invalid("extend without brief"))?;
                Ok(Action::Extend { reasoning, brief })
            }
            ActionKind::Jump => {
                let raw_id = raw
                    .node_id
                    .ok_or_else(|| DecisionError::invalid("jump without node_id"))?;
                let node_id = NodeId::try_from(raw_id)
                    .map_err(|_| DecisionError::invalid(format!("node_id {raw_id} out of range")))?;
                Ok(Action::Jump { node_id })
            }
            ActionKind::Finish => Ok(Action::Finish),
        }
    }
}

impl From<&Action> for RawDecision {
    fn from(action: &Action) -> Self {
        match action {
            Action::Extend { reasoning, brief } => Self {
                action: ActionKind::Extend,
                reasoning: Some(reasoning.clone()),
                brief: Some(brief.clone()),
                node_id: None,
            },
            Action::Jump { node_id } => Self {
                action: ActionKind::Jump,
                reasoning: None,
                brief: None,
                node_id: Some(i64::from(*node_id)),
            },
            Action::Finish => Self {
                action: ActionKind::Finish,
                reasoning: None,
                brief: None,
                node_id: None,
            },
        }
    }
}

/// State change produced by applying an [`Action`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transition {
    Extended {
        node_id: NodeId,
        parent_id: NodeId,
        reasoning: String,
        brief: String,
    },
    Jumped {
        from: NodeId,
        to: NodeId,
    },
    Finished {
        current_node_id: NodeId,
        size: u32,
    },
}

/// Apply `action` to the navigator. Only `Extend` can fail (stale current node).
pub fn apply_action(navigator: &mut Navigator, action: Action) -> Result<Transition, TreeError> {
    let previous = navigator.current_node_id();
    match action {
        Action::Extend { reasoning, brief } => {
            let node_id = navigator.extend(reasoning.clone(), brief.clone())?.id;
            Ok(Transition::Extended {
                node_id,
                parent_id: previous,
                reasoning,
                brief,
            })
        }
        Action::Jump { node_id } => {
            navigator.jump(node_id);
            Ok(Transition::Jumped {
                from: previous,
                to: node_id,
            })
        }
        Action::Finish => Ok(Transition::Finished {
            current_node_id: previous,
            size: navigator.size(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(action: ActionKind) -> RawDecision {
        RawDecision {
            action,
            reasoning: None,
            brief: None,
            node_id: None,
        }
    }

    #[test]
    fn extend_requires_reasoning_and_brief() {
        let mut decision = raw(ActionKind::Extend);
        decision.brief = Some("b".to_string());
        let err = Action::try_from(decision).unwrap_err();
        assert_eq!(err, DecisionError::invalid("extend without reasoning"));

        let mut decision = raw(ActionKind::Extend);
        decision.reasoning = Some("r".to_string());
        let err = Action::try_from(decision).unwrap_err();
        assert_eq!(err, DecisionError::invalid("extend without brief"));
    }

    #[test]
    fn jump_requires_non_negative_node_id() {
        let err = Action::try_from(raw(ActionKind::Jump)).unwrap_err();
        assert_eq!(err, DecisionError::invalid("jump without node_id"));

        let mut decision = raw(ActionKind::Jump);
        decision.node_id = Some(-1);
        assert!(Action::try_from(decision).is_err());

        let mut decision = raw(ActionKind::Jump);
        decision.node_id = Some(4);
        assert_eq!(
            Action::try_from(decision).expect("jump"),
            Action::Jump { node_id: 4 }
        );
    }

    #[test]
    fn node_id_beyond_id_range_is_invalid() {
        let mut decision = raw(ActionKind::Jump);
        decision.node_id = Some(i64::from(NodeId::MAX) + 1);
        let err = Action::try_from(decision).unwrap_err();
        assert_eq!(
            err,
            DecisionError::invalid("node_id 4294967296 out of range")
        );

        let mut decision = raw(ActionKind::Jump);
        decision.node_id = Some(i64::from(NodeId::MAX));
        assert_eq!(
            Action::try_from(decision).expect("jump"),
            Action::Jump {
                node_id: NodeId::MAX
            }
        );
    }

    #[test]
    fn finish_ignores_other_fields() {
        let mut decision = raw(ActionKind::Finish);
        decision.reasoning = Some("ignored".to_string());
        assert_eq!(Action::try_from(decision).expect("finish"), Action::Finish);
    }

    #[test]
    fn raw_decision_parses_lowercase_action() {
        let json = r#"{"action":"jump","reasoning":null,"brief":null,"node_id":2}"#;
        let decision: RawDecision = serde_json::from_str(json).expect("parse");
        assert_eq!(decision.action, ActionKind::Jump);
        assert_eq!(decision.node_id, Some(2));
    }

    #[test]
    fn apply_extend_records_parent() {
        let mut nav = Navigator::new();
        let transition = apply_action(
            &mut nav,
            Action::Extend {
                reasoning: "A".to_string(),
                brief: "a".to_string(),
            },
        )
        .expect("apply");
        assert_eq!(
            transition,
            Transition::Extended {
                node_id: 1,
                parent_id: 0,
                reasoning: "A".to_string(),
                brief: "a".to_string(),
            }
        );
    }

    #[test]
    fn apply_jump_then_finish() {
        let mut nav = Navigator::new();
        nav.extend("A", "a").expect("extend");

        let jumped = apply_action(&mut nav, Action::Jump { node_id: 0 }).expect("jump");
        assert_eq!(jumped, Transition::Jumped { from: 1, to: 0 });

        let finished = apply_action(&mut nav, Action::Finish).expect("finish");
        assert_eq!(
            finished,
            Transition::Finished {
                current_node_id: 0,
                size: 1
            }
        );
    }

    #[test]
    fn apply_extend_on_stale_pointer_is_not_found() {
        let mut nav = Navigator::new();
        apply_action(&mut nav, Action::Jump { node_id: 99 }).expect("jump");
        let err = apply_action(
            &mut nav,
            Action::Extend {
                reasoning: "A".to_string(),
                brief: "a".to_string(),
            },
        )
        .unwrap_err();
        assert_eq!(err, TreeError::NotFound(99));
    }
}
