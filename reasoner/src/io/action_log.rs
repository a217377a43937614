//! Per-session action log (`<session dir>/actions.log`).
//!
//! This is a product artifact, always written and unaffected by `RUST_LOG`.
//! Developer diagnostics go through `tracing` (see [`crate::logging`]).

use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::Local;
use tracing::{info, warn};

use crate::core::action::Transition;
use crate::tree::NodeId;

const RULE_WIDTH: usize = 80;
/// String values longer than this are written on their own line.
const INLINE_VALUE_LIMIT: usize = 100;

/// A loggable event in the life of a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionEvent {
    SessionStart {
        task: String,
        session_id: String,
    },
    ContinueReasoning {
        node_id: NodeId,
        reasoning: String,
        brief: String,
        previous_node_id: NodeId,
        current_node_id: NodeId,
    },
    MoveToNode {
        target_node_id: NodeId,
        previous_node_id: NodeId,
        current_node_id: NodeId,
    },
    FinishedReasoning {
        current_node_id: NodeId,
        tree_size: u32,
    },
    SessionEnd {
        session_id: String,
    },
    Error {
        message: String,
        current_node_id: NodeId,
    },
}

impl ActionEvent {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::SessionStart { .. } => "session_start",
            Self::ContinueReasoning { .. } => "continue_reasoning",
            Self::MoveToNode { .. } => "move_to_node",
            Self::FinishedReasoning { .. } => "finished_reasoning",
            Self::SessionEnd { .. } => "session_end",
            Self::Error { .. } => "error",
        }
    }

    /// `(key, value)` pairs in display order.
    pub fn details(&self) -> Vec<(&'static str, String)> {
        match self {
            Self::SessionStart { task, session_id } => vec![
                ("task", task.clone()),
                ("session_id", session_id.clone()),
            ],
            Self::ContinueReasoning {
                node_id,
                reasoning,
                brief,
                previous_node_id,
                current_node_id,
            } => vec![
                ("node_id", node_id.to_string()),
                ("reasoning", reasoning.clone()),
                ("brief", brief.clone()),
                ("previous_node_id", previous_node_id.to_string()),
                ("current_node_id", current_node_id.to_string()),
            ],
            Self::MoveToNode {
                target_node_id,
                previous_node_id,
                current_node_id,
            } => vec![
                ("target_node_id", target_node_id.to_string()),
                ("previous_node_id", previous_node_id.to_string()),
                ("current_node_id", current_node_id.to_string()),
            ],
            Self::FinishedReasoning {
                current_node_id,
                tree_size,
            } => vec![
                ("current_node_id", current_node_id.to_string()),
                ("tree_size", tree_size.to_string()),
            ],
            Self::SessionEnd { session_id } => vec![("session_id", session_id.clone())],
            Self::Error {
                message,
                current_node_id,
            } => vec![
                ("message", message.clone()),
                ("current_node_id", current_node_id.to_string()),
            ],
        }
    }

    /// The event describing a navigator transition.
    pub fn from_transition(transition: &Transition) -> Self {
        match transition {
            Transition::Extended {
                node_id,
                parent_id,
                reasoning,
                brief,
            } => Self::ContinueReasoning {
                node_id: *node_id,
                reasoning: reasoning.clone(),
                brief: brief.clone(),
                previous_node_id: *parent_id,
                current_node_id: *node_id,
            },
            Transition::Jumped { from, to } => Self::MoveToNode {
                target_node_id: *to,
                previous_node_id: *from,
                current_node_id: *to,
            },
            Transition::Finished {
                current_node_id,
                size,
            } => Self::FinishedReasoning {
                current_node_id: *current_node_id,
                tree_size: *size,
            },
        }
    }
}

/// Append-only writer for a session's action log.
#[derive(Debug, Clone)]
pub struct ActionLog {
    path: PathBuf,
    echo: bool,
}

impl ActionLog {
    /// `echo` mirrors every entry to stdout.
    pub fn new(path: impl Into<PathBuf>, echo: bool) -> Self {
        Self {
            path: path.into(),
            echo,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Record an event. Failures are reported and swallowed.
    pub fn record(&self, event: &ActionEvent) {
        info!(action = event.kind(), details = ?event.details(), "action");
        let entry = format_event(event, &Local::now().format("%Y-%m-%d %H:%M:%S").to_string());
        self.emit(&entry);
    }

    /// Record the view shown to the decision-maker at `iteration` (0-based).
    pub fn record_tree(&self, iteration: u32, max_iterations: u32, tree_json: &str) {
        self.emit(&format_tree(iteration, max_iterations, tree_json));
    }

    fn emit(&self, entry: &str) {
        if let Err(err) = self.append(entry) {
            warn!(path = %self.path.display(), err = %format!("{err:#}"), "failed to append action log");
        }
        if self.echo {
            print!("{entry}");
        }
    }

    fn append(&self, entry: &str) -> Result<()> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .with_context(|| format!("open {}", self.path.display()))?;
        file.write_all(entry.as_bytes())
            .with_context(|| format!("append {}", self.path.display()))
    }
}

fn format_event(event: &ActionEvent, timestamp: &str) -> String {
    let heavy = "=".repeat(RULE_WIDTH);
    let light = "-".repeat(RULE_WIDTH);
    let mut out = format!("\n{heavy}\nTimestamp: {timestamp}\nAction Type: {}\n{light}\n", event.kind());
    for (key, value) in event.details() {
        if value.len() > INLINE_VALUE_LIMIT {
            out.push_str(&format!("{key}:\n{value}\n"));
        } else {
            out.push_str(&format!("{key}: {value}\n"));
        }
    }
    out.push_str(&heavy);
    out.push('\n');
    out
}

fn format_tree(iteration: u32, max_iterations: u32, tree_json: &str) -> String {
    let heavy = "=".repeat(RULE_WIDTH);
    format!(
        "\n{heavy}\nIteration {}/{max_iterations}\n{heavy}\nRendered Tree:\n{tree_json}\n{heavy}\n",
        iteration + 1
    )
}
