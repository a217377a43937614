//! Orchestration for a single iteration of the reasoning loop.

use std::time::Duration;

use anyhow::{Context, Result};
use tracing::{debug, warn};

use crate::core::action::{Action, Transition, apply_action};
use crate::core::navigator::Navigator;
use crate::io::action_log::{ActionEvent, ActionLog};
use crate::io::config::ReasonerConfig;
use crate::io::decision::{DecisionMaker, DecisionRequest, decide_and_load, write_decision_schema};
use crate::io::prompt::{PromptBuilder, PromptInputs};
use crate::io::session::Session;
use crate::io::snapshot::write_snapshot;

/// Everything an iteration needs besides the navigator and decision-maker.
pub struct StepContext<'a> {
    pub session: &'a Session,
    pub task: &'a str,
    pub config: &'a ReasonerConfig,
    pub action_log: &'a ActionLog,
    pub prompts: &'a PromptBuilder,
}

/// Result of a single iteration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepOutcome {
    /// Iteration number (0-based).
    pub iteration: u32,
    pub transition: Transition,
}

impl StepOutcome {
    pub fn is_finished(&self) -> bool {
        matches!(self.transition, Transition::Finished { .. })
    }
}

/// Execute one iteration: render, persist, ask for a decision, apply it.
///
/// Snapshot or decision failures leave the navigator untouched. A stale
/// current node surfaces here as `TreeError::NotFound` when extending.
pub fn run_step<D: DecisionMaker + ?Sized>(
    navigator: &mut Navigator,
    decision_maker: &D,
    ctx: &StepContext<'_>,
    iteration: u32,
) -> Result<StepOutcome> {
    let session = ctx.session;
    let view = navigator.render();
    if ctx.config.snapshots {
        write_snapshot(&session.snapshot_path(navigator.size()), &view)?;
    }
    let view_json = serde_json::to_string_pretty(&view).context("serialize rendered tree")?;
    ctx.action_log
        .record_tree(iteration, ctx.config.max_iterations, &view_json);

    let prompt = ctx.prompts.build(&PromptInputs {
        task: ctx.task.to_string(),
        rendered_tree: view_json,
        current_node_id: navigator.current_node_id(),
        iteration: iteration + 1,
        max_iterations: ctx.config.max_iterations,
    })?;

    let schema_path = session.decision_schema_path();
    write_decision_schema(&schema_path)?;
    let request = DecisionRequest {
        workdir: session.dir().to_path_buf(),
        prompt,
        output_schema_path: schema_path,
        output_path: session.decision_output_path(iteration),
        log_path: session.decision_log_path(iteration),
        timeout: Duration::from_secs(ctx.config.decision.timeout_secs),
        output_limit_bytes: ctx.config.decision.output_limit_bytes,
    };
    let action = decide_and_load(decision_maker, &request)?;

    if let Action::Jump { node_id } = action
        && !view.contains(node_id)
    {
        warn!(node_id, "jump target was not in the rendered tree");
    }

    let transition = apply_action(navigator, action)?;
    debug!(iteration, ?transition, "applied decision");
    ctx.action_log
        .record(&ActionEvent::from_transition(&transition));

    Ok(StepOutcome {
        iteration,
        transition,
    })
}
