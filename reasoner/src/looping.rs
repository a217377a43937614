//! Multi-iteration reasoning loop for `reasoner run`.

use anyhow::Result;
use tracing::info;

use crate::core::navigator::Navigator;
use crate::io::action_log::ActionEvent;
use crate::io::decision::DecisionMaker;
use crate::step::{StepContext, StepOutcome, run_step};

/// Reason why `run_loop` stopped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoopStop {
    /// The decision-maker chose to finish.
    Finished,
    /// The iteration budget ran out first.
    MaxIterationsReached { max_iterations: u32 },
}

/// Summary of a loop invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoopOutcome {
    pub session_id: String,
    pub steps_executed: u32,
    pub stop: LoopStop,
}

/// Run steps until the decision-maker finishes or `max_iterations` is reached.
///
/// Any step error is written to the action log and returned; the navigator keeps
/// whatever state the last successful step left it in.
pub fn run_loop<D: DecisionMaker + ?Sized, F: FnMut(&StepOutcome, &Navigator)>(
    navigator: &mut Navigator,
    decision_maker: &D,
    ctx: &StepContext<'_>,
    mut on_step: F,
) -> Result<LoopOutcome> {
    let session_id = ctx.session.id().to_string();
    let max_iterations = ctx.config.max_iterations;
    ctx.action_log.record(&ActionEvent::SessionStart {
        task: ctx.task.to_string(),
        session_id: session_id.clone(),
    });

    let mut steps_executed = 0u32;
    for iteration in 0..max_iterations {
        let step = match run_step(navigator, decision_maker, ctx, iteration) {
            Ok(step) => step,
            Err(err) => {
                ctx.action_log.record(&ActionEvent::Error {
                    message: format!("{err:#}"),
                    current_node_id: navigator.current_node_id(),
                });
                return Err(err);
            }
        };
        steps_executed += 1;
        on_step(&step, &*navigator);

        if step.is_finished() {
            ctx.action_log.record(&ActionEvent::SessionEnd {
                session_id: session_id.clone(),
            });
            info!(session_id = %session_id, steps_executed, "reasoning finished");
            return Ok(LoopOutcome {
                session_id,
                steps_executed,
                stop: LoopStop::Finished,
            });
        }
    }

    ctx.action_log.record(&ActionEvent::Error {
        message: "Max iterations reached".to_string(),
        current_node_id: navigator.current_node_id(),
    });
    info!(session_id = %session_id, max_iterations, "iteration budget exhausted");
    Ok(LoopOutcome {
        session_id,
        steps_executed,
        stop: LoopStop::MaxIterationsReached { max_iterations },
    })
}
