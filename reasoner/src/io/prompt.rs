//! Prompt rendering for the decision-maker.

use anyhow::{Context, Result};
use minijinja::{Environment, context};
use tracing::debug;

use crate::tree::NodeId;

const NAVIGATOR_TEMPLATE: &str = include_str!("prompts/navigator.md");

/// All inputs needed to build one decision prompt.
#[derive(Debug, Clone)]
pub struct PromptInputs {
    /// The user's task, verbatim.
    pub task: String,
    /// Rendered view as indented JSON.
    pub rendered_tree: String,
    pub current_node_id: NodeId,
    /// 1-based iteration number.
    pub iteration: u32,
    pub max_iterations: u32,
}

/// Template engine wrapper around minijinja.
pub struct PromptBuilder {
    env: Environment<'static>,
}

impl PromptBuilder {
    pub fn new() -> Result<Self> {
        let mut env = Environment::new();
        env.add_template("navigator", NAVIGATOR_TEMPLATE)
            .context("load navigator template")?;
        Ok(Self { env })
    }

    pub fn build(&self, input: &PromptInputs) -> Result<String> {
        let template = self.env.get_template("navigator")?;
        let rendered = template
            .render(context! {
                task => input.task.trim(),
                rendered_tree => input.rendered_tree.trim_end(),
                current_node_id => input.current_node_id,
                iteration => input.iteration,
                max_iterations => input.max_iterations,
            })
            .context("render navigator prompt")?;
        debug!(bytes = rendered.len(), "built prompt");
        Ok(rendered)
    }
}
