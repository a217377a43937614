//! Decision-maker abstraction.
//!
//! The [`DecisionMaker`] trait decouples the loop from the backend that picks
//! the next action (currently `codex exec` with a structured output schema).
//! Tests use scripted decision-makers that write predetermined outputs without
//! spawning processes.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use jsonschema::validator_for;
use serde_json::Value;
use tracing::{debug, info, instrument, warn};

use crate::core::action::{Action, RawDecision};
use crate::core::error::DecisionError;
use crate::io::config::DecisionConfig;
use crate::io::process::run_with_timeout;

/// JSON Schema the decision-maker's output must satisfy.
pub const DECISION_SCHEMA: &str = include_str!("../../schemas/decision.schema.json");

/// Parameters for one decision.
#[derive(Debug, Clone)]
pub struct DecisionRequest {
    /// Working directory for the decision-maker process.
    pub workdir: PathBuf,
    /// Full prompt (instructions, task, rendered tree).
    pub prompt: String,
    /// Path to the JSON Schema that constrains the output.
    pub output_schema_path: PathBuf,
    /// Path where the decision-maker must write its JSON output.
    pub output_path: PathBuf,
    /// Path for the captured stdout/stderr transcript.
    pub log_path: PathBuf,
    /// Maximum time to wait for a decision.
    pub timeout: Duration,
    /// Truncate captured output beyond this many bytes.
    pub output_limit_bytes: usize,
}

/// Abstraction over decision backends.
pub trait DecisionMaker {
    /// Produce a decision for `request`. Must write JSON to `request.output_path`.
    fn decide(&self, request: &DecisionRequest) -> Result<()>;
}

/// Decision-maker that spawns `codex exec`.
#[derive(Debug, Clone)]
pub struct CodexDecisionMaker {
    program: String,
    model: Option<String>,
    reasoning_effort: String,
}

impl CodexDecisionMaker {
    pub fn new(config: &DecisionConfig) -> Self {
        Self {
            program: config.program.clone(),
            model: config.model.clone(),
            reasoning_effort: config.reasoning_effort.clone(),
        }
    }

    fn command(&self, request: &DecisionRequest) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.arg("exec")
            .arg("-c")
            .arg(format!("model_reasoning_effort={}", self.reasoning_effort))
            .arg("--sandbox")
            .arg("read-only")
            .arg("--skip-git-repo-check");
        if let Some(model) = &self.model {
            cmd.arg("-m").arg(model);
        }
        cmd.arg("--output-schema")
            .arg(&request.output_schema_path)
            .arg("--output-last-message")
            .arg(&request.output_path)
            .arg("-")
            .current_dir(&request.workdir);
        cmd
    }
}

impl DecisionMaker for CodexDecisionMaker {
    #[instrument(skip_all, fields(program = %self.program, timeout_secs = request.timeout.as_secs()))]
    fn decide(&self, request: &DecisionRequest) -> Result<()> {
        info!(workdir = %request.workdir.display(), "requesting decision");
        if !request.output_schema_path.exists() {
            return Err(anyhow!(
                "missing output schema {}",
                request.output_schema_path.display()
            ));
        }
        ensure_parent(&request.output_path)?;

        let output = run_with_timeout(
            self.command(request),
            Some(request.prompt.as_bytes()),
            request.timeout,
            request.output_limit_bytes,
        )
        .with_context(|| format!("run {} exec", self.program))?;

        ensure_parent(&request.log_path)?;
        fs::write(&request.log_path, output.transcript("decision"))
            .with_context(|| format!("write decision log {}", request.log_path.display()))?;

        if output.timed_out {
            warn!(timeout_secs = request.timeout.as_secs(), "decision timed out");
            return Err(anyhow!(
                "{} exec timed out after {:?}",
                self.program,
                request.timeout
            ));
        }
        if !output.status.success() {
            warn!(exit_code = ?output.status.code(), "decision process failed");
            return Err(anyhow!(
                "{} exec failed with status {:?} (see {})",
                self.program,
                output.status.code(),
                request.log_path.display()
            ));
        }
        debug!("decision process completed");
        Ok(())
    }
}

/// Write the embedded decision schema to `path`.
pub fn write_decision_schema(path: &Path) -> Result<()> {
    ensure_parent(path)?;
    fs::write(path, DECISION_SCHEMA)
        .with_context(|| format!("write decision schema {}", path.display()))
}

/// Run the decision-maker and turn its output into an [`Action`].
///
/// Output that is not valid JSON, violates the schema, or omits a field the
/// chosen action needs fails with [`DecisionError::InvalidAction`].
#[instrument(skip_all, fields(output_path = %request.output_path.display()))]
pub fn decide_and_load<D: DecisionMaker + ?Sized>(
    decision_maker: &D,
    request: &DecisionRequest,
) -> Result<Action> {
    remove_stale_output(&request.output_path)?;
    decision_maker.decide(request)?;
    if !request.output_path.exists() {
        return Err(anyhow!(
            "missing decision output {}",
            request.output_path.display()
        ));
    }
    let contents = fs::read_to_string(&request.output_path)
        .with_context(|| format!("read decision output {}", request.output_path.display()))?;
    let action = parse_decision(&contents)?;
    debug!(?action, "parsed decision");
    Ok(action)
}

/// Parse and validate decision JSON.
pub fn parse_decision(contents: &str) -> Result<Action, DecisionError> {
    let value: Value = serde_json::from_str(contents)
        .map_err(|err| DecisionError::invalid(format!("output is not JSON: {err}")))?;
    validate_against_schema(&value)?;
    let raw: RawDecision = serde_json::from_value(value)
        .map_err(|err| DecisionError::invalid(format!("unrecognized decision: {err}")))?;
    Action::try_from(raw)
}

fn validate_against_schema(value: &Value) -> Result<(), DecisionError> {
    let schema: Value = serde_json::from_str(DECISION_SCHEMA)
        .map_err(|err| DecisionError::invalid(format!("embedded schema unreadable: {err}")))?;
    let validator = validator_for(&schema)
        .map_err(|err| DecisionError::invalid(format!("embedded schema invalid: {err}")))?;
    let messages: Vec<String> = validator
        .iter_errors(value)
        .map(|err| err.to_string())
        .collect();
    if !messages.is_empty() {
        return Err(DecisionError::invalid(format!(
            "schema validation failed: {}",
            messages.join("; ")
        )));
    }
    Ok(())
}

fn remove_stale_output(path: &Path) -> Result<()> {
    match fs::remove_file(path) {
        Ok(()) => {
            warn!(path = %path.display(), "removed stale decision output");
            Ok(())
        }
        Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
        Err(err) => {
            Err(err).with_context(|| format!("remove stale decision output {}", path.display()))
        }
    }
}

fn ensure_parent(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).with_context(|| format!("create {}", parent.display()))?;
    }
    Ok(())
}
