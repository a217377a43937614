//! Reasoner configuration stored in `reasoner.toml`.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Default config file name, looked up in the working directory.
pub const CONFIG_FILE: &str = "reasoner.toml";

/// Reasoner configuration (TOML).
///
/// Missing fields default to the values below.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ReasonerConfig {
    /// Upper bound on loop iterations before giving up.
    pub max_iterations: u32,

    /// Directory holding one sub-directory per session.
    pub snapshot_root: PathBuf,

    /// Write `<snapshot_root>/<session>/<size>.json` on every render.
    pub snapshots: bool,

    pub decision: DecisionConfig,

    pub log: LogConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct DecisionConfig {
    /// Executable invoked as `<program> exec ...`.
    pub program: String,

    /// Model override passed with `-m`; the program's default when unset.
    pub model: Option<String>,

    pub reasoning_effort: String,

    /// Wall-clock budget for one decision, in seconds.
    pub timeout_secs: u64,

    /// Truncate decision-maker stdout/stderr logs beyond this many bytes.
    pub output_limit_bytes: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct LogConfig {
    /// Mirror action log entries to stdout.
    pub echo: bool,
}

impl Default for DecisionConfig {
    fn default() -> Self {
        Self {
            program: "codex".to_string(),
            model: None,
            reasoning_effort: "medium".to_string(),
            timeout_secs: 5 * 60,
            output_limit_bytes: 100_000,
        }
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self { echo: true }
    }
}

impl Default for ReasonerConfig {
    fn default() -> Self {
        Self {
            max_iterations: 20,
            snapshot_root: PathBuf::from("tree_snapshots"),
            snapshots: true,
            decision: DecisionConfig::default(),
            log: LogConfig::default(),
        }
    }
}

impl ReasonerConfig {
    pub fn validate(&self) -> Result<()> {
        if self.max_iterations == 0 {
            return Err(anyhow!("max_iterations must be > 0"));
        }
        if self.snapshot_root.as_os_str().is_empty() {
            return Err(anyhow!("snapshot_root must not be empty"));
        }
        if self.decision.program.trim().is_empty() {
            return Err(anyhow!("decision.program must not be empty"));
        }
        if self.decision.reasoning_effort.trim().is_empty() {
            return Err(anyhow!("decision.reasoning_effort must not be empty"));
        }
        if self.decision.timeout_secs == 0 {
            return Err(anyhow!("decision.timeout_secs must be > 0"));
        }
        if self.decision.output_limit_bytes == 0 {
            return Err(anyhow!("decision.output_limit_bytes must be > 0"));
        }
        Ok(())
    }
}

/// Load config from a TOML file.
///
/// If the file is missing, returns `ReasonerConfig::default()`.
pub fn load_config(path: &Path) -> Result<ReasonerConfig> {
    if !path.exists() {
        debug!(path = %path.display(), "config missing, using defaults");
        let cfg = ReasonerConfig::default();
        cfg.validate()?;
        return Ok(cfg);
    }
    let contents = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    let cfg: ReasonerConfig =
        toml::from_str(&contents).with_context(|| format!("parse {}", path.display()))?;
    cfg.validate()
        .with_context(|| format!("validate {}", path.display()))?;
    Ok(cfg)
}

/// Atomically write config to disk (temp file + rename).
pub fn write_config(path: &Path, cfg: &ReasonerConfig) -> Result<()> {
    cfg.validate()?;
    let mut buf = toml::to_string_pretty(cfg).context("serialize config toml")?;
    buf.push('\n');
    let tmp_path = path.with_extension("toml.tmp");
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("create directory {}", parent.display()))?;
    }
    fs::write(&tmp_path, buf)
        .with_context(|| format!("write temp config {}", tmp_path.display()))?;
    fs::rename(&tmp_path, path).with_context(|| format!("replace config {}", path.display()))?;
    Ok(())
}
