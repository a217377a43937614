//! Explicit per-session context.
//!
//! A session owns one directory under the snapshot root. Everything a run
//! persists (snapshots, the action log, decision artifacts) lives there.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use tracing::{debug, info};
use uuid::Uuid;

/// Identity and on-disk layout of one reasoning session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    id: String,
    dir: PathBuf,
}

impl Session {
    /// Create a fresh session directory under `snapshot_root`.
    ///
    /// Uses `id` when given (validated), otherwise generates a fresh id. An
    /// existing non-empty directory for the id is rejected so artifacts from an
    /// earlier run are never picked up.
    pub fn create(snapshot_root: &Path, id: Option<&str>) -> Result<Self> {
        let id = match id {
            Some(id) => {
                validate_session_id(id)?;
                id.to_string()
            }
            None => {
                let id = generate_session_id();
                info!(session_id = %id, "generated new session id");
                id
            }
        };
        let session = Self::at(snapshot_root, &id);
        if session.has_artifacts()? {
            return Err(anyhow!(
                "session {} already exists at {}",
                session.id,
                session.dir.display()
            ));
        }
        fs::create_dir_all(&session.dir)
            .with_context(|| format!("create session dir {}", session.dir.display()))?;
        debug!(session_id = %session.id, dir = %session.dir.display(), "session ready");
        Ok(session)
    }

    /// Describe an existing session without touching the filesystem.
    pub fn at(snapshot_root: &Path, id: &str) -> Self {
        Self {
            id: id.to_string(),
            dir: snapshot_root.join(id),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Snapshot written when the tree holds `size` non-root nodes.
    pub fn snapshot_path(&self, size: u32) -> PathBuf {
        self.dir.join(format!("{size}.json"))
    }

    pub fn actions_log_path(&self) -> PathBuf {
        self.dir.join("actions.log")
    }

    pub fn decisions_dir(&self) -> PathBuf {
        self.dir.join("decisions")
    }

    pub fn decision_schema_path(&self) -> PathBuf {
        self.decisions_dir().join("decision.schema.json")
    }

    pub fn decision_output_path(&self, iteration: u32) -> PathBuf {
        self.decisions_dir().join(format!("{iteration}.json"))
    }

    pub fn decision_log_path(&self, iteration: u32) -> PathBuf {
        self.decisions_dir().join(format!("{iteration}.log"))
    }

    fn has_artifacts(&self) -> Result<bool> {
        if !self.dir.exists() {
            return Ok(false);
        }
        let mut entries =
            fs::read_dir(&self.dir).with_context(|| format!("read {}", self.dir.display()))?;
        Ok(entries.next().is_some())
    }

    /// Size of the most recent snapshot on disk, if any.
    pub fn latest_snapshot_size(&self) -> Result<Option<u32>> {
        if !self.dir.is_dir() {
            return Err(anyhow!("session dir {} does not exist", self.dir.display()));
        }
        let mut latest = None;
        for entry in
            fs::read_dir(&self.dir).with_context(|| format!("read {}", self.dir.display()))?
        {
            let entry = entry.with_context(|| format!("read {}", self.dir.display()))?;
            let path = entry.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some("json") {
                continue;
            }
            let Some(size) = path
                .file_stem()
                .and_then(|stem| stem.to_str())
                .and_then(|stem| stem.parse::<u32>().ok())
            else {
                continue;
            };
            latest = latest.max(Some(size));
        }
        Ok(latest)
    }
}

/// Validate that a session id is safe to use as a directory name.
pub fn validate_session_id(id: &str) -> Result<()> {
    if id.is_empty() {
        return Err(anyhow!("session id must not be empty"));
    }
    if id == "." || id == ".." {
        return Err(anyhow!("session id must not be '{id}'"));
    }
    if id
        .chars()
        .any(|c| !(c.is_ascii_alphanumeric() || c == '.' || c == '_' || c == '-'))
    {
        return Err(anyhow!(
            "session id must be [A-Za-z0-9._-] only (got '{id}')"
        ));
    }
    Ok(())
}

fn generate_session_id() -> String {
    let mut id = Uuid::new_v4().simple().to_string();
    id.truncate(8);
    id
}
