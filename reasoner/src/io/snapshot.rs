//! Snapshot files for rendered views.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;
use serde_json::ser::{PrettyFormatter, Serializer};
use tracing::debug;

use crate::core::render::RenderedNode;

/// Write `view` as four-space indented JSON, replacing any existing file.
pub fn write_snapshot(path: &Path, view: &RenderedNode) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("create snapshot dir {}", parent.display()))?;
    }
    let mut buf = to_indented_json(view).context("serialize snapshot")?;
    buf.push('\n');
    fs::write(path, buf).with_context(|| format!("write snapshot {}", path.display()))?;
    debug!(path = %path.display(), "wrote snapshot");
    Ok(())
}

pub fn read_snapshot(path: &Path) -> Result<RenderedNode> {
    let contents =
        fs::read_to_string(path).with_context(|| format!("read snapshot {}", path.display()))?;
    serde_json::from_str(&contents).with_context(|| format!("parse snapshot {}", path.display()))
}

fn to_indented_json<T: Serialize>(value: &T) -> Result<String> {
    let mut out = Vec::new();
    let mut ser = Serializer::with_formatter(&mut out, PrettyFormatter::with_indent(b"    "));
    value.serialize(&mut ser)?;
    Ok(String::from_utf8(out)?)
}
