//! Child-process execution with a timeout and bounded captured output.

use std::io::{Read, Write};
use std::process::{Command, ExitStatus, Stdio};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use tracing::{debug, instrument, warn};
use wait_timeout::ChildExt;

/// Bytes captured from one stream plus how many were dropped past the limit.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Captured {
    pub bytes: Vec<u8>,
    pub dropped: usize,
}

impl Captured {
    pub fn lossy(&self) -> String {
        String::from_utf8_lossy(&self.bytes).into_owned()
    }
}

/// Result of a finished (or killed) child process.
#[derive(Debug)]
pub struct ProcessOutput {
    pub status: ExitStatus,
    pub stdout: Captured,
    pub stderr: Captured,
    pub timed_out: bool,
}

impl ProcessOutput {
    /// Human-readable transcript of both streams, for log files.
    pub fn transcript(&self, label: &str) -> String {
        let mut buf = String::new();
        for (name, captured) in [("stdout", &self.stdout), ("stderr", &self.stderr)] {
            buf.push_str(&format!("=== {name} ===\n"));
            buf.push_str(&captured.lossy());
            if captured.dropped > 0 {
                buf.push_str(&format!("\n[{label} {name} truncated {} bytes]", captured.dropped));
            }
            buf.push('\n');
        }
        if self.timed_out {
            buf.push_str(&format!("[{label} timed out]\n"));
        }
        buf
    }
}

/// Spawn `cmd`, feed it `stdin`, and wait at most `timeout`.
///
/// Both pipes are drained on reader threads so a chatty child cannot block on a
/// full pipe; only the first `limit` bytes of each stream are kept. A child
/// still running at the deadline is killed and reported with `timed_out`.
#[instrument(skip_all, fields(timeout_secs = timeout.as_secs(), limit = limit))]
pub fn run_with_timeout(
    mut cmd: Command,
    stdin: Option<&[u8]>,
    timeout: Duration,
    limit: usize,
) -> Result<ProcessOutput> {
    cmd.stdin(if stdin.is_some() {
        Stdio::piped()
    } else {
        Stdio::null()
    })
    .stdout(Stdio::piped())
    .stderr(Stdio::piped());

    debug!("spawning child process");
    let mut child = cmd.spawn().context("spawn command")?;

    if let Some(input) = stdin {
        // Dropping the handle closes the pipe so the child sees EOF.
        let mut pipe = child
            .stdin
            .take()
            .ok_or_else(|| anyhow!("stdin was not piped"))?;
        pipe.write_all(input).context("write stdin")?;
    }

    let stdout = child
        .stdout
        .take()
        .ok_or_else(|| anyhow!("stdout was not piped"))?;
    let stderr = child
        .stderr
        .take()
        .ok_or_else(|| anyhow!("stderr was not piped"))?;
    let stdout_reader = spawn_capture(stdout, limit);
    let stderr_reader = spawn_capture(stderr, limit);

    let (status, timed_out) = match child.wait_timeout(timeout).context("wait for command")? {
        Some(status) => (status, false),
        None => {
            warn!(timeout_secs = timeout.as_secs(), "command timed out, killing");
            child.kill().context("kill command")?;
            (child.wait().context("wait command after kill")?, true)
        }
    };

    let stdout = join_capture(stdout_reader).context("join stdout")?;
    let stderr = join_capture(stderr_reader).context("join stderr")?;
    if stdout.dropped > 0 || stderr.dropped > 0 {
        warn!(
            stdout_dropped = stdout.dropped,
            stderr_dropped = stderr.dropped,
            "output truncated"
        );
    }

    debug!(exit_code = ?status.code(), timed_out, "command finished");
    Ok(ProcessOutput {
        status,
        stdout,
        stderr,
        timed_out,
    })
}

fn spawn_capture<R: Read + Send + 'static>(reader: R, limit: usize) -> JoinHandle<Result<Captured>> {
    thread::spawn(move || capture(reader, limit))
}

fn join_capture(handle: JoinHandle<Result<Captured>>) -> Result<Captured> {
    handle
        .join()
        .map_err(|_| anyhow!("output reader thread panicked"))?
}

fn capture<R: Read>(mut reader: R, limit: usize) -> Result<Captured> {
    let mut captured = Captured::default();
    let mut chunk = [0u8; 8192];
    loop {
        let n = reader.read(&mut chunk).context("read output")?;
        if n == 0 {
            return Ok(captured);
        }
        let keep = n.min(limit.saturating_sub(captured.bytes.len()));
        captured.bytes.extend_from_slice(&chunk[..keep]);
        captured.dropped += n - keep;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn capture_keeps_prefix_and_counts_rest() {
        let captured = capture(&b"hello world"[..], 5).expect("capture");
        assert_eq!(captured.bytes, b"hello");
        assert_eq!(captured.dropped, 6);
    }

    #[test]
    fn capture_under_limit_keeps_everything() {
        let captured = capture(&b"abc"[..], 10).expect("capture");
        assert_eq!(captured.lossy(), "abc");
        assert_eq!(captured.dropped, 0);
    }

    #[cfg(unix)]
    #[test]
    fn runs_command_with_stdin() {
        let output = run_with_timeout(
            Command::new("cat"),
            Some(b"ping"),
            Duration::from_secs(10),
            1024,
        )
        .expect("run cat");
        assert!(output.status.success());
        assert!(!output.timed_out);
        assert_eq!(output.stdout.lossy(), "ping");
    }

    #[cfg(unix)]
    #[test]
    fn kills_command_past_timeout() {
        let mut cmd = Command::new("sleep");
        cmd.arg("5");
        let output =
            run_with_timeout(cmd, None, Duration::from_millis(100), 1024).expect("run sleep");
        assert!(output.timed_out);
        assert!(!output.status.success());
        assert!(output.transcript("decision").contains("[decision timed out]"));
    }
}
