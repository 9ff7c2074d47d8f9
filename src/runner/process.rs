//! Spawning a backend and collecting its output under a deadline.

use std::path::Path;
use std::process::{ExitStatus, Stdio};
use std::time::Duration;

use anyhow::{Context, Result, bail};
use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::process::{Child, Command};
use tokio::task::{JoinError, JoinHandle};
use tokio::time::Instant;

/// Guard that kills the child process (and its entire process group) on drop.
pub(crate) struct ChildGuard {
    child: Option<Child>,
    /// Process group ID saved at spawn time so we can kill the whole group.
    #[cfg(unix)]
    pgid: Option<u32>,
}

impl ChildGuard {
    fn new(child: Child) -> Self {
        #[cfg(unix)]
        let pgid = child.id();
        Self {
            child: Some(child),
            #[cfg(unix)]
            pgid,
        }
    }

    fn child_mut(&mut self) -> Option<&mut Child> {
        self.child.as_mut()
    }

    /// Kill the whole process group, then the direct child. Safe to call after
    /// the child has exited: workers it left behind are still in the group.
    fn kill_group(&mut self) {
        // Kill the entire process group so backend worker processes don't become orphans.
        #[cfg(unix)]
        if let Some(pgid) = self.pgid.take()
            && let Ok(pgid) = libc::pid_t::try_from(pgid)
        {
            unsafe { libc::kill(-pgid, libc::SIGKILL) };
        }
        // Fallback / non-Unix: kill just the direct child.
        if let Some(mut child) = self.child.take() {
            let _ = child.start_kill();
        }
    }
}

impl Drop for ChildGuard {
    fn drop(&mut self) {
        self.kill_group();
    }
}

/// Everything a backend produced before it exited.
#[derive(Debug)]
pub(crate) struct Captured {
    pub status: ExitStatus,
    pub stdout: String,
    pub stderr: String,
}

/// How a spawned backend run ended.
#[derive(Debug)]
pub(crate) enum Exit {
    Completed(Captured),
    TimedOut,
}

/// Spawn `program args…` in `cwd` and collect stdout/stderr until it exits or
/// `timeout` elapses, whichever comes first.
///
/// The run completes when the child exits. Anything still alive in its process
/// group is then killed and the pipes are drained within what is left of the
/// deadline. On timeout the group is killed before returning; the kill is not
/// awaited. Spawn failures are returned as errors.
pub(crate) async fn run_with_timeout(
    program: &str,
    args: &[String],
    cwd: &Path,
    timeout: Duration,
) -> Result<Exit> {
    let deadline = Instant::now() + timeout;
    let mut cmd = Command::new(program);
    cmd.args(args)
        .current_dir(cwd)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);

    // Put the child in its own process group so killing it (via ChildGuard) also
    // takes out any worker processes the backend forks.
    #[cfg(unix)]
    cmd.process_group(0);

    tracing::debug!(cmd = ?cmd.as_std(), cwd = %cwd.display(), "spawning backend");

    let mut child = cmd
        .spawn()
        .with_context(|| format!("failed to launch `{program}`"))?;

    let stdout = child.stdout.take().context("missing stdout")?;
    let stderr = child.stderr.take().context("missing stderr")?;
    let readers = Readers {
        stdout: tokio::spawn(read_all(stdout)),
        stderr: tokio::spawn(read_all(stderr)),
    };

    // The child stays in the guard at all times so it is always killed if this
    // future is dropped or the deadline wins.
    let mut guard = ChildGuard::new(child);

    // Exactly one arm runs: the first of exit and deadline settles the outcome.
    let status = tokio::select! {
        status = wait(&mut guard) => Some(status?),
        _ = tokio::time::sleep_until(deadline) => None,
    };
    let Some(status) = status else {
        tracing::warn!(?timeout, "backend timed out, killing process group");
        drop(guard);
        return Ok(Exit::TimedOut);
    };

    tracing::debug!(%status, "backend exited");
    guard.kill_group();

    let Ok((stdout, stderr)) = tokio::time::timeout_at(deadline, readers.drain()).await else {
        tracing::warn!(?timeout, "backend output still open at the deadline");
        return Ok(Exit::TimedOut);
    };
    Ok(Exit::Completed(Captured {
        status,
        stdout: stdout.context("failed to read backend stdout")?,
        stderr: stderr.context("failed to read backend stderr")?,
    }))
}

/// Background readers for the child's pipes. Aborted if dropped before draining.
struct Readers {
    stdout: JoinHandle<std::io::Result<String>>,
    stderr: JoinHandle<std::io::Result<String>>,
}

impl Readers {
    async fn drain(mut self) -> (Result<String>, Result<String>) {
        let (stdout, stderr) = tokio::join!(&mut self.stdout, &mut self.stderr);
        (flatten(stdout), flatten(stderr))
    }
}

impl Drop for Readers {
    fn drop(&mut self) {
        self.stdout.abort();
        self.stderr.abort();
    }
}

fn flatten(joined: Result<std::io::Result<String>, JoinError>) -> Result<String> {
    joined.context("pipe reader stopped")?.map_err(Into::into)
}

async fn wait(guard: &mut ChildGuard) -> Result<ExitStatus> {
    match guard.child_mut() {
        Some(child) => child.wait().await.context("failed to wait for backend"),
        None => bail!("backend process already released"),
    }
}

async fn read_all<R: AsyncRead + Unpin>(mut reader: R) -> std::io::Result<String> {
    let mut buf = Vec::new();
    reader.read_to_end(&mut buf).await?;
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

#[cfg(test)]
#[path = "process_tests.rs"]
mod tests;
