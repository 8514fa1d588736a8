//! Git state queries via shell commands.
//!
//! Every invocation runs under a hard timeout: a status line that hangs is
//! worse than one that is missing information.

use std::io::Read;
use std::path::Path;
use std::process::{Child, Command, Stdio};
use std::thread;
use std::time::{Duration, Instant};

use color_eyre::eyre::{Context, Result, bail, eyre};
use tracing::{debug, trace};

/// How often a running child is polled for exit.
const POLL_INTERVAL: Duration = Duration::from_millis(5);

/// Runs git subcommands with a per-invocation timeout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Git {
    timeout: Duration,
}

impl Git {
    /// Create a runner that kills any git invocation exceeding `timeout`.
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }

    /// The per-invocation timeout.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Run `git <args>` in `dir`, returning trimmed stdout.
    ///
    /// Fails if git cannot be spawned, exits unsuccessfully, or runs past the
    /// timeout (in which case it is killed).
    pub fn run(&self, dir: &Path, args: &[&str]) -> Result<String> {
        let mut cmd = Command::new("git");
        cmd.args(args).current_dir(dir);
        self.run_command(cmd)
            .with_context(|| format!("git {}", args.join(" ")))
    }

    fn run_command(&self, cmd: Command) -> Result<String> {
        run_with_timeout(cmd, self.timeout)
    }

    /// The absolute path of the repository root containing `dir`.
    pub fn toplevel(&self, dir: &Path) -> Result<String> {
        self.run(dir, &["rev-parse", "--show-toplevel"])
            .and_then(non_empty)
    }

    /// The upstream of the current branch, e.g. `origin/main`.
    pub fn upstream(&self, dir: &Path) -> Result<String> {
        self.run(
            dir,
            &["rev-parse", "--abbrev-ref", "--symbolic-full-name", "@{u}"],
        )
        .and_then(non_empty)
    }

    /// The abbreviated hash of `HEAD`.
    pub fn short_head(&self, dir: &Path) -> Result<String> {
        self.run(dir, &["rev-parse", "--short", "HEAD"])
            .and_then(non_empty)
    }

    /// Porcelain v2 status with branch headers.
    pub fn status(&self, dir: &Path) -> Result<String> {
        self.run(
            dir,
            &[
                "status",
                "--porcelain=2",
                "--branch",
                "--ignore-submodules=dirty",
            ],
        )
    }

    /// The most recent reflog entry of `reference`, with unix timestamps.
    pub fn last_reflog_entry(&self, dir: &Path, reference: &str) -> Result<String> {
        self.run(dir, &["reflog", "show", "--date=unix", reference, "-1"])
    }

    /// Fetch `branch` from `remote`, pruning deleted remote branches.
    pub fn fetch(&self, dir: &Path, remote: &str, branch: &str) -> Result<()> {
        let args = ["fetch", "--quiet", "--no-progress", "--prune", remote, branch];
        let mut cmd = Command::new("git");
        cmd.args(args)
            .current_dir(dir)
            .env("GIT_TERMINAL_PROMPT", "0");
        self.run_command(cmd)
            .with_context(|| format!("git {}", args.join(" ")))
            .map(drop)
    }
}

fn non_empty(output: String) -> Result<String> {
    if output.is_empty() {
        bail!("empty output");
    }
    Ok(output)
}

/// Run a command to completion, killing it if it outlives `timeout`.
///
/// Stdout is drained on a separate thread so a chatty child can never block
/// on a full pipe while we wait for it.
pub fn run_with_timeout(mut cmd: Command, timeout: Duration) -> Result<String> {
    cmd.stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::null());

    trace!(?cmd, ?timeout, "spawning");
    let mut child = cmd.spawn().wrap_err("spawn process")?;

    let mut stdout = child
        .stdout
        .take()
        .ok_or_else(|| eyre!("capture stdout"))?;
    let reader = thread::spawn(move || {
        let mut buf = Vec::new();
        stdout.read_to_end(&mut buf).map(|_| buf)
    });

    let status = match wait_with_deadline(&mut child, Instant::now() + timeout) {
        Ok(Some(status)) => status,
        Ok(None) => {
            kill(&mut child);
            bail!("timed out after {timeout:?}");
        }
        Err(error) => {
            kill(&mut child);
            return Err(error).wrap_err("wait for process");
        }
    };

    let stdout = reader
        .join()
        .map_err(|_| eyre!("stdout reader panicked"))?
        .wrap_err("read stdout")?;

    if !status.success() {
        bail!("exited with {status}");
    }

    let output = String::from_utf8_lossy(&stdout).trim().to_string();
    debug!(bytes = output.len(), "process finished");
    Ok(output)
}

/// Poll `child` until it exits or `deadline` passes. `Ok(None)` means the deadline passed.
fn wait_with_deadline(
    child: &mut Child,
    deadline: Instant,
) -> std::io::Result<Option<std::process::ExitStatus>> {
    loop {
        if let Some(status) = child.try_wait()? {
            return Ok(Some(status));
        }
        let now = Instant::now();
        if now >= deadline {
            return Ok(None);
        }
        thread::sleep(POLL_INTERVAL.min(deadline - now));
    }
}

fn kill(child: &mut Child) {
    if let Err(error) = child.kill() {
        debug!(?error, "kill process");
    }
    // Reap the child so it does not linger as a zombie.
    if let Err(error) = child.wait() {
        debug!(?error, "reap process");
    }
}
