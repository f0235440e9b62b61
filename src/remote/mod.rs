//! Remote shell access over ssh/rsync subprocesses.
//!
//! The target host is reachable only through a restricted shell: no `find`,
//! high per-command latency. Tree enumeration therefore rides on rsync's
//! dry-run mode (a fast recursive lister that transfers nothing), and
//! deletion is batched `rm -rf` over non-interactive ssh.
//!
//! [`RemoteShell`] is the seam the rest of the pipeline is written against;
//! tests substitute an in-memory implementation.

use std::process::Stdio;

use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use tokio::process::Command;
use tracing::debug;

use crate::config::Config;
use crate::types::EaDirPath;
use crate::types::error::EadirmError;
use crate::types::token::PipelineCancellationToken;

/// Operations the pipeline needs from the remote host.
///
/// All calls are sequential and run to completion; there is never more than
/// one remote command in flight.
#[async_trait]
pub trait RemoteShell: Send + Sync {
    /// Recursive dry-run listing of the contents of `base_path`.
    ///
    /// Returns raw path lines relative to the base path, as produced by the
    /// enumeration tool. Fails with [`EadirmError::Scan`] carrying the
    /// captured diagnostic output when the path is unreachable or invalid.
    async fn list_tree(&self, base_path: &str) -> Result<Vec<String>>;

    /// Delete all given paths recursively and forcefully in one remote
    /// command. Removal of an already-missing path is success (`rm -f`
    /// semantics). Fails with [`EadirmError::BatchDeletion`] on a non-zero
    /// remote exit status.
    async fn remove_paths(&self, paths: &[EaDirPath]) -> Result<()>;
}

/// Boxed remote shell handle used throughout the pipeline.
pub type Shell = Box<dyn RemoteShell>;

/// Quote a string as a single shell word.
///
/// Single-quote escaping: the only character that needs special handling
/// inside single quotes is the single quote itself, which is emitted as
/// `'\''`. The result is immune to word splitting, globbing, and metacharacter
/// interpretation by the remote shell.
pub fn shell_quote(s: &str) -> String {
    let mut quoted = String::with_capacity(s.len() + 2);
    quoted.push('\'');
    for ch in s.chars() {
        if ch == '\'' {
            quoted.push_str("'\\''");
        } else {
            quoted.push(ch);
        }
    }
    quoted.push('\'');
    quoted
}

/// Build the remote deletion command for one batch.
///
/// Every path is an individually quoted token and the `--` guard keeps
/// leading-dash paths from being read as options. `-f` makes removal of a
/// path that disappeared between scan and delete a no-op rather than an
/// error.
pub(crate) fn build_remove_command(paths: &[EaDirPath]) -> String {
    let mut command = String::from("rm -rf --");
    for path in paths {
        command.push(' ');
        command.push_str(&shell_quote(path.as_str()));
    }
    command
}

/// Remote shell implementation spawning `rsync` and `ssh` subprocesses.
pub struct SshShell {
    host: String,
    ssh_program: String,
    rsync_program: String,
    cancellation_token: PipelineCancellationToken,
}

impl SshShell {
    pub fn new(config: &Config, cancellation_token: PipelineCancellationToken) -> Self {
        Self {
            host: config.target.host.clone(),
            ssh_program: config.ssh_program.clone(),
            rsync_program: config.rsync_program.clone(),
            cancellation_token,
        }
    }

    /// Spawn a command and await its completion.
    ///
    /// stdout and stderr are captured separately; stderr is the diagnostic
    /// channel surfaced to the operator on failure. Cancellation drops the
    /// wait future, which kills the child (`kill_on_drop`) and returns
    /// [`EadirmError::Cancelled`] without touching any local state.
    async fn run_to_completion(&self, mut command: Command) -> Result<std::process::Output> {
        command
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        debug!(command = ?command.as_std(), "spawning remote command.");

        let child = command
            .spawn()
            .with_context(|| format!("failed to spawn {:?}", command.as_std().get_program()))?;

        tokio::select! {
            output = child.wait_with_output() => {
                Ok(output.context("failed to wait for remote command")?)
            }
            _ = self.cancellation_token.cancelled() => {
                Err(anyhow!(EadirmError::Cancelled))
            }
        }
    }
}

#[async_trait]
impl RemoteShell for SshShell {
    async fn list_tree(&self, base_path: &str) -> Result<Vec<String>> {
        // rsync needs a destination even in dry-run mode. The temp dir is
        // released on every exit path, including cancellation.
        let listing_dest = tempfile::tempdir()
            .map_err(|e| anyhow!(EadirmError::Io(format!("temp listing dir: {e}"))))?;

        // Trailing separator scans the directory contents rather than the
        // directory itself as a single entry.
        let mut source = format!("{}:{}", self.host, base_path.trim_end_matches('/'));
        source.push('/');

        let mut command = Command::new(&self.rsync_program);
        command
            .arg("--dry-run")
            .arg("--recursive")
            .arg("--protect-args")
            .arg("--out-format=%n")
            .arg("-e")
            .arg(format!("{} -o BatchMode=yes", self.ssh_program))
            .arg(&source)
            .arg(listing_dest.path());

        let output = self.run_to_completion(command).await?;

        if !output.status.success() {
            return Err(anyhow!(EadirmError::Scan(describe_failure(&output))));
        }

        let lines = String::from_utf8_lossy(&output.stdout)
            .lines()
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect();

        Ok(lines)
    }

    async fn remove_paths(&self, paths: &[EaDirPath]) -> Result<()> {
        if paths.is_empty() {
            return Ok(());
        }

        let remote_command = build_remove_command(paths);

        let mut command = Command::new(&self.ssh_program);
        command
            .arg("-o")
            .arg("BatchMode=yes")
            .arg(&self.host)
            .arg(&remote_command);

        let output = self.run_to_completion(command).await?;

        if !output.status.success() {
            return Err(anyhow!(EadirmError::BatchDeletion(describe_failure(
                &output
            ))));
        }

        Ok(())
    }
}

/// Diagnostic text for a failed command: captured stderr verbatim, falling
/// back to the exit status when stderr is empty.
fn describe_failure(output: &std::process::Output) -> String {
    let stderr = String::from_utf8_lossy(&output.stderr);
    let stderr = stderr.trim();
    if stderr.is_empty() {
        output.status.to_string()
    } else {
        stderr.to_string()
    }
}
