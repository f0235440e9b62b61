//! The sweep pipeline, tying scan, filter, queue and deletion together.

use anyhow::{Result, anyhow};
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::deleter::BatchDeleter;
use crate::filter;
use crate::lister::TreeLister;
use crate::queue::QueueStore;
use crate::remote::{Shell, SshShell};
use crate::safety::SafetyChecker;
use crate::types::SweepStats;
use crate::types::error::EadirmError;
use crate::types::token::PipelineCancellationToken;

/// One full sweep of a remote base path.
///
/// A fresh run scans the remote tree, normalizes the listing to top-level
/// `@eaDir` paths, asks for confirmation, persists the deletion queue, then
/// drains it in batches and removes the queue file. If a queue file from a
/// prior interrupted run exists, the sweep re-enters at the draining phase
/// and skips scanning, filtering and confirmation.
///
/// A pipeline instance is single use. Construct, `run()`, then read
/// [`stats()`](Self::stats).
pub struct SweepPipeline {
    config: Config,
    shell: Shell,
    safety_checker: SafetyChecker,
    cancellation_token: PipelineCancellationToken,
    stats: SweepStats,
    has_been_run: bool,
}

impl SweepPipeline {
    pub fn new(config: Config, cancellation_token: PipelineCancellationToken) -> Self {
        let shell = Box::new(SshShell::new(&config, cancellation_token.clone()));
        Self::assemble(config, shell, cancellation_token)
    }

    /// Build a pipeline over a custom [`RemoteShell`](crate::remote::RemoteShell)
    /// implementation. Used by tests to avoid real subprocess spawns.
    pub fn with_shell(
        config: Config,
        shell: Shell,
        cancellation_token: PipelineCancellationToken,
    ) -> Self {
        Self::assemble(config, shell, cancellation_token)
    }

    fn assemble(
        config: Config,
        shell: Shell,
        cancellation_token: PipelineCancellationToken,
    ) -> Self {
        let safety_checker = SafetyChecker::new(&config);
        Self {
            config,
            shell,
            safety_checker,
            cancellation_token,
            stats: SweepStats::default(),
            has_been_run: false,
        }
    }

    /// Replace the safety checker. Used by tests to script the prompt.
    pub fn set_safety_checker(&mut self, safety_checker: SafetyChecker) {
        self.safety_checker = safety_checker;
    }

    /// Statistics accumulated by [`run()`](Self::run).
    pub fn stats(&self) -> SweepStats {
        self.stats
    }

    /// Execute the sweep.
    ///
    /// # Panics
    ///
    /// Panics if called more than once on the same instance.
    pub async fn run(&mut self) -> Result<()> {
        assert!(
            !self.has_been_run,
            "SweepPipeline::run() called more than once"
        );
        self.has_been_run = true;

        let queue = QueueStore::new(self.config.queue_file.clone());

        if queue.exists() && !self.config.dry_run {
            return self.resume(&queue).await;
        }

        let paths = self.scan_and_filter().await?;
        self.stats.found = paths.len() as u64;

        if paths.is_empty() {
            info!(target = %self.config.target, "no @eaDir directories found.");
            return Ok(());
        }

        info!(
            found = paths.len(),
            target = %self.config.target,
            "@eaDir directories found."
        );

        if self.config.dry_run {
            for path in &paths {
                info!(path = %path, "would delete.");
            }
            self.stats.remaining = paths.len() as u64;
            return Ok(());
        }

        self.safety_checker.check_before_deletion(paths.len())?;

        queue.create(&paths)?;
        self.drain(&queue).await
    }

    async fn resume(&mut self, queue: &QueueStore) -> Result<()> {
        let remaining = queue.size()?;
        self.stats.found = remaining as u64;

        warn!(
            remaining,
            queue_file = %queue.path().display(),
            "existing queue file found, resuming previous run."
        );

        if remaining == 0 {
            // A fully drained queue whose removal was interrupted.
            queue.destroy()?;
            return Ok(());
        }

        self.drain(queue).await
    }

    async fn scan_and_filter(&self) -> Result<Vec<crate::types::EaDirPath>> {
        if self.cancellation_token.is_cancelled() {
            return Err(anyhow!(EadirmError::Cancelled));
        }

        let base_path = self.config.target.base_path_trimmed();
        debug!(target = %self.config.target, "scanning remote tree.");

        let lister = TreeLister::new(self.shell.as_ref());
        let entries = lister.list_base(base_path).await?;
        debug!(entries = entries.len(), "remote tree listed.");

        filter::normalize_listing(entries, &self.config.target)
    }

    async fn drain(&mut self, queue: &QueueStore) -> Result<()> {
        let deleter = BatchDeleter::new(
            self.shell.as_ref(),
            queue,
            self.config.batch_size,
            self.cancellation_token.clone(),
        );

        let deleted = deleter.drain().await;
        self.stats.deleted = match &deleted {
            Ok(n) => *n as u64,
            Err(_) => {
                let left = queue.size().unwrap_or(0) as u64;
                self.stats.found.saturating_sub(left)
            }
        };
        self.stats.remaining = if queue.exists() {
            queue.size().unwrap_or(0) as u64
        } else {
            0
        };
        deleted?;

        queue.destroy()?;
        info!(deleted = self.stats.deleted, "sweep complete.");
        Ok(())
    }
}
