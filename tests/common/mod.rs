//! Shared helpers for the end-to-end pipeline tests.

#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use anyhow::{Result, anyhow};
use async_trait::async_trait;

use eadirm_rs::config::Config;
use eadirm_rs::config::args::build_config_from_args;
use eadirm_rs::pipeline::SweepPipeline;
use eadirm_rs::remote::RemoteShell;
use eadirm_rs::types::error::EadirmError;
use eadirm_rs::types::token::create_pipeline_cancellation_token;
use eadirm_rs::types::{EaDirPath, SweepStats};

/// Remote shell double: serves a canned listing and records deletions.
///
/// Failure injection: `fail_listing` makes the scan fail, `fail_on_batch(i)`
/// makes the i-th (zero-based) deletion batch fail.
pub struct FakeRemoteShell {
    listing: Vec<String>,
    fail_listing: bool,
    fail_on_batch: Option<usize>,
    deleted: Arc<Mutex<Vec<Vec<EaDirPath>>>>,
}

impl FakeRemoteShell {
    pub fn new(listing: &[&str]) -> Self {
        Self {
            listing: listing.iter().map(|s| s.to_string()).collect(),
            fail_listing: false,
            fail_on_batch: None,
            deleted: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn with_failing_listing() -> Self {
        Self {
            fail_listing: true,
            ..Self::new(&[])
        }
    }

    pub fn fail_on_batch(mut self, batch_index: usize) -> Self {
        self.fail_on_batch = Some(batch_index);
        self
    }

    /// Handle to the recorded deletion batches, valid after the shell has
    /// been moved into a pipeline.
    pub fn deleted_record(&self) -> Arc<Mutex<Vec<Vec<EaDirPath>>>> {
        self.deleted.clone()
    }
}

impl Default for FakeRemoteShell {
    fn default() -> Self {
        Self::new(&[])
    }
}

#[async_trait]
impl RemoteShell for FakeRemoteShell {
    async fn list_tree(&self, _base_path: &str) -> Result<Vec<String>> {
        if self.fail_listing {
            return Err(anyhow!(EadirmError::Scan(
                "ssh: connect to host nas port 22: Connection refused".to_string()
            )));
        }
        Ok(self.listing.clone())
    }

    async fn remove_paths(&self, paths: &[EaDirPath]) -> Result<()> {
        let mut deleted = self.deleted.lock().unwrap();
        if self.fail_on_batch == Some(deleted.len()) {
            return Err(anyhow!(EadirmError::BatchDeletion(
                "rm: cannot remove: Permission denied".to_string()
            )));
        }
        deleted.push(paths.to_vec());
        Ok(())
    }
}

/// Per-test state: an isolated working directory for the queue file.
pub struct TestHelper {
    temp_dir: tempfile::TempDir,
}

impl TestHelper {
    pub fn new() -> Self {
        Self {
            temp_dir: tempfile::tempdir().unwrap(),
        }
    }

    pub fn queue_path(&self) -> PathBuf {
        self.temp_dir.path().join("to_delete_queue.txt")
    }

    pub fn queue_exists(&self) -> bool {
        self.queue_path().exists()
    }

    pub fn queue_content(&self) -> String {
        std::fs::read_to_string(self.queue_path()).unwrap()
    }

    /// Build a config through the real CLI parser, pointing the queue file
    /// at this helper's temp directory.
    pub fn build_config(&self, extra_args: Vec<&str>) -> Config {
        let queue_file = self.queue_path();
        let mut args = vec!["eadirm", "--force", "nas:/data", "--queue-file"];
        let queue_file_str = queue_file.to_str().unwrap();
        args.push(queue_file_str);
        args.extend(extra_args);
        build_config_from_args(args).unwrap()
    }

    /// Run a full sweep over the given shell. Returns the run result and
    /// the final statistics.
    pub async fn run_pipeline(
        config: Config,
        shell: FakeRemoteShell,
    ) -> (Result<()>, SweepStats) {
        let mut pipeline = SweepPipeline::with_shell(
            config,
            Box::new(shell),
            create_pipeline_cancellation_token(),
        );
        let result = pipeline.run().await;
        (result, pipeline.stats())
    }
}

/// Flatten recorded batches into plain path strings.
pub fn flatten(record: &Arc<Mutex<Vec<Vec<EaDirPath>>>>) -> Vec<String> {
    record
        .lock()
        .unwrap()
        .iter()
        .flatten()
        .map(|p| p.as_str().to_string())
        .collect()
}
