//! Drains the deletion queue in fixed-size batches.

use anyhow::{Result, anyhow};
use tracing::{info, trace};

use crate::queue::QueueStore;
use crate::remote::RemoteShell;
use crate::types::error::EadirmError;
use crate::types::token::PipelineCancellationToken;

/// Removes queued paths over the remote shell, one batch at a time.
///
/// The queue head is truncated only after the remote delete for that batch
/// succeeds, so a failure or interruption at any point leaves the not yet
/// deleted entries intact for the next run. Batches run strictly one after
/// another.
pub struct BatchDeleter<'a> {
    shell: &'a dyn RemoteShell,
    queue: &'a QueueStore,
    batch_size: usize,
    cancellation_token: PipelineCancellationToken,
}

impl<'a> BatchDeleter<'a> {
    pub fn new(
        shell: &'a dyn RemoteShell,
        queue: &'a QueueStore,
        batch_size: usize,
        cancellation_token: PipelineCancellationToken,
    ) -> Self {
        debug_assert!(batch_size >= 1);
        Self {
            shell,
            queue,
            batch_size,
            cancellation_token,
        }
    }

    /// Delete every queued path, front to back. Returns the number deleted
    /// in this call.
    pub async fn drain(&self) -> Result<usize> {
        let mut deleted = 0;

        loop {
            if self.cancellation_token.is_cancelled() {
                trace!("batch deletion has been cancelled.");
                return Err(anyhow!(EadirmError::Cancelled));
            }

            let batch = self.queue.front(self.batch_size)?;
            if batch.is_empty() {
                break;
            }

            self.shell.remove_paths(&batch).await?;
            self.queue.remove_front(batch.len())?;

            deleted += batch.len();
            let remaining = self.queue.size()?;
            info!(deleted, remaining, "batch deleted.");
        }

        Ok(deleted)
    }
}
