use anyhow::{Result, anyhow};
use tracing::debug;

use crate::remote::RemoteShell;
use crate::types::error::EadirmError;

/// Enumerates the remote tree for the sweep pipeline.
///
/// Thin wrapper around [`RemoteShell::list_tree`]: the actual enumeration
/// mechanics (rsync dry-run invocation, diagnostic capture) live in the
/// shell implementation. The lister owns the semantic checks on the result.
///
/// ## Pipeline role
///
/// The TreeLister is the first stage of the pipeline:
///
/// ```text
/// TreeLister → Filter/Normalizer → QueueStore → BatchDeleter
/// ```
pub struct TreeLister<'a> {
    shell: &'a dyn RemoteShell,
}

impl<'a> TreeLister<'a> {
    pub fn new(shell: &'a dyn RemoteShell) -> Self {
        Self { shell }
    }

    /// List every file and directory path beneath `base_path`, relative to
    /// it.
    ///
    /// The enumeration tool reports the scanned directory itself as a `./`
    /// entry; that self-entry is dropped here. A successful but empty
    /// result fails with [`EadirmError::EmptySource`]: an existing base
    /// path that holds nothing at all almost always means the operator
    /// mistyped it, and no queue must be created from it.
    pub async fn list_base(&self, base_path: &str) -> Result<Vec<String>> {
        debug!(base_path, "remote tree listing has started.");

        let entries: Vec<String> = self
            .shell
            .list_tree(base_path)
            .await?
            .into_iter()
            .filter(|entry| entry != "./" && entry != ".")
            .collect();

        if entries.is_empty() {
            return Err(anyhow!(EadirmError::EmptySource));
        }

        debug!(
            entries = entries.len(),
            "remote tree listing has been completed."
        );
        Ok(entries)
    }
}
