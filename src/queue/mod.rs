//! Durable on-disk deletion queue.
//!
//! One absolute `@eaDir` path per line, no header, no trailing metadata.
//! The file's mere presence is the public contract: non-existence triggers a
//! fresh scan, existence triggers resume, emptiness after generation means
//! nothing to do. Every mutation rewrites the whole file through a sibling
//! temp file followed by an atomic rename, so an interrupted run can never
//! leave a partial line behind. Two processes sharing one queue file are
//! unsupported.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Result, anyhow};
use tempfile::NamedTempFile;
use tracing::debug;

use crate::types::EaDirPath;
use crate::types::error::EadirmError;

/// Persistent, crash-consistent queue of paths pending deletion.
pub struct QueueStore {
    path: PathBuf,
}

impl QueueStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether a queue file from a prior or current run is present.
    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// Write the full ordered list, replacing any existing file.
    pub fn create(&self, paths: &[EaDirPath]) -> Result<()> {
        self.write_atomically(paths)?;
        debug!(entries = paths.len(), path = %self.path.display(), "queue file created.");
        Ok(())
    }

    /// Load and validate all remaining entries, preserving order.
    pub fn load(&self) -> Result<Vec<EaDirPath>> {
        let content = fs::read_to_string(&self.path)
            .map_err(|e| anyhow!(EadirmError::Io(format!("{}: {e}", self.path.display()))))?;

        let mut entries = Vec::new();
        for line in content.lines() {
            if line.is_empty() {
                continue;
            }
            entries.push(EaDirPath::new(line)?);
        }
        Ok(entries)
    }

    /// Count of remaining entries.
    pub fn size(&self) -> Result<usize> {
        Ok(self.load()?.len())
    }

    /// Up to `n` entries from the front of the queue, in order.
    pub fn front(&self, n: usize) -> Result<Vec<EaDirPath>> {
        let mut entries = self.load()?;
        entries.truncate(n);
        Ok(entries)
    }

    /// Delete the first `n` entries, preserving the order of the rest.
    ///
    /// Atomic with respect to interruption: either the old file or the new
    /// file exists in full, never a torn in-between. A crash after the
    /// remote deletion but before this rename re-attempts the batch on
    /// resume, which the idempotent remote delete tolerates.
    pub fn remove_front(&self, n: usize) -> Result<()> {
        let entries = self.load()?;
        let remaining = entries.get(n.min(entries.len())..).unwrap_or(&[]);
        self.write_atomically(remaining)?;
        debug!(
            removed = n.min(entries.len()),
            remaining = remaining.len(),
            "queue head truncated."
        );
        Ok(())
    }

    /// Remove the store entirely. Called only once the queue is drained.
    pub fn destroy(&self) -> Result<()> {
        fs::remove_file(&self.path)
            .map_err(|e| anyhow!(EadirmError::Io(format!("{}: {e}", self.path.display()))))?;
        debug!(path = %self.path.display(), "queue file removed.");
        Ok(())
    }

    fn write_atomically(&self, paths: &[EaDirPath]) -> Result<()> {
        let dir = self.path.parent().filter(|p| !p.as_os_str().is_empty());
        let mut temp = match dir {
            Some(dir) => NamedTempFile::new_in(dir),
            None => NamedTempFile::new_in("."),
        }
        .map_err(|e| anyhow!(EadirmError::Io(format!("temp queue file: {e}"))))?;

        for path in paths {
            writeln!(temp, "{path}")
                .map_err(|e| anyhow!(EadirmError::Io(format!("writing queue: {e}"))))?;
        }
        temp.flush()
            .map_err(|e| anyhow!(EadirmError::Io(format!("flushing queue: {e}"))))?;

        temp.persist(&self.path)
            .map_err(|e| anyhow!(EadirmError::Io(format!("{}: {e}", self.path.display()))))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::test_utils::init_dummy_tracing_subscriber;

    fn eadir(path: &str) -> EaDirPath {
        EaDirPath::new(path).unwrap()
    }

    fn sample_paths(n: usize) -> Vec<EaDirPath> {
        (0..n)
            .map(|i| eadir(&format!("/data/dir{i:03}/@eaDir")))
            .collect()
    }

    fn store_in(dir: &tempfile::TempDir) -> QueueStore {
        QueueStore::new(dir.path().join("to_delete_queue.txt"))
    }

    #[test]
    fn exists_false_before_create() {
        init_dummy_tracing_subscriber();

        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        assert!(!store.exists());
    }

    #[test]
    fn create_load_round_trip() {
        init_dummy_tracing_subscriber();

        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        let paths = sample_paths(5);

        store.create(&paths).unwrap();
        assert!(store.exists());
        assert_eq!(store.load().unwrap(), paths);
        assert_eq!(store.size().unwrap(), 5);
    }

    #[test]
    fn file_format_is_one_path_per_line() {
        init_dummy_tracing_subscriber();

        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        store
            .create(&[eadir("/a/@eaDir"), eadir("/b c/@eaDir")])
            .unwrap();

        let content = fs::read_to_string(store.path()).unwrap();
        assert_eq!(content, "/a/@eaDir\n/b c/@eaDir\n");
    }

    #[test]
    fn front_returns_ordered_prefix() {
        init_dummy_tracing_subscriber();

        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        let paths = sample_paths(10);
        store.create(&paths).unwrap();

        assert_eq!(store.front(3).unwrap(), &paths[..3]);
        // Asking for more than available returns everything.
        assert_eq!(store.front(100).unwrap(), paths);
    }

    #[test]
    fn remove_front_preserves_remaining_order() {
        init_dummy_tracing_subscriber();

        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        let paths = sample_paths(10);
        store.create(&paths).unwrap();

        store.remove_front(4).unwrap();
        assert_eq!(store.load().unwrap(), &paths[4..]);

        store.remove_front(100).unwrap();
        assert_eq!(store.size().unwrap(), 0);
        assert!(store.exists());
    }

    #[test]
    fn destroy_removes_the_file() {
        init_dummy_tracing_subscriber();

        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        store.create(&sample_paths(1)).unwrap();

        store.destroy().unwrap();
        assert!(!store.exists());
    }

    #[test]
    fn load_missing_file_is_io_error() {
        init_dummy_tracing_subscriber();

        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);

        let err = store.load().unwrap_err();
        assert!(matches!(
            err.downcast_ref::<EadirmError>(),
            Some(EadirmError::Io(_))
        ));
    }

    #[test]
    fn load_rejects_corrupt_entries() {
        init_dummy_tracing_subscriber();

        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        fs::write(store.path(), "/a/@eaDir\nnot-an-eadir-path\n").unwrap();

        let err = store.load().unwrap_err();
        assert_eq!(
            err.downcast_ref::<EadirmError>(),
            Some(&EadirmError::InvalidPath("not-an-eadir-path".to_string()))
        );
    }

    #[test]
    fn load_skips_blank_lines() {
        init_dummy_tracing_subscriber();

        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        fs::write(store.path(), "/a/@eaDir\n\n/b/@eaDir\n").unwrap();

        assert_eq!(
            store.load().unwrap(),
            vec![eadir("/a/@eaDir"), eadir("/b/@eaDir")]
        );
    }

    #[test]
    fn create_overwrites_existing_queue() {
        init_dummy_tracing_subscriber();

        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        store.create(&sample_paths(5)).unwrap();
        store.create(&sample_paths(2)).unwrap();
        assert_eq!(store.size().unwrap(), 2);
    }

    mod property_tests {
        use super::*;
        use proptest::prelude::*;

        // remove_front(n) always leaves exactly the suffix after n,
        // regardless of queue size and n.
        proptest! {
            #![proptest_config(ProptestConfig::with_cases(64))]

            #[test]
            fn remove_front_leaves_exact_suffix(len in 0usize..40, n in 0usize..50) {
                let dir = tempfile::tempdir().unwrap();
                let store = store_in(&dir);
                let paths = sample_paths(len);
                store.create(&paths).unwrap();

                store.remove_front(n).unwrap();
                let expected: &[EaDirPath] = paths.get(n.min(len)..).unwrap_or(&[]);
                prop_assert_eq!(store.load().unwrap(), expected.to_vec());
            }
        }
    }
}
