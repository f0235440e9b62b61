use anyhow::Error;
use thiserror::Error;

/// Application-level error types for eadirm-rs.
///
/// These represent errors that occur while scanning the remote tree,
/// maintaining the local deletion queue, and running batched remote
/// deletions.
///
/// ## Exit Codes
///
/// Each variant maps to an exit code (via `exit_code()`):
/// - 0: success (full drain, nothing to do, dry-run)
/// - 1: general errors (Scan, Io, BatchDeletion, InvalidPath)
/// - 2: configuration errors (InvalidConfig)
/// - 3: empty source (scan succeeded but found nothing, likely a path typo)
/// - 130: cancelled (declined confirmation prompt or ctrl-c)
#[derive(Error, Debug, PartialEq)]
pub enum EadirmError {
    /// The remote enumeration could not reach or read the base path.
    /// Carries the diagnostic output captured from the listing tool.
    #[error("remote scan failed: {0}")]
    Scan(String),

    /// Enumeration succeeded but the base path holds nothing.
    /// Reported distinctly from `Scan` because it usually indicates a
    /// mistyped path rather than a transport failure.
    #[error("remote path exists but its listing is empty - check the base path")]
    EmptySource,

    /// Local queue file could not be created, read, or updated.
    #[error("queue I/O error: {0}")]
    Io(String),

    /// A remote delete command exited non-zero. The queue is left exactly
    /// as it was before the failing batch; re-running the tool resumes.
    #[error("batch deletion failed (queue preserved, re-run to resume): {0}")]
    BatchDeletion(String),

    /// A path failed `EaDirPath` validation (e.g. a corrupt queue entry).
    #[error("invalid @eaDir path: {0}")]
    InvalidPath(String),

    /// Configuration error (CLI validation).
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Operation cancelled: the operator declined the confirmation prompt
    /// or interrupted the run. The queue file (if any) is preserved.
    #[error("operation cancelled by user")]
    Cancelled,
}

impl EadirmError {
    /// Get the appropriate process exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            EadirmError::InvalidConfig(_) => 2,
            EadirmError::EmptySource => 3,
            EadirmError::Cancelled => 130,
            _ => 1,
        }
    }
}

/// Check if an anyhow::Error wraps a cancellation error.
///
/// Used by the CLI to distinguish a user abort (queue intact, resumable)
/// from a genuine failure.
pub fn is_cancelled_error(e: &Error) -> bool {
    if let Some(err) = e.downcast_ref::<EadirmError>() {
        return *err == EadirmError::Cancelled;
    }
    false
}

/// Extract the exit code from an anyhow::Error, defaulting to 1.
pub fn exit_code_from_error(e: &Error) -> i32 {
    if let Some(err) = e.downcast_ref::<EadirmError>() {
        return err.exit_code();
    }
    1
}
