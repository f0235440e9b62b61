use std::fmt;

use crate::types::error::EadirmError;

pub mod error;
pub mod token;

/// Path segment name of the Synology metadata directories this tool removes.
pub const EA_DIR_SEGMENT: &str = "@eaDir";

/// Remote deletion target: a connection target plus an absolute base path.
///
/// The host string is opaque to this crate; anything the underlying
/// ssh/rsync mechanism resolves (`nas`, `admin@nas`, `admin@nas.local`) is
/// accepted. The base path must be absolute on the remote host.
#[derive(Debug, Clone, PartialEq)]
pub struct RemoteTarget {
    pub host: String,
    pub base_path: String,
}

impl RemoteTarget {
    pub fn new(host: impl Into<String>, base_path: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            base_path: base_path.into(),
        }
    }

    /// Base path without a trailing separator (except for the root path).
    pub fn base_path_trimmed(&self) -> &str {
        let trimmed = self.base_path.trim_end_matches('/');
        if trimmed.is_empty() { "/" } else { trimmed }
    }
}

impl fmt::Display for RemoteTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.host, self.base_path_trimmed())
    }
}

/// An absolute remote path whose final segment is exactly `@eaDir`.
///
/// The segment-boundary rule is strict: `@eaDir` must be delimited by `/` on
/// the left and end-of-string on the right, so `/data/@eaDirectory` and
/// `/data/x@eaDir` are rejected. Queue entries built from these values are
/// never equal to nor descendants of one another, because the filter
/// truncates at the first `@eaDir` segment.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EaDirPath(String);

impl EaDirPath {
    /// Validate and wrap an absolute `@eaDir` path.
    pub fn new(path: impl Into<String>) -> Result<Self, EadirmError> {
        let path = path.into();
        let valid = path.starts_with('/')
            && path.rsplit('/').next() == Some(EA_DIR_SEGMENT);
        if valid {
            Ok(Self(path))
        } else {
            Err(EadirmError::InvalidPath(path))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EaDirPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Counters reported to the operator at the end of a run.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SweepStats {
    /// Directories found by the scan (or loaded from a resumed queue).
    pub found: u64,
    /// Directories deleted during this run.
    pub deleted: u64,
    /// Directories still pending in the queue (non-zero only after a halt).
    pub remaining: u64,
}
