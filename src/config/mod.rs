pub mod args;

use std::path::PathBuf;

use crate::types::RemoteTarget;

/// Default number of paths deleted per remote round-trip.
pub const DEFAULT_BATCH_SIZE: usize = 100;

/// Default on-disk queue file, relative to the working directory.
pub const DEFAULT_QUEUE_FILE: &str = "to_delete_queue.txt";

/// Main configuration for the eadirm-rs sweep pipeline.
///
/// Holds all settings needed to configure and run a
/// [`SweepPipeline`](crate::SweepPipeline): the remote target, batch size,
/// queue file location, safety flags (dry-run, force), and the programs used
/// for remote access.
///
/// # Quick Start
///
/// Use [`Config::for_target`] for a minimal configuration with sensible
/// defaults:
///
/// ```
/// use eadirm_rs::Config;
///
/// let config = Config::for_target("admin@nas", "/volume1/music");
/// assert_eq!(config.batch_size, 100);
/// assert!(config.force); // no interactive prompts
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    pub target: RemoteTarget,
    /// Number of queue entries deleted per remote command.
    pub batch_size: usize,
    /// Local queue file. Its presence on disk is the resume signal.
    pub queue_file: PathBuf,
    /// Skip the confirmation prompt.
    pub force: bool,
    /// Scan and report, but create no queue and delete nothing.
    pub dry_run: bool,
    /// Program used for remote command execution.
    pub ssh_program: String,
    /// Program used for the dry-run tree listing.
    pub rsync_program: String,
    pub tracing_config: Option<TracingConfig>,
}

impl Config {
    /// Create a `Config` with sensible defaults for the given host and
    /// remote base path.
    ///
    /// This is the recommended way to construct a `Config` for library
    /// usage. The `force` flag is set to `true` to skip interactive
    /// confirmation prompts, which is appropriate for programmatic use.
    pub fn for_target(host: &str, base_path: &str) -> Self {
        Config {
            target: RemoteTarget::new(host, base_path),
            force: true,
            ..Config::default()
        }
    }
}

impl Default for Config {
    /// Create a `Config` with production defaults. The `target` defaults to
    /// empty strings; set it before running a pipeline.
    fn default() -> Self {
        Config {
            target: RemoteTarget::new("", ""),
            batch_size: DEFAULT_BATCH_SIZE,
            queue_file: PathBuf::from(DEFAULT_QUEUE_FILE),
            force: false,
            dry_run: false,
            ssh_program: "ssh".to_string(),
            rsync_program: "rsync".to_string(),
            tracing_config: None,
        }
    }
}

/// Tracing (logging) configuration.
///
/// Supports verbosity levels, JSON format, span events, and color control.
#[derive(Debug, Clone, Copy)]
pub struct TracingConfig {
    pub tracing_level: log::Level,
    pub json_tracing: bool,
    pub span_events_tracing: bool,
    pub disable_color_tracing: bool,
}

impl Default for TracingConfig {
    fn default() -> Self {
        TracingConfig {
            tracing_level: log::Level::Info,
            json_tracing: false,
            span_events_tracing: false,
            disable_color_tracing: false,
        }
    }
}
