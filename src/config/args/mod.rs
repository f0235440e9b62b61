use std::ffi::OsString;
use std::path::PathBuf;

use clap::Parser;
use clap::builder::NonEmptyStringValueParser;
use clap_verbosity_flag::{InfoLevel, Verbosity};

use crate::config::{Config, DEFAULT_BATCH_SIZE, DEFAULT_QUEUE_FILE, TracingConfig};
use crate::types::RemoteTarget;


// ---------------------------------------------------------------------------
// Default constants
// ---------------------------------------------------------------------------

const DEFAULT_DRY_RUN: bool = false;
const DEFAULT_FORCE: bool = false;
const DEFAULT_JSON_TRACING: bool = false;
const DEFAULT_SPAN_EVENTS_TRACING: bool = false;
const DEFAULT_DISABLE_COLOR_TRACING: bool = false;
const DEFAULT_SSH_PROGRAM: &str = "ssh";
const DEFAULT_RSYNC_PROGRAM: &str = "rsync";

// ---------------------------------------------------------------------------
// Error messages
// ---------------------------------------------------------------------------

const ERROR_MESSAGE_INVALID_TARGET: &str =
    "Target must be HOST:/absolute/path (e.g., admin@nas:/volume1/music).";
const ERROR_MESSAGE_BATCH_SIZE_ZERO: &str = "Batch size must be at least 1.";

// ---------------------------------------------------------------------------
// Value parser helpers
// ---------------------------------------------------------------------------

/// Validate `HOST:/absolute/path` without splitting it yet.
fn check_remote_target(s: &str) -> Result<String, String> {
    match split_remote_target(s) {
        Some(_) => Ok(s.to_string()),
        None => Err(ERROR_MESSAGE_INVALID_TARGET.to_string()),
    }
}

/// Split `HOST:/absolute/path` at the first colon.
///
/// The host part is opaque (user@host accepted); the path part must be
/// absolute and non-empty.
fn split_remote_target(s: &str) -> Option<(&str, &str)> {
    let (host, path) = s.split_once(':')?;
    if host.is_empty() || !path.starts_with('/') {
        return None;
    }
    Some((host, path))
}

// ---------------------------------------------------------------------------
// CLIArgs (clap-derived argument struct)
// ---------------------------------------------------------------------------

/// eadirm - remove Synology @eaDir metadata directories over a slow remote
/// shell.
///
/// Scans the remote tree once with an rsync dry-run listing, writes the
/// found @eaDir directories to a local queue file, and drains the queue in
/// batches of `rm -rf` over ssh. Interrupted runs resume from the queue file
/// without re-scanning.
///
/// Example:
///   eadirm admin@nas:/volume1/music --dry-run
///   eadirm admin@nas:/volume1/music --batch-size 50 --force
#[derive(Parser, Clone, Debug)]
#[command(name = "eadirm", version, about, long_about = None)]
pub struct CLIArgs {
    /// Remote target: HOST:/absolute/path
    #[arg(env = "EADIRM_TARGET", help = "HOST:/absolute/path", value_parser = check_remote_target)]
    pub target: String,

    // -----------------------------------------------------------------------
    // General options
    // -----------------------------------------------------------------------
    /// Simulation mode. Scans and reports @eaDir directories but writes no
    /// queue file and deletes nothing.
    #[arg(short = 'd', long, env = "EADIRM_DRY_RUN", default_value_t = DEFAULT_DRY_RUN, help_heading = "General")]
    pub dry_run: bool,

    // -----------------------------------------------------------------------
    // Deletion options
    // -----------------------------------------------------------------------
    /// Number of paths deleted per remote round-trip. Default: 100.
    #[arg(long, env = "EADIRM_BATCH_SIZE", default_value_t = DEFAULT_BATCH_SIZE, help_heading = "Deletion")]
    pub batch_size: usize,

    /// Local queue file holding the paths still pending deletion. Its
    /// presence on disk makes the next run resume instead of re-scanning.
    #[arg(long, env = "EADIRM_QUEUE_FILE", default_value = DEFAULT_QUEUE_FILE, help_heading = "Deletion")]
    pub queue_file: PathBuf,

    // -----------------------------------------------------------------------
    // Safety options
    // -----------------------------------------------------------------------
    /// Skip confirmation prompt before deleting.
    #[arg(short = 'f', long, env = "EADIRM_FORCE", default_value_t = DEFAULT_FORCE, help_heading = "Safety")]
    pub force: bool,

    // -----------------------------------------------------------------------
    // Remote access options
    // -----------------------------------------------------------------------
    /// Program used for remote command execution.
    #[arg(long, env = "EADIRM_SSH_PROGRAM", default_value = DEFAULT_SSH_PROGRAM,
        value_parser = NonEmptyStringValueParser::new(), help_heading = "Remote")]
    pub ssh_program: String,

    /// Program used for the dry-run tree listing.
    #[arg(long, env = "EADIRM_RSYNC_PROGRAM", default_value = DEFAULT_RSYNC_PROGRAM,
        value_parser = NonEmptyStringValueParser::new(), help_heading = "Remote")]
    pub rsync_program: String,

    // -----------------------------------------------------------------------
    // Logging options
    // -----------------------------------------------------------------------
    /// Verbosity level. -q (quiet), default (info), -v, -vv.
    #[command(flatten)]
    pub verbosity: Verbosity<InfoLevel>,

    /// Output logs in JSON format.
    #[arg(long, env = "EADIRM_JSON_TRACING", default_value_t = DEFAULT_JSON_TRACING, help_heading = "Logging")]
    pub json_tracing: bool,

    /// Enable tracing span events.
    #[arg(long, env = "EADIRM_SPAN_EVENTS_TRACING", default_value_t = DEFAULT_SPAN_EVENTS_TRACING, help_heading = "Logging")]
    pub span_events_tracing: bool,

    /// Disable colored output in logs.
    #[arg(long, env = "EADIRM_DISABLE_COLOR_TRACING", default_value_t = DEFAULT_DISABLE_COLOR_TRACING, help_heading = "Logging")]
    pub disable_color_tracing: bool,
}

impl CLIArgs {
    fn validate(&self) -> Result<(), String> {
        if self.batch_size == 0 {
            return Err(ERROR_MESSAGE_BATCH_SIZE_ZERO.to_string());
        }
        Ok(())
    }

    fn parse_target(&self) -> Result<RemoteTarget, String> {
        let (host, path) =
            split_remote_target(&self.target).ok_or(ERROR_MESSAGE_INVALID_TARGET)?;
        Ok(RemoteTarget::new(host, path))
    }

    fn build_tracing_config(&self) -> Option<TracingConfig> {
        let tracing_level = self.verbosity.log_level()?;
        Some(TracingConfig {
            tracing_level,
            json_tracing: self.json_tracing,
            span_events_tracing: self.span_events_tracing,
            disable_color_tracing: self.disable_color_tracing,
        })
    }
}

impl TryFrom<CLIArgs> for Config {
    type Error = String;

    fn try_from(args: CLIArgs) -> Result<Self, Self::Error> {
        args.validate()?;

        let target = args.parse_target()?;
        let tracing_config = args.build_tracing_config();

        Ok(Config {
            target,
            batch_size: args.batch_size,
            queue_file: args.queue_file,
            force: args.force,
            dry_run: args.dry_run,
            ssh_program: args.ssh_program,
            rsync_program: args.rsync_program,
            tracing_config,
        })
    }
}

// ---------------------------------------------------------------------------
// parse_from_args (public API)
// ---------------------------------------------------------------------------

/// Parse CLI arguments from an iterator of strings.
///
/// # Example
///
/// ```
/// use eadirm_rs::config::args::parse_from_args;
///
/// let args = vec!["eadirm", "nas:/volume1/music", "--dry-run"];
/// let cli_args = parse_from_args(args).unwrap();
/// assert!(cli_args.dry_run);
/// ```
pub fn parse_from_args<I, T>(args: I) -> Result<CLIArgs, clap::Error>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    CLIArgs::try_parse_from(args)
}

/// Convenience function that combines `parse_from_args` and
/// `Config::try_from`.
pub fn build_config_from_args<I, T>(args: I) -> Result<Config, String>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let cli_args = parse_from_args(args).map_err(|e| e.to_string())?;
    Config::try_from(cli_args)
}
