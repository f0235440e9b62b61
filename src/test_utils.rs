//! Shared test utilities for the eadirm library crate.
//!
//! This module provides canonical helper functions used across multiple test
//! modules, eliminating duplication and ensuring consistency.

use crate::config::Config;
use crate::types::RemoteTarget;

/// Initialise a dummy tracing subscriber for tests.
///
/// Uses `try_init` so that only the first call in a process actually
/// installs the subscriber; subsequent calls are silently ignored.
pub(crate) fn init_dummy_tracing_subscriber() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("dummy=trace")
        .try_init();
}

/// Create a default [`Config`] suitable for most unit / property tests.
///
/// Key defaults: host=`"testhost"`, base path=`"/volume1/data"`,
/// `batch_size=100`, `force=true` (no interactive prompts).
pub(crate) fn make_test_config() -> Config {
    Config {
        target: RemoteTarget::new("testhost", "/volume1/data"),
        force: true,
        ..Config::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_has_no_prompts() {
        let config = make_test_config();
        assert!(config.force);
        assert!(!config.dry_run);
    }
}
