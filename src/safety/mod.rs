//! Safeguards against accidental remote deletion.
//!
//! - Confirmation prompt: requires exact "yes" input before any `rm -rf`
//! - Dry-run mode: skips confirmation, nothing destructive will run
//! - Force flag: skips confirmation for unattended use
//! - Non-TTY detection: skips prompts in non-interactive environments
//! - JSON logging: skips prompts to avoid corrupting structured output

use std::io::{BufRead, IsTerminal, Write};

use anyhow::{Result, anyhow};

use crate::config::Config;
use crate::types::error::EadirmError;

/// Trait for handling user prompts, enabling testability.
///
/// The default implementation ([`StdioPromptHandler`]) uses stdin/stdout.
/// Tests can provide custom implementations to avoid blocking on user input.
pub trait PromptHandler: Send + Sync {
    /// Display the confirmation prompt and read a line of user input.
    ///
    /// Returns the trimmed user input string.
    fn read_confirmation(&self, found: usize) -> Result<String>;

    /// Check if the current environment supports interactive prompts.
    ///
    /// Returns `true` if both stdin and stdout are connected to a TTY.
    fn is_interactive(&self) -> bool;
}

/// Default prompt handler using stdin/stdout.
///
/// Uses `print!` for the prompt (not tracing) so the question reaches the
/// terminal regardless of the configured log level.
pub struct StdioPromptHandler;

impl PromptHandler for StdioPromptHandler {
    fn read_confirmation(&self, found: usize) -> Result<String> {
        print!("About to delete {found} @eaDir directories. Type 'yes' to confirm: ");
        std::io::stdout().flush()?;

        let mut input = String::new();
        std::io::stdin().lock().read_line(&mut input)?;
        Ok(input.trim().to_string())
    }

    fn is_interactive(&self) -> bool {
        std::io::stdin().is_terminal() && std::io::stdout().is_terminal()
    }
}

/// Validates preconditions before the destructive phase of a sweep.
///
/// Checks run in a defined order:
/// 1. Dry-run mode check (nothing destructive will run)
/// 2. Force flag check (unattended use)
/// 3. Environment check (non-TTY or JSON logging)
/// 4. User confirmation prompt (require exact "yes" input)
pub struct SafetyChecker {
    dry_run: bool,
    force: bool,
    json_logging: bool,
    prompt_handler: Box<dyn PromptHandler>,
}

impl SafetyChecker {
    /// Create a new SafetyChecker from the sweep configuration.
    ///
    /// Uses [`StdioPromptHandler`] for interactive prompts.
    pub fn new(config: &Config) -> Self {
        Self::with_prompt_handler(config, Box::new(StdioPromptHandler))
    }

    /// Create a SafetyChecker with a custom prompt handler (for testing).
    pub fn with_prompt_handler(config: &Config, prompt_handler: Box<dyn PromptHandler>) -> Self {
        let json_logging = config
            .tracing_config
            .as_ref()
            .map(|tc| tc.json_tracing)
            .unwrap_or(false);

        Self {
            dry_run: config.dry_run,
            force: config.force,
            json_logging,
            prompt_handler,
        }
    }

    /// Check all safety preconditions before starting the deletion phase.
    ///
    /// Returns `Ok(())` if the sweep should proceed, or
    /// `Err(EadirmError::Cancelled)` if the user declines confirmation.
    pub fn check_before_deletion(&self, found: usize) -> Result<()> {
        if self.dry_run {
            return Ok(());
        }

        if self.force {
            return Ok(());
        }

        if self.should_skip_prompt() {
            return Ok(());
        }

        self.prompt_confirmation(found)
    }

    /// Determine if prompts should be skipped due to environment conditions.
    fn should_skip_prompt(&self) -> bool {
        // JSON logging would interleave the prompt with structured output.
        if self.json_logging {
            return true;
        }

        if !self.prompt_handler.is_interactive() {
            return true;
        }

        false
    }

    /// Prompt the user and require an exact "yes" to proceed.
    fn prompt_confirmation(&self, found: usize) -> Result<()> {
        let input = self.prompt_handler.read_confirmation(found)?;

        if input != "yes" {
            return Err(anyhow!(EadirmError::Cancelled));
        }

        Ok(())
    }
}
