//! Command implementations for the qf CLI.
//!
//! This module contains the actual command handlers that are invoked by the CLI.

pub mod completions;
pub mod config;
pub mod explain;
pub mod filter;

use std::ffi::OsString;

use crate::cli::Cli;
use config::OutputConfig;

/// Error type for command execution.
#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),

    /// Malformed input records.
    #[error("invalid input: {0}")]
    Input(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error.
    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for command execution.
pub type Result<T> = std::result::Result<T, CommandError>;

/// Context for command execution, containing common dependencies.
pub struct CommandContext {
    /// Whether to output JSON.
    pub json_output: bool,
    /// Whether to use colors.
    pub use_colors: bool,
    /// Whether to be quiet (errors only).
    pub quiet: bool,
}

impl CommandContext {
    /// Creates a new command context from CLI arguments.
    pub fn from_cli(cli: &Cli) -> Self {
        Self::from_cli_with_env(cli, std::env::var_os("NO_COLOR"))
    }

    /// Creates a context from CLI arguments and the `NO_COLOR` value.
    ///
    /// Any non-empty `NO_COLOR` disables colors, per no-color.org.
    fn from_cli_with_env(cli: &Cli, no_color_env: Option<OsString>) -> Self {
        let env_disables = no_color_env.is_some_and(|value| !value.is_empty());
        Self {
            json_output: cli.json,
            use_colors: !cli.no_color && !env_disables,
            quiet: cli.quiet,
        }
    }

    /// Applies the config file's output settings. `--no-color` always wins.
    pub fn with_output(&self, output: &OutputConfig) -> Self {
        Self {
            json_output: self.json_output,
            use_colors: self.use_colors && output.color.unwrap_or(true),
            quiet: self.quiet,
        }
    }
}
