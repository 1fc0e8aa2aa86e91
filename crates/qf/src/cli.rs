//! CLI argument parsing using clap derive macros.
//!
//! This module defines the command-line interface for the qf CLI.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

/// qf - Filter JSON records with one-line queries
#[derive(Parser, Debug)]
#[command(name = "qf")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Verbose output (show debug information)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Quiet mode (errors only)
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Force JSON output
    #[arg(long, global = true)]
    pub json: bool,

    /// Disable colors in output (also disabled when NO_COLOR is set)
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print the records matching a query
    #[command(alias = "f")]
    Filter {
        /// Filter expression (e.g., "brand:ferrari & year>=2015")
        query: String,

        /// JSON array or JSON lines file (default: stdin)
        file: Option<PathBuf>,

        /// Only print the number of matching records
        #[arg(short, long)]
        count: bool,

        /// Stop after this many matches
        #[arg(short, long)]
        limit: Option<usize>,

        /// Field tested by values without a key (repeatable)
        #[arg(short = 'F', long = "field", action = clap::ArgAction::Append)]
        fields: Vec<String>,
    },

    /// Show how a query is parsed
    #[command(alias = "x")]
    Explain {
        /// Filter expression
        query: String,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        command: Option<ConfigCommands>,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        shell: Shell,
    },
}

/// Shell types for completions
#[derive(ValueEnum, Clone, Debug)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    Powershell,
}

/// Config subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show current configuration
    Show,

    /// Show config file path
    Path,

    /// Write the default config file
    Init {
        /// Overwrite an existing file
        #[arg(short, long)]
        force: bool,
    },
}
