//! Command dispatch module for routing CLI commands to their handlers.

use crate::cli::{Cli, Commands, ConfigCommands, Shell};
use crate::commands::config::{self as config_cmd, load_config};
use crate::commands::filter::FilterOptions;
use crate::commands::{self, CommandContext, CommandError, Result};

/// A parsed CLI command ready to run.
pub enum Dispatch<'a> {
    Filter(FilterOptions),
    Explain(&'a str),
    Config(&'a Option<ConfigCommands>),
    Completions(&'a Shell),
    Help,
}

impl<'a> Dispatch<'a> {
    /// Creates a dispatch from the CLI command.
    pub fn from_cli(cli: &'a Cli) -> Self {
        match &cli.command {
            Some(Commands::Filter {
                query,
                file,
                count,
                limit,
                fields,
            }) => Self::Filter(FilterOptions {
                query: query.clone(),
                file: file.clone(),
                count: *count,
                limit: *limit,
                fields: fields.clone(),
            }),
            Some(Commands::Explain { query }) => Self::Explain(query),
            Some(Commands::Config { command }) => Self::Config(command),
            Some(Commands::Completions { shell }) => Self::Completions(shell),
            None => Self::Help,
        }
    }

    /// Executes the command.
    pub fn execute(&self, ctx: &CommandContext) -> Result<()> {
        match self {
            Self::Filter(opts) => {
                let config = load_config()?;
                commands::filter::execute(&ctx.with_output(&config.output), opts, &config)
            }
            Self::Explain(query) => {
                let config = load_config()?;
                commands::explain::execute(&ctx.with_output(&config.output), query, &config)
            }
            Self::Config(command) => dispatch_config(ctx, command),
            Self::Completions(shell) => {
                commands::completions::execute(shell).map_err(CommandError::Io)
            }
            Self::Help => {
                if !ctx.quiet {
                    println!("qf - query filter");
                    println!("Use --help for usage information");
                }
                Ok(())
            }
        }
    }
}

fn dispatch_config(ctx: &CommandContext, command: &Option<ConfigCommands>) -> Result<()> {
    match command {
        None | Some(ConfigCommands::Show) => config_cmd::execute_show(ctx),
        Some(ConfigCommands::Path) => config_cmd::execute_path(ctx),
        Some(ConfigCommands::Init { force }) => config_cmd::execute_init(ctx, *force),
    }
}
