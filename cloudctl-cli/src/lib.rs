//! cloudctl - command-line management of cloud infrastructure.
//!
//! The binary is a thin wrapper around [`run`]: it parses [`Cli`], sets up
//! logging and turns the result into an exit code with
//! [`error::handle_cli_result`].

pub mod cli;
pub mod commands;
pub mod context;
pub mod error;
pub mod exit_codes;
pub mod logging;
pub mod output;
pub mod rule_spec;
pub mod table;

pub use cli::{Cli, Commands, DatabaseCommands, FirewallCommands, OutputArg};
pub use commands::Action;
pub use context::CommandContext;
pub use error::{CliError, CliResult};

/// Validate the command, resolve configuration for `cli` and run it.
///
/// Arguments are checked before configuration is loaded, so invalid input
/// is reported even when the config file is broken. Returns the output to
/// write to stdout.
pub async fn run(cli: Cli) -> CliResult<String> {
    let action = Action::from_command(&cli.command)?;
    let ctx = CommandContext::from_cli(&cli)?;
    tracing::debug!(api_url = %ctx.config.api_url, output = %ctx.config.output, "running command");
    action.execute(&ctx).await
}
