//! `cloudctl databases` subcommands.

pub mod firewalls;

use crate::cli::DatabaseCommands;
use crate::error::CliResult;

use super::Action;

pub fn action(command: &DatabaseCommands) -> CliResult<Action> {
    match command {
        DatabaseCommands::Firewalls { command } => {
            firewalls::FirewallAction::from_command(command).map(Action::DatabaseFirewalls)
        }
    }
}
