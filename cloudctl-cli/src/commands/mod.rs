//! Command handlers.
//!
//! A parsed command becomes an [`Action`] first, which checks every argument
//! without touching the filesystem or network. Only a valid action is
//! executed against the resolved [`CommandContext`].

pub mod databases;

use crate::cli::Commands;
use crate::context::CommandContext;
use crate::error::CliResult;

use databases::firewalls::{self, FirewallAction};

/// A validated command, ready to execute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    DatabaseFirewalls(FirewallAction),
}

impl Action {
    pub fn from_command(command: &Commands) -> CliResult<Self> {
        match command {
            Commands::Databases { command } => databases::action(command),
        }
    }

    /// Execute and return the text to print on success.
    pub async fn execute(self, ctx: &CommandContext) -> CliResult<String> {
        match self {
            Action::DatabaseFirewalls(action) => firewalls::execute(action, ctx).await,
        }
    }
}
