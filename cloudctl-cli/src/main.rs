//! cloudctl - manage cloud infrastructure from the command line.
//!
//! Commands:
//! - `cloudctl databases firewalls list <cluster-id>`
//! - `cloudctl databases firewalls update <cluster-id> --rules <type>:<value>`
//! - `cloudctl databases firewalls append <cluster-id> --rules <type>:<value>`
//! - `cloudctl databases firewalls remove <cluster-id> --uuid <rule-uuid>`
//!
//! Exit codes:
//! - 0: Success
//! - 1: API, network or configuration error
//! - 2: Invalid arguments
//! - 3: Authentication failure

use clap::Parser;

use cloudctl::error::handle_cli_result;
use cloudctl::{logging, Cli};

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    let result = cloudctl::run(cli).await.map(|output| print!("{output}"));
    std::process::exit(handle_cli_result(result));
}
