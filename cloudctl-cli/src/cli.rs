//! CLI definition for the cloudctl command-line interface.
//!
//! This module only depends on `clap` and `std`; values are validated and
//! converted by the command handlers.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

/// cloudctl - manage cloud infrastructure from the command line.
#[derive(Parser, Debug)]
#[command(name = "cloudctl")]
#[command(version)]
#[command(about = "Manage cloud infrastructure resources through the cloud API")]
#[command(
    long_about = "cloudctl manages cloud infrastructure resources through the cloud REST API.\n\n\
    Settings are read from, in increasing precedence: the config file, environment \
    variables, and command-line flags.\n\n\
    Environment variables:\n  \
    CLOUDCTL_ACCESS_TOKEN  API access token\n  \
    CLOUDCTL_API_URL       Override the API URL\n  \
    CLOUDCTL_TIMEOUT_SECS  Per-request timeout in seconds\n  \
    CLOUDCTL_OUTPUT        Output format (text or json)\n  \
    CLOUDCTL_CONFIG        Path to the config file"
)]
pub struct Cli {
    /// API access token
    #[arg(short = 't', long, global = true, value_name = "TOKEN")]
    pub access_token: Option<String>,

    /// Override the API URL
    #[arg(short = 'u', long, global = true, value_name = "URL")]
    pub api_url: Option<String>,

    /// Path to a YAML, TOML or JSON config file
    #[arg(short, long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Output format
    #[arg(short, long, global = true, value_enum)]
    pub output: Option<OutputArg>,

    /// Columns to display, comma separated (e.g. UUID,Type,Value)
    #[arg(long, global = true, value_delimiter = ',', value_name = "COLUMNS")]
    pub format: Option<Vec<String>>,

    /// Omit the table header
    #[arg(long, global = true)]
    pub no_header: bool,

    /// Per-request timeout in seconds
    #[arg(long, global = true, value_name = "SECONDS")]
    pub timeout: Option<u64>,

    /// Enable debug logging to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Output formats accepted by `--output`.
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputArg {
    Text,
    Json,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Manage managed database clusters
    #[command(visible_alias = "db")]
    Databases {
        #[command(subcommand)]
        command: DatabaseCommands,
    },
}

#[derive(Subcommand, Debug)]
pub enum DatabaseCommands {
    /// Manage the firewall rules of a database cluster
    ///
    /// Firewall rules restrict which sources may connect to a cluster. Each
    /// rule has a type (ip_addr, droplet, k8s, tag or app) and a value.
    #[command(visible_alias = "fw")]
    Firewalls {
        #[command(subcommand)]
        command: FirewallCommands,
    },
}

#[derive(Subcommand, Debug)]
pub enum FirewallCommands {
    /// List the firewall rules of a cluster
    #[command(visible_alias = "ls")]
    List {
        /// Database cluster ID
        cluster_id: String,
    },

    /// Replace the firewall rules of a cluster
    #[command(visible_alias = "u")]
    Update {
        /// Database cluster ID
        cluster_id: String,
        /// Rule as <type>:<value>; repeat the flag or separate rules with commas
        #[arg(long = "rules", required = true, value_delimiter = ',', value_name = "TYPE:VALUE")]
        rules: Vec<String>,
    },

    /// Add firewall rules to the existing rules of a cluster
    #[command(visible_alias = "a")]
    Append {
        /// Database cluster ID
        cluster_id: String,
        /// Rule as <type>:<value>; repeat the flag or separate rules with commas
        #[arg(long = "rules", required = true, value_delimiter = ',', value_name = "TYPE:VALUE")]
        rules: Vec<String>,
    },

    /// Remove one firewall rule from a cluster
    #[command(visible_alias = "rm")]
    Remove {
        /// Database cluster ID
        cluster_id: String,
        /// UUID of the rule to remove
        #[arg(long, value_name = "RULE_UUID")]
        uuid: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_update_with_globals_before_subcommand() {
        let cli = Cli::parse_from([
            "cloudctl",
            "-t",
            "some-magic-token",
            "-u",
            "http://127.0.0.1:1234",
            "databases",
            "firewalls",
            "update",
            "1",
            "--rules",
            "ip_addr:192.168.1.2",
        ]);

        assert_eq!(cli.access_token.as_deref(), Some("some-magic-token"));
        assert_eq!(cli.api_url.as_deref(), Some("http://127.0.0.1:1234"));
        let Commands::Databases {
            command:
                DatabaseCommands::Firewalls {
                    command: FirewallCommands::Update { cluster_id, rules },
                },
        } = cli.command
        else {
            panic!("expected update command");
        };
        assert_eq!(cluster_id, "1");
        assert_eq!(rules, vec!["ip_addr:192.168.1.2"]);
    }

    #[test]
    fn test_parse_repeated_and_comma_separated_rules() {
        let cli = Cli::parse_from([
            "cloudctl",
            "db",
            "fw",
            "u",
            "1",
            "--rules",
            "ip_addr:10.0.0.1,tag:web",
            "--rules",
            "k8s:abc",
        ]);
        let Commands::Databases {
            command:
                DatabaseCommands::Firewalls {
                    command: FirewallCommands::Update { rules, .. },
                },
        } = cli.command
        else {
            panic!("expected update command");
        };
        assert_eq!(rules, vec!["ip_addr:10.0.0.1", "tag:web", "k8s:abc"]);
    }

    #[test]
    fn test_update_requires_rules() {
        let result = Cli::try_parse_from(["cloudctl", "databases", "firewalls", "update", "1"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::parse_from([
            "cloudctl",
            "databases",
            "firewalls",
            "list",
            "1",
            "-o",
            "json",
            "--format",
            "UUID,Type",
            "--no-header",
            "--timeout",
            "5",
        ]);
        assert_eq!(cli.output, Some(OutputArg::Json));
        assert_eq!(
            cli.format,
            Some(vec!["UUID".to_string(), "Type".to_string()])
        );
        assert!(cli.no_header);
        assert_eq!(cli.timeout, Some(5));
    }

    #[test]
    fn test_parse_remove() {
        let cli = Cli::parse_from([
            "cloudctl", "databases", "firewalls", "rm", "1", "--uuid", "abc",
        ]);
        assert!(matches!(
            cli.command,
            Commands::Databases {
                command: DatabaseCommands::Firewalls {
                    command: FirewallCommands::Remove { ref cluster_id, ref uuid }
                }
            } if cluster_id == "1" && uuid == "abc"
        ));
    }
}
