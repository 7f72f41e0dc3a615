//! Per-invocation state shared by command handlers.

use cloudctl_api::ApiClient;
use cloudctl_config::{CliOverrides, CloudConfig, ConfigLoader, OutputFormat};

use crate::cli::{Cli, OutputArg};
use crate::error::{CliError, CliResult};
use crate::output::{OutputOptions, FIREWALL_RULE_COLUMNS};

/// Resolved configuration and output options for one command.
#[derive(Debug, Clone)]
pub struct CommandContext {
    pub config: CloudConfig,
    pub output: OutputOptions,
}

impl CommandContext {
    /// Resolve output options, then load configuration with the command
    /// line's overrides. Column selection is checked before any file is read.
    /// No network access happens here.
    pub fn from_cli(cli: &Cli) -> CliResult<Self> {
        let output = OutputOptions::select(
            FIREWALL_RULE_COLUMNS,
            cli.format.as_deref(),
            cli.no_header,
        )?;

        let overrides = CliOverrides {
            access_token: cli.access_token.clone(),
            api_url: cli.api_url.clone(),
            timeout_secs: cli.timeout,
            output: cli.output.map(|output| match output {
                OutputArg::Text => OutputFormat::Text,
                OutputArg::Json => OutputFormat::Json,
            }),
        };

        let mut loader = ConfigLoader::new().with_overrides(overrides);
        if let Some(path) = &cli.config {
            loader = loader.with_config_file(path);
        }
        let config = loader.load()?;
        let output = output.with_format(config.output);

        Ok(Self { config, output })
    }

    /// An authenticated API client. Fails when no access token is configured.
    pub fn api_client(&self) -> CliResult<ApiClient> {
        let token = self.config.access_token().ok_or_else(|| {
            CliError::auth(
                "no access token configured; pass --access-token or set CLOUDCTL_ACCESS_TOKEN",
            )
        })?;

        ApiClient::with_timeout(&self.config.api_url, token, self.config.timeout())
            .map_err(|e| CliError::api("failed to create API client", e))
    }
}
