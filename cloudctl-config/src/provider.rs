//! Configuration provider using Figment for cloudctl

use std::path::{Path, PathBuf};

use figment::{
    providers::{Env, Format, Json, Serialized, Toml, Yaml},
    Figment,
};
use tracing::{debug, trace};

use crate::error::ConfigError;
use crate::types::{CliOverrides, CloudConfig, CONFIG_KEYS};
use crate::ConfigResult;

/// Environment variable prefix for configuration values
pub const ENV_PREFIX: &str = "CLOUDCTL_";

/// Environment variable naming a configuration file
pub const CONFIG_PATH_ENV: &str = "CLOUDCTL_CONFIG";

/// Keys whose environment values are taken verbatim instead of being parsed
/// as numbers or booleans.
const VERBATIM_ENV_KEYS: &[&str] = &["access_token", "api_url"];

/// Loads [`CloudConfig`] from all sources.
///
/// Sources are merged in precedence order (later sources override earlier ones):
/// 1. Default values
/// 2. Configuration file (`--config`, then `CLOUDCTL_CONFIG`, then the
///    user config directory)
/// 3. Environment variables with the `CLOUDCTL_` prefix
/// 4. Command line overrides
#[derive(Debug, Clone, Default)]
pub struct ConfigLoader {
    explicit_path: Option<PathBuf>,
    overrides: CliOverrides,
}

impl ConfigLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use this configuration file; it must exist.
    pub fn with_config_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.explicit_path = Some(path.into());
        self
    }

    /// Apply command line values on top of every other source.
    pub fn with_overrides(mut self, overrides: CliOverrides) -> Self {
        self.overrides = overrides;
        self
    }

    /// Merge all sources and extract a validated configuration.
    pub fn load(&self) -> ConfigResult<CloudConfig> {
        let config: CloudConfig = self.build_figment()?.extract()?;
        config.validate()?;
        debug!(
            api_url = %config.api_url,
            timeout_secs = config.timeout_secs,
            output = %config.output,
            has_token = config.access_token().is_some(),
            "loaded configuration"
        );
        Ok(config)
    }

    fn build_figment(&self) -> ConfigResult<Figment> {
        let mut figment = Figment::from(Serialized::defaults(CloudConfig::default()));

        if let Some(path) = self.config_file()? {
            trace!("Loading config file: {}", path.display());
            figment = figment.merge(file_provider(&path)?);
        }

        Ok(figment
            .merge(env_provider())
            .merge(verbatim_env_provider())
            .merge(Serialized::defaults(self.overrides.clone())))
    }

    /// Resolve the configuration file to read, if any.
    ///
    /// Explicit paths (flag or `CLOUDCTL_CONFIG`) must exist; the default
    /// location is used only when present.
    fn config_file(&self) -> ConfigResult<Option<PathBuf>> {
        let explicit = self
            .explicit_path
            .clone()
            .or_else(|| std::env::var_os(CONFIG_PATH_ENV).map(PathBuf::from));

        if let Some(path) = explicit {
            if !path.is_file() {
                return Err(ConfigError::FileNotFound { path });
            }
            return Ok(Some(path));
        }

        Ok(default_config_path().filter(|path| path.is_file()))
    }
}

/// `<config dir>/cloudctl/config.yaml`
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("cloudctl").join("config.yaml"))
}

fn file_provider(path: &Path) -> ConfigResult<Figment> {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase);

    match extension.as_deref() {
        Some("yaml") | Some("yml") => Ok(Figment::from(Yaml::file(path))),
        Some("toml") => Ok(Figment::from(Toml::file(path))),
        Some("json") => Ok(Figment::from(Json::file(path))),
        _ => Err(ConfigError::UnsupportedFormat {
            path: path.to_path_buf(),
        }),
    }
}

fn is_one_of(key: &str, keys: &[&str]) -> bool {
    keys.iter().any(|known| key.eq_ignore_ascii_case(known))
}

/// Typed `CLOUDCTL_*` values such as `CLOUDCTL_TIMEOUT_SECS=10`.
fn env_provider() -> Env {
    Env::prefixed(ENV_PREFIX).filter(|key| {
        is_one_of(key.as_str(), CONFIG_KEYS) && !is_one_of(key.as_str(), VERBATIM_ENV_KEYS)
    })
}

/// String `CLOUDCTL_*` values, kept exactly as set so a token such as
/// `0012345` or `true` is not reinterpreted.
fn verbatim_env_provider() -> Figment {
    VERBATIM_ENV_KEYS
        .iter()
        .fold(Figment::new(), |figment, key| {
            let name = format!("{ENV_PREFIX}{}", key.to_ascii_uppercase());
            match std::env::var(&name) {
                Ok(value) => {
                    trace!("Using {name} from the environment");
                    figment.merge(Serialized::default(key, value))
                }
                Err(_) => figment,
            }
        })
}
