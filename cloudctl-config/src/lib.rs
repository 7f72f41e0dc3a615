//! Configuration management for cloudctl using Figment
//!
//! Configuration is read fresh on every invocation from, in increasing
//! precedence: built-in defaults, a YAML/TOML/JSON config file, `CLOUDCTL_*`
//! environment variables, and command line flags.
//!
//! ```no_run
//! use cloudctl_config::{CliOverrides, ConfigLoader};
//!
//! let config = ConfigLoader::new()
//!     .with_overrides(CliOverrides {
//!         access_token: Some("token".to_string()),
//!         ..CliOverrides::default()
//!     })
//!     .load()
//!     .unwrap();
//! assert_eq!(config.access_token(), Some("token"));
//! ```

mod error;
mod provider;
mod types;

pub use error::ConfigError;
pub use provider::{default_config_path, ConfigLoader, CONFIG_PATH_ENV, ENV_PREFIX};
pub use types::{CliOverrides, CloudConfig, OutputFormat, CONFIG_KEYS};

/// Result type for configuration operations
pub type ConfigResult<T> = Result<T, ConfigError>;
