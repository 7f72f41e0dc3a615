//! Configuration value types

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::ConfigError;

/// Keys recognised in config files and `CLOUDCTL_*` environment variables
pub const CONFIG_KEYS: &[&str] = &["access_token", "api_url", "timeout_secs", "output"];

/// How command results are written to stdout
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Column-aligned table
    #[default]
    Text,
    /// Pretty-printed JSON
    Json,
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}

impl FromStr for OutputFormat {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "text" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            other => Err(ConfigError::InvalidValue {
                key: "output".to_string(),
                message: format!("expected 'text' or 'json', got '{other}'"),
            }),
        }
    }
}

/// Any scalar a config source may produce for a string setting.
///
/// YAML and TOML read an unquoted `12345` or `true` as a number or bool;
/// those are accepted and turned back into text.
#[derive(Deserialize)]
#[serde(untagged)]
enum Scalar {
    Text(String),
    Unsigned(u64),
    Signed(i64),
    Float(f64),
    Bool(bool),
}

impl From<Scalar> for String {
    fn from(scalar: Scalar) -> Self {
        match scalar {
            Scalar::Text(text) => text,
            Scalar::Unsigned(n) => n.to_string(),
            Scalar::Signed(n) => n.to_string(),
            Scalar::Float(n) => n.to_string(),
            Scalar::Bool(b) => b.to_string(),
        }
    }
}

fn scalar_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Scalar::deserialize(deserializer).map(String::from)
}

fn optional_scalar_string<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<String>, D::Error> {
    Option::<Scalar>::deserialize(deserializer).map(|scalar| scalar.map(String::from))
}

/// Resolved cloudctl configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CloudConfig {
    /// Bearer token for the API
    #[serde(default, deserialize_with = "optional_scalar_string")]
    pub access_token: Option<String>,
    /// Base URL of the API
    #[serde(deserialize_with = "scalar_string")]
    pub api_url: String,
    /// Per-request timeout in seconds
    pub timeout_secs: u64,
    /// Output format for command results
    #[serde(default)]
    pub output: OutputFormat,
}

impl Default for CloudConfig {
    fn default() -> Self {
        Self {
            access_token: None,
            api_url: cloudctl_api::DEFAULT_API_URL.to_string(),
            timeout_secs: cloudctl_api::DEFAULT_TIMEOUT.as_secs(),
            output: OutputFormat::Text,
        }
    }
}

impl CloudConfig {
    /// The access token, ignoring a blank value
    pub fn access_token(&self) -> Option<&str> {
        self.access_token
            .as_deref()
            .map(str::trim)
            .filter(|token| !token.is_empty())
    }

    /// Per-request timeout
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Check values that deserialize fine but cannot be used
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.api_url.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                key: "api_url".to_string(),
                message: "must not be empty".to_string(),
            });
        }
        if self.timeout_secs == 0 {
            return Err(ConfigError::InvalidValue {
                key: "timeout_secs".to_string(),
                message: "must be greater than zero".to_string(),
            });
        }
        Ok(())
    }
}

/// Values supplied on the command line; highest precedence
///
/// Unset fields are skipped during serialization so they never mask values
/// from lower layers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CliOverrides {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub access_token: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<OutputFormat>,
}
