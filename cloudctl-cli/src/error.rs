//! Error handling for the cloudctl CLI
//!
//! Library errors are wrapped in [`CliError`], which keeps the source chain
//! for display and carries the exit code the process should end with.

use std::error::Error;
use std::fmt;

use cloudctl_api::ApiError;
use cloudctl_config::ConfigError;

use crate::exit_codes::{EXIT_AUTH, EXIT_ERROR, EXIT_SUCCESS, EXIT_USAGE};
use crate::rule_spec::RuleSpecError;

/// CLI-specific result type that preserves error information
pub type CliResult<T> = Result<T, CliError>;

/// CLI error type that includes both error information and suggested exit code
#[derive(Debug)]
pub struct CliError {
    pub message: String,
    pub exit_code: i32,
    pub source: Option<Box<dyn Error + Send + Sync>>,
}

impl CliError {
    /// Create a new CLI error with a message and exit code
    pub fn new(message: impl Into<String>, exit_code: i32) -> Self {
        Self {
            message: message.into(),
            exit_code,
            source: None,
        }
    }

    /// Invalid user input, reported before any request is sent
    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(message, EXIT_USAGE)
    }

    /// Missing credentials
    pub fn auth(message: impl Into<String>) -> Self {
        Self::new(message, EXIT_AUTH)
    }

    /// Wrap an API error with context describing the failed operation.
    ///
    /// A rejected token maps to the authentication exit code; every other
    /// API failure maps to the general error code.
    pub fn api(context: impl Into<String>, error: ApiError) -> Self {
        let exit_code = if error.is_unauthorized() {
            EXIT_AUTH
        } else {
            EXIT_ERROR
        };
        Self {
            message: context.into(),
            exit_code,
            source: Some(Box::new(error)),
        }
    }

    /// Get the full error chain as a formatted string
    pub fn full_chain(&self) -> String {
        let mut result = self.message.clone();

        let mut current_source = self.source();
        while let Some(err) = current_source {
            result.push_str(&format!("\n  Caused by: {err}"));
            current_source = err.source();
        }

        result
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl Error for CliError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        self.source
            .as_ref()
            .map(|e| e.as_ref() as &(dyn Error + 'static))
    }
}

impl From<RuleSpecError> for CliError {
    fn from(error: RuleSpecError) -> Self {
        CliError::validation(error.to_string())
    }
}

impl From<ConfigError> for CliError {
    fn from(error: ConfigError) -> Self {
        Self {
            message: "failed to load configuration".to_string(),
            exit_code: EXIT_ERROR,
            source: Some(Box::new(error)),
        }
    }
}

impl From<serde_json::Error> for CliError {
    fn from(error: serde_json::Error) -> Self {
        Self {
            message: "failed to encode output".to_string(),
            exit_code: EXIT_ERROR,
            source: Some(Box::new(error)),
        }
    }
}

/// Convert a CliResult to an exit code, printing the full error chain if needed
pub fn handle_cli_result<T>(result: CliResult<T>) -> i32 {
    match result {
        Ok(_) => EXIT_SUCCESS,
        Err(e) => {
            tracing::debug!(exit_code = e.exit_code, "command failed");
            eprintln!("Error: {}", e.full_chain());
            e.exit_code
        }
    }
}
