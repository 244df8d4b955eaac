//! Error types for lookup, formatting, and configuration.
//!
//! Lookup errors are classified by recoverability:
//! - Retryable: network failures, timeouts
//! - NonRetryable: bad credentials, malformed responses, missing configuration
//!
//! The pipeline never retries; the classification is advisory for whoever
//! drives the provider.

use std::path::PathBuf;
use thiserror::Error;

use crate::types::LookupOutcome;

/// Failures inside a load lookup provider.
#[derive(Debug, Error)]
pub enum LookupError {
    // Retryable errors
    #[error("Network error: {0}")]
    Network(String),

    #[error("Lookup timed out after {0} seconds")]
    Timeout(u64),

    // Non-retryable errors
    #[error("Provider rejected credentials")]
    Unauthorized,

    #[error("Unexpected provider response: {0}")]
    UnexpectedResponse(String),

    #[error("Reference is not usable for lookup: {0}")]
    InvalidReference(String),

    #[error("Lookup provider is not configured: {0}")]
    NotConfigured(String),
}

impl LookupError {
    /// Returns true if a later attempt could plausibly succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, LookupError::Network(_) | LookupError::Timeout(_))
    }
}

impl From<LookupError> for LookupOutcome {
    fn from(err: LookupError) -> Self {
        LookupOutcome::Error {
            message: err.to_string(),
        }
    }
}

/// Failures while rendering a reply template.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormatError {
    #[error("Unterminated placeholder on line {line} of {template} template")]
    UnterminatedPlaceholder { template: String, line: usize },

    #[error("Unknown placeholder {{{{{name}}}}} in {template} template")]
    UnknownPlaceholder { template: String, name: String },

    #[error("Template {0} rendered an empty body")]
    EmptyTemplate(String),
}

/// Failures while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Config file not found at {0}")]
    NotFound(PathBuf),

    #[error("Failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid config: {0}")]
    Invalid(String),
}

impl From<FormatError> for ConfigError {
    fn from(err: FormatError) -> Self {
        ConfigError::Invalid(err.to_string())
    }
}
