//! Error types for token issuing.
//!
//! Every failure is terminal: there is nothing to retry inside a single
//! invocation. The three kinds map one-to-one onto the stages of issuing a
//! token (configuration, key loading, signing) so callers can report them
//! with distinct exit statuses.

use std::path::PathBuf;

use thiserror::Error;

/// Top-level error returned by [`crate::issue_token`] and [`crate::TokenIssuer`].
#[derive(Debug, Error)]
pub enum IssueError {
    /// A required input is absent or a setting is out of range.
    #[error("Configuration error: {0}")]
    Configuration(#[from] ConfigurationError),

    /// The private key could not be read or parsed.
    #[error("Key load error: {0}")]
    KeyLoad(#[from] KeyLoadError),

    /// The signing primitive failed.
    #[error("JWT signing failed: {0}")]
    Signing(#[from] SigningError),
}

/// Configuration validation errors.
///
/// These are raised while building an [`crate::IssuerConfig`] or a
/// [`crate::TokenTiming`], before any file is touched.
#[derive(Debug, Error)]
pub enum ConfigurationError {
    /// A required input is missing or empty.
    #[error("Missing required configuration: {name}")]
    MissingRequired { name: String },

    /// A value is present but not acceptable.
    #[error("Invalid value for {field}: {message}")]
    InvalidValue { field: String, message: String },
}

/// Errors raised while loading an RSA private key.
#[derive(Debug, Error)]
pub enum KeyLoadError {
    /// The key file does not exist or could not be read.
    #[error("Unable to read private key {path}: {source}")]
    Unreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The content is not a PEM-encoded RSA private key.
    #[error("Invalid private key format: {message}")]
    InvalidFormat { message: String },

    /// The key parsed but cannot be used for RS256.
    #[error("Unsupported private key: {message}")]
    UnsupportedKey { message: String },
}

/// Errors during the RS256 signing operation.
#[derive(Debug, Error)]
#[error("{message}")]
pub struct SigningError {
    pub message: String,
}

impl SigningError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
