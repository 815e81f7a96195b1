//! Issuer configuration.
//!
//! The key path and issuer identifier arrive from the process environment
//! (or command-line flags). They are gathered into an [`IssuerConfig`] and
//! validated when it is built, so an incomplete configuration fails before
//! the key file is ever opened.

use std::env::VarError;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::claims::TokenTiming;
use crate::error::ConfigurationError;

/// Environment variable holding the path to the PEM private key.
pub const KEY_PATH_ENV: &str = "GITHUB_APP_KEY_PATH";

/// Environment variable holding the issuer (GitHub App) identifier.
pub const ISSUER_ID_ENV: &str = "GITHUB_APP_ID";

/// Opaque identifier placed in the `iss` claim.
///
/// For a GitHub App this is the numeric App ID, but the value is carried as
/// text and never reinterpreted.
///
/// # Examples
///
/// ```
/// use app_token_core::IssuerId;
///
/// let issuer: IssuerId = "12345".parse().unwrap();
/// assert_eq!(issuer.as_str(), "12345");
/// assert!("".parse::<IssuerId>().is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct IssuerId(String);

impl IssuerId {
    /// Create an issuer identifier, rejecting empty or whitespace-only input.
    pub fn new(id: impl Into<String>) -> Result<Self, ConfigurationError> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err(ConfigurationError::MissingRequired {
                name: ISSUER_ID_ENV.to_string(),
            });
        }
        Ok(Self(id))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for IssuerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for IssuerId {
    type Err = ConfigurationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for IssuerId {
    type Error = ConfigurationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<IssuerId> for String {
    fn from(value: IssuerId) -> Self {
        value.0
    }
}

/// Validated inputs for issuing one token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssuerConfig {
    key_path: PathBuf,
    issuer_id: IssuerId,
    timing: TokenTiming,
}

impl IssuerConfig {
    /// Build a configuration with the default [`TokenTiming`].
    ///
    /// The issuer is checked first, then the key path. Neither check reads
    /// the filesystem; an unreadable key surfaces later as a key load error.
    ///
    /// # Errors
    ///
    /// Returns `ConfigurationError::MissingRequired` if either input is empty.
    pub fn new(
        key_path: impl Into<PathBuf>,
        issuer_id: impl Into<String>,
    ) -> Result<Self, ConfigurationError> {
        let issuer_id = IssuerId::new(issuer_id)?;

        let key_path = key_path.into();
        if key_path.as_os_str().is_empty() {
            return Err(ConfigurationError::MissingRequired {
                name: KEY_PATH_ENV.to_string(),
            });
        }

        Ok(Self {
            key_path,
            issuer_id,
            timing: TokenTiming::default(),
        })
    }

    /// Build a configuration from optional inputs, as delivered by a flag
    /// or environment lookup.
    pub fn from_parts(
        key_path: Option<PathBuf>,
        issuer_id: Option<String>,
    ) -> Result<Self, ConfigurationError> {
        let issuer_id = issuer_id.ok_or_else(|| ConfigurationError::MissingRequired {
            name: ISSUER_ID_ENV.to_string(),
        })?;
        let key_path = key_path.ok_or_else(|| ConfigurationError::MissingRequired {
            name: KEY_PATH_ENV.to_string(),
        })?;
        Self::new(key_path, issuer_id)
    }

    /// Read [`KEY_PATH_ENV`] and [`ISSUER_ID_ENV`] from the process environment.
    ///
    /// The key path is taken as an OS string, so any path the platform allows
    /// is accepted. An issuer identifier that is not valid Unicode is
    /// `ConfigurationError::InvalidValue` rather than missing.
    pub fn from_env() -> Result<Self, ConfigurationError> {
        let issuer_id = env_value(ISSUER_ID_ENV, std::env::var(ISSUER_ID_ENV))?;
        let key_path = std::env::var_os(KEY_PATH_ENV).map(PathBuf::from);
        Self::from_parts(key_path, issuer_id)
    }

    /// Build a configuration using `lookup` to resolve the environment names.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigurationError>
    where
        F: Fn(&str) -> Option<String>,
    {
        Self::from_parts(lookup(KEY_PATH_ENV).map(PathBuf::from), lookup(ISSUER_ID_ENV))
    }

    /// Replace the token timing rules.
    pub fn with_timing(mut self, timing: TokenTiming) -> Self {
        self.timing = timing;
        self
    }

    pub fn key_path(&self) -> &Path {
        &self.key_path
    }

    pub fn issuer_id(&self) -> &IssuerId {
        &self.issuer_id
    }

    pub fn timing(&self) -> &TokenTiming {
        &self.timing
    }
}

fn env_value(
    name: &str,
    value: Result<String, VarError>,
) -> Result<Option<String>, ConfigurationError> {
    match value {
        Ok(value) => Ok(Some(value)),
        Err(VarError::NotPresent) => Ok(None),
        Err(VarError::NotUnicode(_)) => Err(ConfigurationError::InvalidValue {
            field: name.to_string(),
            message: "value is not valid Unicode".to_string(),
        }),
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
