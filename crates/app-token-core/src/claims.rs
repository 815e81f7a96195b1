//! JWT claims for GitHub App authentication.
//!
//! # GitHub Requirements
//!
//! - Claims must include `iss` (app ID), `iat` (issued at), and `exp` (expiration)
//! - `exp` may be at most 10 minutes after the signing instant
//! - `iat` is backdated so a verifier whose clock runs ahead still accepts it

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::config::IssuerId;
use crate::error::ConfigurationError;

/// Longest token lifetime GitHub accepts, in seconds.
pub const MAX_LIFETIME_SECONDS: i64 = 600;

/// Largest clock skew allowance accepted, in seconds.
pub const MAX_CLOCK_SKEW_SECONDS: i64 = 600;

/// Default backdate applied to `iat`, in seconds.
pub const DEFAULT_CLOCK_SKEW_SECONDS: i64 = 60;

/// Default lifetime, in seconds. Equal to GitHub's maximum.
pub const DEFAULT_LIFETIME_SECONDS: i64 = MAX_LIFETIME_SECONDS;

/// Time bounds applied to every issued token.
///
/// # Examples
///
/// ```
/// use app_token_core::TokenTiming;
///
/// let timing = TokenTiming::default();
/// assert_eq!(timing.clock_skew().num_seconds(), 60);
/// assert_eq!(timing.lifetime().num_seconds(), 600);
///
/// assert!(TokenTiming::new(60, 601).is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenTiming {
    clock_skew: Duration,
    lifetime: Duration,
}

impl TokenTiming {
    /// Create timing rules from second counts.
    ///
    /// # Errors
    ///
    /// Returns `ConfigurationError::InvalidValue` if the skew is negative or
    /// above [`MAX_CLOCK_SKEW_SECONDS`], or the lifetime is not positive or
    /// above [`MAX_LIFETIME_SECONDS`].
    pub fn new(clock_skew_seconds: i64, lifetime_seconds: i64) -> Result<Self, ConfigurationError> {
        if !(0..=MAX_CLOCK_SKEW_SECONDS).contains(&clock_skew_seconds) {
            return Err(ConfigurationError::InvalidValue {
                field: "clock_skew_seconds".to_string(),
                message: format!(
                    "must be between 0 and {} (got {})",
                    MAX_CLOCK_SKEW_SECONDS, clock_skew_seconds
                ),
            });
        }

        if lifetime_seconds <= 0 || lifetime_seconds > MAX_LIFETIME_SECONDS {
            return Err(ConfigurationError::InvalidValue {
                field: "lifetime_seconds".to_string(),
                message: format!(
                    "must be between 1 and {} (got {})",
                    MAX_LIFETIME_SECONDS, lifetime_seconds
                ),
            });
        }

        Ok(Self {
            clock_skew: Duration::seconds(clock_skew_seconds),
            lifetime: Duration::seconds(lifetime_seconds),
        })
    }

    /// How far `iat` is moved before the signing instant.
    pub fn clock_skew(&self) -> Duration {
        self.clock_skew
    }

    /// How far `exp` is moved after the signing instant.
    pub fn lifetime(&self) -> Duration {
        self.lifetime
    }
}

impl Default for TokenTiming {
    fn default() -> Self {
        Self {
            clock_skew: Duration::seconds(DEFAULT_CLOCK_SKEW_SECONDS),
            lifetime: Duration::seconds(DEFAULT_LIFETIME_SECONDS),
        }
    }
}

/// JWT payload. Field order matches the serialized form
/// `{"iat":..,"exp":..,"iss":".."}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClaimSet {
    /// Issued at (Unix timestamp, backdated by the clock skew)
    pub iat: i64,
    /// Expiration (Unix timestamp)
    pub exp: i64,
    /// Issuer (GitHub App ID)
    pub iss: String,
}

impl ClaimSet {
    /// Build claims for a token signed at `now`.
    ///
    /// Sub-second precision is dropped before the offsets are applied, so
    /// `exp - iat` is exactly `lifetime + clock_skew`.
    pub fn build(now: DateTime<Utc>, issuer: &IssuerId, timing: &TokenTiming) -> Self {
        let now = now.timestamp();

        Self {
            iat: now - timing.clock_skew().num_seconds(),
            exp: now + timing.lifetime().num_seconds(),
            iss: issuer.as_str().to_string(),
        }
    }

    pub fn issued_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.iat, 0)
    }

    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.exp, 0)
    }
}

#[cfg(test)]
#[path = "claims_tests.rs"]
mod tests;
