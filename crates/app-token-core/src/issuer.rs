//! Token issuing.
//!
//! [`issue_token`] runs the whole flow for one invocation: the configuration
//! has already been validated, the key is loaded and parsed, the claims are
//! built from the current time and the result is signed. Any failure aborts
//! the flow; nothing is partially produced.

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use tracing::{debug, info};

use crate::claims::{ClaimSet, TokenTiming};
use crate::config::{IssuerConfig, IssuerId};
use crate::error::IssueError;
use crate::key::SigningKey;
use crate::signer::{JwtSigner, Rs256Signer};
use crate::token::Token;

/// Issues signed tokens for a single issuer.
///
/// # Examples
///
/// ```no_run
/// # use app_token_core::{IssuerId, Rs256Signer, SigningKey, TokenIssuer, TokenTiming};
/// # let pem = std::fs::read_to_string("app.private-key.pem").unwrap();
/// let key = SigningKey::from_pem(&pem).unwrap();
/// let issuer = TokenIssuer::new(
///     Rs256Signer::new(&key).unwrap(),
///     IssuerId::new("12345").unwrap(),
///     TokenTiming::default(),
/// );
///
/// let token = issuer.issue().unwrap();
/// assert_eq!(token.issuer(), "12345");
/// ```
#[derive(Debug)]
pub struct TokenIssuer<S> {
    signer: S,
    issuer_id: IssuerId,
    timing: TokenTiming,
}

impl<S: JwtSigner> TokenIssuer<S> {
    pub fn new(signer: S, issuer_id: IssuerId, timing: TokenTiming) -> Self {
        Self {
            signer,
            issuer_id,
            timing,
        }
    }

    /// Issue a token signed at the current wall-clock time.
    pub fn issue(&self) -> Result<Token, IssueError> {
        self.issue_at(Utc::now())
    }

    /// Issue a token as if signed at `now`.
    pub fn issue_at(&self, now: DateTime<Utc>) -> Result<Token, IssueError> {
        let claims = ClaimSet::build(now, &self.issuer_id, &self.timing);
        debug!(
            issuer = %self.issuer_id,
            iat = claims.iat,
            exp = claims.exp,
            algorithm = ?self.signer.algorithm(),
            "Built JWT claims"
        );

        let token = self.signer.sign(&claims)?;
        Ok(Token::new(token, claims))
    }

    pub fn issuer_id(&self) -> &IssuerId {
        &self.issuer_id
    }

    pub fn timing(&self) -> &TokenTiming {
        &self.timing
    }
}

/// Load the configured key and issue one RS256 token.
///
/// # Errors
///
/// - `IssueError::KeyLoad` if the key file is missing, unreadable or not a
///   usable RSA private key
/// - `IssueError::Signing` if the signing primitive fails
///
/// Configuration problems cannot occur here: they are reported when the
/// [`IssuerConfig`] is built, before this function can be called.
///
/// # Examples
///
/// ```no_run
/// use app_token_core::{issue_token, IssuerConfig};
///
/// let config = IssuerConfig::new("/run/secrets/app.pem", "12345").unwrap();
/// let token = issue_token(&config).unwrap();
/// println!("{}", token.as_str());
/// ```
pub fn issue_token(config: &IssuerConfig) -> Result<Token, IssueError> {
    let key = SigningKey::load(config.key_path())?;
    let signer = Rs256Signer::new(&key)?;

    let issuer = TokenIssuer::new(signer, config.issuer_id().clone(), config.timing().clone());
    let token = issuer.issue()?;

    info!(
        issuer = %config.issuer_id(),
        expires_at = token.claims().exp,
        "Issued GitHub App JWT"
    );
    Ok(token)
}

/// Validate `key_path` and `issuer_id`, then issue one token with the
/// default timing.
///
/// An empty issuer is reported as `IssueError::Configuration` without the
/// key file being opened.
pub fn issue_token_for(
    key_path: impl Into<PathBuf>,
    issuer_id: impl Into<String>,
) -> Result<Token, IssueError> {
    let config = IssuerConfig::new(key_path, issuer_id)?;
    issue_token(&config)
}

#[cfg(test)]
#[path = "issuer_tests.rs"]
mod tests;
