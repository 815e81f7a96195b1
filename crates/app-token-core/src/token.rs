//! Signed token type.

use chrono::{DateTime, Utc};

use crate::claims::ClaimSet;

/// JWT for GitHub App authentication.
///
/// The token string is never exposed in Debug output for security.
#[derive(Clone)]
pub struct Token {
    token: String,
    claims: ClaimSet,
}

impl Token {
    pub fn new(token: String, claims: ClaimSet) -> Self {
        Self { token, claims }
    }

    /// The compact token, for use as `Authorization: Bearer <token>`.
    pub fn as_str(&self) -> &str {
        &self.token
    }

    pub fn into_string(self) -> String {
        self.token
    }

    /// Claims that were signed into the token.
    pub fn claims(&self) -> &ClaimSet {
        &self.claims
    }

    pub fn issuer(&self) -> &str {
        &self.claims.iss
    }

    /// `iat` as a timestamp, including the clock skew backdate.
    pub fn issued_at(&self) -> Option<DateTime<Utc>> {
        self.claims.issued_at()
    }

    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.claims.expires_at()
    }

    /// Split into `(header, payload, signature)` segments.
    ///
    /// Returns `None` if the token does not have exactly three segments.
    pub fn segments(&self) -> Option<(&str, &str, &str)> {
        let mut parts = self.token.split('.');
        let header = parts.next()?;
        let payload = parts.next()?;
        let signature = parts.next()?;
        if parts.next().is_some() {
            return None;
        }
        Some((header, payload, signature))
    }
}

// Security: Don't expose token in debug output
impl std::fmt::Debug for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Token")
            .field("issuer", &self.claims.iss)
            .field("issued_at", &self.claims.iat)
            .field("expires_at", &self.claims.exp)
            .field("token", &"<REDACTED>")
            .finish()
    }
}

#[cfg(test)]
#[path = "token_tests.rs"]
mod tests;
