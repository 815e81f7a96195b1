//! # App Token Core
//!
//! Issues short-lived RS256 JSON Web Tokens for GitHub App authentication.
//!
//! A GitHub App proves its identity with a JWT signed by the App's RSA
//! private key. The JWT is then exchanged for an installation access token.
//! This crate provides:
//! - Validated issuer configuration read from the environment
//! - RSA private key loading (PKCS#1 and PKCS#8 PEM)
//! - Claim construction with clock-skew backdating and GitHub's 10 minute cap
//! - RS256 signing through `jsonwebtoken`
//!
//! # Examples
//!
//! ```rust,no_run
//! use app_token_core::{issue_token, IssuerConfig};
//!
//! // Reads GITHUB_APP_KEY_PATH and GITHUB_APP_ID
//! let config = IssuerConfig::from_env().expect("configuration");
//! let token = issue_token(&config).expect("token");
//!
//! println!("{}", token.as_str());
//! ```

pub mod claims;
pub mod config;
pub mod error;
pub mod issuer;
pub mod key;
pub mod signer;
pub mod token;

pub use claims::{ClaimSet, TokenTiming, MAX_LIFETIME_SECONDS};
pub use config::{IssuerConfig, IssuerId, ISSUER_ID_ENV, KEY_PATH_ENV};
pub use error::{ConfigurationError, IssueError, KeyLoadError, SigningError};
pub use issuer::{issue_token, issue_token_for, TokenIssuer};
pub use key::{KeyEncoding, SigningKey};
pub use signer::{JwtSigner, Rs256Signer};
pub use token::Token;
