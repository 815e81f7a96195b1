//! JWT signing.
//!
//! GitHub App JWTs must use RS256 (RSASSA-PKCS1-v1_5 with SHA-256). The
//! signing itself is delegated to `jsonwebtoken`; this module only adapts a
//! validated [`SigningKey`] to it.

use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};

use crate::claims::ClaimSet;
use crate::error::{KeyLoadError, SigningError};
use crate::key::SigningKey;

/// Interface for JWT signing.
///
/// Abstracts the cryptographic step so the issuing flow can be exercised
/// with signers that fail on purpose.
pub trait JwtSigner {
    /// Algorithm written to the JWT header.
    fn algorithm(&self) -> Algorithm;

    /// Produce the compact `header.payload.signature` encoding of `claims`.
    ///
    /// # Errors
    ///
    /// Returns `SigningError` if the claims cannot be encoded or the key is
    /// rejected by the signing primitive.
    fn sign(&self, claims: &ClaimSet) -> Result<String, SigningError>;
}

/// RS256 signer backed by an RSA private key.
///
/// # Examples
///
/// ```no_run
/// # use app_token_core::{ClaimSet, IssuerId, JwtSigner, Rs256Signer, SigningKey, TokenTiming};
/// # let pem = std::fs::read_to_string("app.private-key.pem").unwrap();
/// let key = SigningKey::from_pem(&pem).unwrap();
/// let signer = Rs256Signer::new(&key).unwrap();
///
/// let issuer = IssuerId::new("12345").unwrap();
/// let claims = ClaimSet::build(chrono::Utc::now(), &issuer, &TokenTiming::default());
/// let jwt = signer.sign(&claims).unwrap();
/// assert_eq!(jwt.split('.').count(), 3);
/// ```
pub struct Rs256Signer {
    encoding_key: EncodingKey,
}

impl Rs256Signer {
    /// Create a signer from a validated key.
    ///
    /// # Errors
    ///
    /// Returns `KeyLoadError::InvalidFormat` if `jsonwebtoken` cannot build
    /// an encoding key from the PEM.
    pub fn new(key: &SigningKey) -> Result<Self, KeyLoadError> {
        let encoding_key = EncodingKey::from_rsa_pem(key.pem_bytes()).map_err(|e| {
            KeyLoadError::InvalidFormat {
                message: format!("Failed to create encoding key: {}", e),
            }
        })?;

        Ok(Self { encoding_key })
    }
}

impl JwtSigner for Rs256Signer {
    fn algorithm(&self) -> Algorithm {
        Algorithm::RS256
    }

    fn sign(&self, claims: &ClaimSet) -> Result<String, SigningError> {
        // Header::new sets typ to "JWT"
        let header = Header::new(self.algorithm());

        encode(&header, claims, &self.encoding_key)
            .map_err(|e| SigningError::new(format!("Failed to encode JWT: {}", e)))
    }
}

// Security: Don't expose key data in debug output
impl std::fmt::Debug for Rs256Signer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Rs256Signer")
            .field("encoding_key", &"<REDACTED>")
            .finish()
    }
}
