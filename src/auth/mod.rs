pub mod ownership;
pub mod password;

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::config::SecurityConfig;

pub use ownership::{authorize, OwnershipError};
pub use password::{PasswordError, PasswordHasher};

/// Minimal principal resolved from a verified credential
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Identity {
    pub id: Uuid,
}

impl Identity {
    pub fn new(id: Uuid) -> Self {
        Self { id }
    }
}

/// Signed payload: `{ user: { id }, iat, exp }`
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub user: Identity,
    pub iat: i64,
    pub exp: i64,
}

#[derive(Debug, Error)]
pub enum CredentialError {
    #[error("credential signing secret is not configured")]
    MissingSecret,

    #[error("credential signing failed: {0}")]
    Signing(String),

    #[error("credential expired")]
    Expired,

    #[error("credential signature invalid")]
    SignatureInvalid,

    #[error("credential malformed")]
    Malformed,
}

impl CredentialError {
    /// Verification failures the gate reports as an undifferentiated invalid credential
    pub fn is_rejection(&self) -> bool {
        matches!(
            self,
            CredentialError::Expired | CredentialError::SignatureInvalid | CredentialError::Malformed
        )
    }
}

/// Issues and verifies stateless HS256 bearer credentials
pub struct CredentialCodec {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    ttl: Duration,
}

impl std::fmt::Debug for CredentialCodec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialCodec")
            .field("ttl_secs", &self.ttl.num_seconds())
            .finish_non_exhaustive()
    }
}

impl CredentialCodec {
    pub fn new(secret: &str, ttl_secs: u64) -> Result<Self, CredentialError> {
        if secret.is_empty() {
            return Err(CredentialError::MissingSecret);
        }

        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp"]);

        Ok(Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
            ttl: Duration::seconds(ttl_secs as i64),
        })
    }

    pub fn from_config(security: &SecurityConfig) -> Result<Self, CredentialError> {
        Self::new(&security.jwt_secret, security.jwt_expiry_secs)
    }

    pub fn issue(&self, identity: Identity) -> Result<String, CredentialError> {
        self.issue_at(identity, Utc::now())
    }

    /// Issue a credential as if signed at `issued_at`
    pub fn issue_at(&self, identity: Identity, issued_at: DateTime<Utc>) -> Result<String, CredentialError> {
        let claims = Claims {
            user: identity,
            iat: issued_at.timestamp(),
            exp: (issued_at + self.ttl).timestamp(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| CredentialError::Signing(e.to_string()))
    }

    pub fn verify(&self, token: &str) -> Result<Identity, CredentialError> {
        let data = decode::<Claims>(token, &self.decoding_key, &self.validation).map_err(|e| {
            match e.kind() {
                ErrorKind::ExpiredSignature => CredentialError::Expired,
                ErrorKind::InvalidSignature => CredentialError::SignatureInvalid,
                _ => CredentialError::Malformed,
            }
        })?;

        Ok(data.claims.user)
    }
}
