use argon2::{
    password_hash::{rand_core::OsRng, SaltString},
    Argon2, PasswordHash, PasswordHasher as _, PasswordVerifier,
};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PasswordError {
    #[error("password hashing failed: {0}")]
    Hash(String),

    #[error("stored password hash is unreadable")]
    InvalidHash,

    #[error("hashing task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

/// Argon2id password hashing, run off the async workers
#[derive(Default, Clone)]
pub struct PasswordHasher {
    hasher: Argon2<'static>,
}

impl PasswordHasher {
    pub async fn hash(&self, password: &str) -> Result<String, PasswordError> {
        let password = password.to_owned();
        let hasher = self.hasher.clone();
        tokio::task::spawn_blocking(move || {
            let salt = SaltString::generate(&mut OsRng);
            hasher
                .hash_password(password.as_bytes(), &salt)
                .map(|h| h.to_string())
                .map_err(|e| PasswordError::Hash(e.to_string()))
        })
        .await?
    }

    pub async fn verify(&self, password: &str, hashed: &str) -> Result<bool, PasswordError> {
        let password = password.to_owned();
        let hashed = hashed.to_owned();
        let hasher = self.hasher.clone();
        tokio::task::spawn_blocking(move || {
            let parsed = PasswordHash::new(&hashed).map_err(|_| PasswordError::InvalidHash)?;
            Ok(hasher.verify_password(password.as_bytes(), &parsed).is_ok())
        })
        .await?
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PASSWORD: &str = "correct horse battery";

    #[tokio::test]
    async fn hash_then_verify() {
        let hasher = PasswordHasher::default();
        let hash = hasher.hash(PASSWORD).await.unwrap();
        assert_ne!(hash, PASSWORD);
        assert!(hasher.verify(PASSWORD, &hash).await.unwrap());
        assert!(!hasher.verify("wrong password", &hash).await.unwrap());
    }

    #[tokio::test]
    async fn unreadable_hash_is_an_error() {
        let hasher = PasswordHasher::default();
        let result = hasher.verify(PASSWORD, "invalid").await;
        assert!(matches!(result, Err(PasswordError::InvalidHash)));
    }
}
