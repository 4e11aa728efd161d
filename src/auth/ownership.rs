use thiserror::Error;
use uuid::Uuid;

use super::Identity;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OwnershipError {
    #[error("identity {actor} does not own resource owned by {owner}")]
    Forbidden { actor: Uuid, owner: Uuid },
}

/// Allow `actor` to act on a resource recorded as owned by `owner`.
///
/// Both sides are `Uuid` values: ids arriving as text are parsed at the
/// extractor boundary, so hyphenation and case never affect the outcome.
pub fn authorize(actor: &Identity, owner: Uuid) -> Result<(), OwnershipError> {
    if actor.id == owner {
        Ok(())
    } else {
        Err(OwnershipError::Forbidden { actor: actor.id, owner })
    }
}
