//! Ordered collections embedded inside a parent document.
//!
//! Items are kept newest-first and addressed by their own synthetic id, which
//! is generated on insertion and never changes. Every failing operation leaves
//! the list exactly as it was.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::auth::{authorize, Identity, OwnershipError};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MutationError {
    #[error("already liked")]
    AlreadyLiked,

    #[error("not liked")]
    NotLiked,

    #[error("item {0} not found")]
    NotFound(Uuid),

    #[error(transparent)]
    Forbidden(#[from] OwnershipError),
}

/// An element of an [`EmbeddedList`]
pub trait EmbeddedItem {
    /// Caller-supplied fields, everything except id and owner
    type Draft;

    fn assemble(id: Uuid, owner: Uuid, draft: Self::Draft) -> Self;

    fn item_id(&self) -> Uuid;

    /// `None` when the item has no owner of its own and inherits the parent's
    fn owner(&self) -> Option<Uuid>;
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EmbeddedList<T>(Vec<T>);

impl<T> Default for EmbeddedList<T> {
    fn default() -> Self {
        Self(Vec::new())
    }
}

impl<T> From<Vec<T>> for EmbeddedList<T> {
    fn from(items: Vec<T>) -> Self {
        Self(items)
    }
}

impl<T> EmbeddedList<T> {
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.0.iter()
    }
}

impl<T: EmbeddedItem> EmbeddedList<T> {
    /// Insert a new item owned by `actor` at the head of the list
    pub fn add(&mut self, actor: &Identity, draft: T::Draft) -> &T {
        let item = T::assemble(Uuid::new_v4(), actor.id, draft);
        self.0.insert(0, item);
        &self.0[0]
    }

    fn position_of_owner(&self, owner: Uuid) -> Option<usize> {
        self.0.iter().position(|item| item.owner() == Some(owner))
    }

    /// Remove the item whose own id is `item_id`.
    ///
    /// The remover must own the item, or the parent when the item has no owner.
    pub fn remove(
        &mut self,
        item_id: Uuid,
        actor: &Identity,
        parent_owner: Uuid,
    ) -> Result<T, MutationError> {
        let index = self
            .0
            .iter()
            .position(|item| item.item_id() == item_id)
            .ok_or(MutationError::NotFound(item_id))?;

        let owner = self.0[index].owner().unwrap_or(parent_owner);
        authorize(actor, owner)?;

        Ok(self.0.remove(index))
    }
}

impl<T: EmbeddedItem<Draft = ()>> EmbeddedList<T> {
    /// Record `actor`'s like; at most one per identity
    pub fn like(&mut self, actor: &Identity) -> Result<&T, MutationError> {
        if self.position_of_owner(actor.id).is_some() {
            return Err(MutationError::AlreadyLiked);
        }
        Ok(self.add(actor, ()))
    }

    /// Withdraw `actor`'s like, leaving the order of the others untouched
    pub fn unlike(&mut self, actor: &Identity) -> Result<T, MutationError> {
        let index = self.position_of_owner(actor.id).ok_or(MutationError::NotLiked)?;
        Ok(self.0.remove(index))
    }
}
