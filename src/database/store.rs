use async_trait::async_trait;
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use uuid::Uuid;

use super::manager::DatabaseError;

/// Top-level document collections
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    Users,
    Profiles,
    Posts,
}

impl Collection {
    pub const ALL: [Collection; 3] = [Collection::Users, Collection::Profiles, Collection::Posts];

    pub fn name(&self) -> &'static str {
        match self {
            Collection::Users => "users",
            Collection::Profiles => "profiles",
            Collection::Posts => "posts",
        }
    }
}

/// A record stored as one JSON document in a [`Collection`]
pub trait Document: Serialize + DeserializeOwned + Send + Sync {
    const COLLECTION: Collection;

    fn id(&self) -> Uuid;
}

/// Document selection: everything, or equality on one top-level field
#[derive(Debug, Clone, PartialEq)]
pub enum Filter {
    All,
    Eq { field: &'static str, value: Value },
}

impl Filter {
    pub fn eq(field: &'static str, value: impl Into<Value>) -> Self {
        Filter::Eq { field, value: value.into() }
    }

    pub fn owner(user: Uuid) -> Self {
        Filter::eq("user", user.to_string())
    }

    pub fn matches(&self, doc: &Value) -> bool {
        match self {
            Filter::All => true,
            Filter::Eq { field, value } => doc.get(*field) == Some(value),
        }
    }
}

/// Persistence for JSON documents.
///
/// Writes are atomic per document only; a read followed by a save is not
/// isolated from concurrent writers (last write wins).
#[async_trait]
pub trait DocumentStore: Send + Sync {
    async fn find_by_id(&self, collection: Collection, id: Uuid) -> Result<Option<Value>, DatabaseError>;

    async fn find(&self, collection: Collection, filter: &Filter) -> Result<Vec<Value>, DatabaseError>;

    /// Insert or replace the document with this id
    async fn save(&self, collection: Collection, id: Uuid, doc: Value) -> Result<(), DatabaseError>;

    /// Returns whether a document was removed
    async fn delete(&self, collection: Collection, id: Uuid) -> Result<bool, DatabaseError>;

    async fn delete_many(&self, collection: Collection, filter: &Filter) -> Result<u64, DatabaseError>;

    async fn ping(&self) -> Result<(), DatabaseError>;
}
