use std::marker::PhantomData;
use std::sync::Arc;
use uuid::Uuid;

use super::manager::DatabaseError;
use super::store::{Document, DocumentStore, Filter};

/// Typed access to one collection of a [`DocumentStore`]
pub struct Repository<T> {
    store: Arc<dyn DocumentStore>,
    _phantom: PhantomData<fn() -> T>,
}

impl<T> Clone for Repository<T> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            _phantom: PhantomData,
        }
    }
}

impl<T: Document> Repository<T> {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self {
            store,
            _phantom: PhantomData,
        }
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<T>, DatabaseError> {
        match self.store.find_by_id(T::COLLECTION, id).await? {
            Some(doc) => Ok(Some(serde_json::from_value(doc)?)),
            None => Ok(None),
        }
    }

    pub async fn find(&self, filter: Filter) -> Result<Vec<T>, DatabaseError> {
        self.store
            .find(T::COLLECTION, &filter)
            .await?
            .into_iter()
            .map(|doc| serde_json::from_value(doc).map_err(DatabaseError::from))
            .collect()
    }

    pub async fn find_one(&self, filter: Filter) -> Result<Option<T>, DatabaseError> {
        Ok(self.find(filter).await?.into_iter().next())
    }

    pub async fn save(&self, doc: &T) -> Result<(), DatabaseError> {
        let value = serde_json::to_value(doc)?;
        self.store.save(T::COLLECTION, doc.id(), value).await
    }

    pub async fn delete(&self, id: Uuid) -> Result<bool, DatabaseError> {
        self.store.delete(T::COLLECTION, id).await
    }

    pub async fn delete_many(&self, filter: Filter) -> Result<u64, DatabaseError> {
        self.store.delete_many(T::COLLECTION, &filter).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::memory::MemoryStore;
    use crate::database::models::Post;

    fn posts() -> Repository<Post> {
        Repository::new(Arc::new(MemoryStore::new()))
    }

    #[tokio::test]
    async fn save_then_find_roundtrips_typed_document() {
        let repo = posts();
        let post = Post::new(Uuid::new_v4(), "hello".into(), "Dev".into(), "a".into());
        repo.save(&post).await.unwrap();

        let found = repo.find_by_id(post.id).await.unwrap().unwrap();
        assert_eq!(found.text, "hello");
        assert_eq!(found.user, post.user);
    }

    #[tokio::test]
    async fn missing_id_is_none() {
        assert!(posts().find_by_id(Uuid::new_v4()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn find_by_owner() {
        let repo = posts();
        let owner = Uuid::new_v4();
        repo.save(&Post::new(owner, "mine".into(), "a".into(), "a".into())).await.unwrap();
        repo.save(&Post::new(Uuid::new_v4(), "theirs".into(), "b".into(), "b".into())).await.unwrap();

        let mine = repo.find(Filter::owner(owner)).await.unwrap();
        assert_eq!(mine.len(), 1);
        assert_eq!(mine[0].text, "mine");
    }
}
