use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::database::store::{Collection, Document};
use crate::embedded::{EmbeddedItem, EmbeddedList};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Post {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub user: Uuid,
    pub text: String,
    pub name: String,
    pub avatar: String,
    #[serde(default)]
    pub likes: EmbeddedList<Like>,
    #[serde(default)]
    pub comments: EmbeddedList<Comment>,
    pub date: DateTime<Utc>,
}

impl Post {
    pub fn new(user: Uuid, text: String, name: String, avatar: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            user,
            text,
            name,
            avatar,
            likes: EmbeddedList::default(),
            comments: EmbeddedList::default(),
            date: Utc::now(),
        }
    }
}

impl Document for Post {
    const COLLECTION: Collection = Collection::Posts;

    fn id(&self) -> Uuid {
        self.id
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Like {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub user: Uuid,
}

impl EmbeddedItem for Like {
    type Draft = ();

    fn assemble(id: Uuid, owner: Uuid, _: ()) -> Self {
        Self { id, user: owner }
    }

    fn item_id(&self) -> Uuid {
        self.id
    }

    fn owner(&self) -> Option<Uuid> {
        Some(self.user)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comment {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub user: Uuid,
    pub text: String,
    pub name: String,
    pub avatar: String,
    pub date: DateTime<Utc>,
}

/// Comment text plus the author's display fields at the time of writing
#[derive(Debug, Clone)]
pub struct CommentDraft {
    pub text: String,
    pub name: String,
    pub avatar: String,
}

impl EmbeddedItem for Comment {
    type Draft = CommentDraft;

    fn assemble(id: Uuid, owner: Uuid, draft: CommentDraft) -> Self {
        Self {
            id,
            user: owner,
            text: draft.text,
            name: draft.name,
            avatar: draft.avatar,
            date: Utc::now(),
        }
    }

    fn item_id(&self) -> Uuid {
        self.id
    }

    fn owner(&self) -> Option<Uuid> {
        Some(self.user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::Identity;

    #[test]
    fn serialized_items_carry_their_own_id() {
        let author = Identity::new(Uuid::new_v4());
        let mut post = Post::new(author.id, "hello".into(), "Dev".into(), "avatar".into());
        post.likes.like(&author).unwrap();
        post.comments.add(
            &author,
            CommentDraft { text: "first".into(), name: "Dev".into(), avatar: "avatar".into() },
        );

        let value = serde_json::to_value(&post).unwrap();
        assert_eq!(value["likes"][0]["user"], serde_json::json!(author.id));
        assert_ne!(value["likes"][0]["_id"], serde_json::json!(author.id));
        assert_eq!(value["comments"][0]["text"], "first");
        assert_ne!(value["comments"][0]["_id"], value["_id"]);
    }

    #[test]
    fn missing_lists_deserialize_empty() {
        let id = Uuid::new_v4();
        let post: Post = serde_json::from_value(serde_json::json!({
            "_id": id,
            "user": Uuid::new_v4(),
            "text": "t",
            "name": "n",
            "avatar": "a",
            "date": Utc::now(),
        }))
        .unwrap();
        assert!(post.likes.is_empty());
        assert!(post.comments.is_empty());
    }
}
