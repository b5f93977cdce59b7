//! Posts collection.

use serde_json::{Map, Value};
use terrace_common::{AppError, AppResult};

use crate::documents::{Comment, Post};
use crate::store::SharedStore;

use super::TypedSubscription;

const COLLECTION: &str = "posts";
const ORDER_FIELD: &str = "createdAt";

/// Typed access to the `posts` collection.
#[derive(Clone)]
pub struct PostsCollection {
    store: SharedStore,
}

impl PostsCollection {
    /// Create a new posts collection over a store.
    #[must_use]
    pub fn new(store: SharedStore) -> Self {
        Self { store }
    }

    fn not_found(id: &str) -> impl FnOnce(AppError) -> AppError {
        let id = id.to_string();
        move |e| match e {
            AppError::NotFound(_) => AppError::PostNotFound(id),
            other => other,
        }
    }

    /// Insert a new post document.
    pub async fn insert(&self, post: &Post) -> AppResult<()> {
        self.store
            .set(COLLECTION, &post.id, serde_json::to_value(post)?)
            .await
    }

    /// Fetch a post by ID.
    pub async fn get(&self, id: &str) -> AppResult<Option<Post>> {
        match self.store.get(COLLECTION, id).await? {
            Some(value) => Ok(Some(super::decode(COLLECTION, value)?)),
            None => Ok(None),
        }
    }

    /// Fetch a post by ID, failing when absent.
    pub async fn require(&self, id: &str) -> AppResult<Post> {
        self.get(id)
            .await?
            .ok_or_else(|| AppError::PostNotFound(id.to_string()))
    }

    /// Delete a post document.
    pub async fn delete(&self, id: &str) -> AppResult<()> {
        self.store.delete(COLLECTION, id).await
    }

    /// List all posts, newest first.
    pub async fn list(&self) -> AppResult<Vec<Post>> {
        let snapshot = self.store.list_desc(COLLECTION, ORDER_FIELD).await?;
        Ok(super::decode_all(COLLECTION, snapshot))
    }

    /// Subscribe to the ordered live post list.
    pub async fn subscribe(&self) -> AppResult<TypedSubscription<Post>> {
        let inner = self.store.subscribe(COLLECTION, ORDER_FIELD).await?;
        Ok(TypedSubscription::new(inner, COLLECTION))
    }

    /// Update a post's body and bump its edit timestamp.
    pub async fn set_content(&self, id: &str, content: &str, updated_at_millis: i64) -> AppResult<()> {
        let mut fields = Map::new();
        fields.insert("content".to_string(), Value::String(content.to_string()));
        fields.insert("updatedAt".to_string(), Value::from(updated_at_millis));
        self.store
            .update(COLLECTION, id, fields)
            .await
            .map_err(Self::not_found(id))
    }

    /// Append a comment via the store's atomic array union.
    pub async fn push_comment(&self, id: &str, comment: &Comment) -> AppResult<()> {
        self.store
            .array_union(COLLECTION, id, "comments", vec![serde_json::to_value(comment)?])
            .await
            .map_err(Self::not_found(id))
    }

    /// Add a like via the store's atomic array union.
    pub async fn add_like(&self, id: &str, user_id: &str) -> AppResult<()> {
        self.store
            .array_union(COLLECTION, id, "likes", vec![Value::String(user_id.to_string())])
            .await
            .map_err(Self::not_found(id))
    }

    /// Remove a like via the store's atomic array remove.
    pub async fn remove_like(&self, id: &str, user_id: &str) -> AppResult<()> {
        self.store
            .array_remove(COLLECTION, id, "likes", vec![Value::String(user_id.to_string())])
            .await
            .map_err(Self::not_found(id))
    }
}
