//! Events collection.

use serde_json::{Map, Value};
use terrace_common::{AppError, AppResult};

use crate::documents::{Attendee, Comment, Event};
use crate::store::SharedStore;

use super::TypedSubscription;

const COLLECTION: &str = "events";
const ORDER_FIELD: &str = "createdAt";

/// Typed access to the `events` collection.
#[derive(Clone)]
pub struct EventsCollection {
    store: SharedStore,
}

impl EventsCollection {
    /// Create a new events collection over a store.
    #[must_use]
    pub fn new(store: SharedStore) -> Self {
        Self { store }
    }

    fn not_found(id: &str) -> impl FnOnce(AppError) -> AppError {
        let id = id.to_string();
        move |e| match e {
            AppError::NotFound(_) => AppError::EventNotFound(id),
            other => other,
        }
    }

    /// Insert a new event document.
    pub async fn insert(&self, event: &Event) -> AppResult<()> {
        self.store
            .set(COLLECTION, &event.id, serde_json::to_value(event)?)
            .await
    }

    /// Fetch an event by ID.
    pub async fn get(&self, id: &str) -> AppResult<Option<Event>> {
        match self.store.get(COLLECTION, id).await? {
            Some(value) => Ok(Some(super::decode(COLLECTION, value)?)),
            None => Ok(None),
        }
    }

    /// Fetch an event by ID, failing when absent.
    pub async fn require(&self, id: &str) -> AppResult<Event> {
        self.get(id)
            .await?
            .ok_or_else(|| AppError::EventNotFound(id.to_string()))
    }

    /// Delete an event document.
    pub async fn delete(&self, id: &str) -> AppResult<()> {
        self.store.delete(COLLECTION, id).await
    }

    /// List all events, newest first.
    pub async fn list(&self) -> AppResult<Vec<Event>> {
        let snapshot = self.store.list_desc(COLLECTION, ORDER_FIELD).await?;
        Ok(super::decode_all(COLLECTION, snapshot))
    }

    /// Subscribe to the ordered live event list.
    pub async fn subscribe(&self) -> AppResult<TypedSubscription<Event>> {
        let inner = self.store.subscribe(COLLECTION, ORDER_FIELD).await?;
        Ok(TypedSubscription::new(inner, COLLECTION))
    }

    /// Replace an event's attendee list wholesale.
    pub async fn set_attendees(&self, id: &str, attendees: &[Attendee]) -> AppResult<()> {
        let mut fields = Map::new();
        fields.insert("attendees".to_string(), serde_json::to_value(attendees)?);
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
