//! Seen-events collection.

use serde_json::Value;
use terrace_common::AppResult;

use crate::documents::SeenEvents;
use crate::store::SharedStore;

const COLLECTION: &str = "userSeenEvents";

/// Typed access to the `userSeenEvents` collection, keyed by user ID.
#[derive(Clone)]
pub struct SeenEventsCollection {
    store: SharedStore,
}

impl SeenEventsCollection {
    /// Create a new seen-events collection over a store.
    #[must_use]
    pub fn new(store: SharedStore) -> Self {
        Self { store }
    }

    /// Fetch a user's seen-events record.
    pub async fn get(&self, user_id: &str) -> AppResult<Option<SeenEvents>> {
        match self.store.get(COLLECTION, user_id).await? {
            Some(value) => Ok(Some(super::decode(COLLECTION, value)?)),
            None => Ok(None),
        }
    }

    /// Create a user's record containing exactly one seen event ID.
    pub async fn create(&self, user_id: &str, event_id: &str) -> AppResult<()> {
        let record = SeenEvents {
            seen_event_ids: vec![event_id.to_string()],
        };
        self.store
            .set(COLLECTION, user_id, serde_json::to_value(&record)?)
            .await
    }

    /// Union-insert an event ID into an existing record. Inserting an ID
    /// already present is a no-op.
    pub async fn add(&self, user_id: &str, event_id: &str) -> AppResult<()> {
        self.store
            .array_union(
                COLLECTION,
                user_id,
                "seenEventIds",
                vec![Value::String(event_id.to_string())],
            )
            .await
    }
}
