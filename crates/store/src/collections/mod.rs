//! Typed collection wrappers over the raw document store.

mod events;
mod posts;
mod seen_events;
mod users;

pub use events::EventsCollection;
pub use posts::PostsCollection;
pub use seen_events::SeenEventsCollection;
pub use users::UsersCollection;

use std::marker::PhantomData;

use serde::de::DeserializeOwned;
use serde_json::Value;
use terrace_common::{AppError, AppResult};

use crate::subscription::Subscription;

/// Decode one document, surfacing the collection name in the error.
fn decode<T: DeserializeOwned>(collection: &str, value: Value) -> AppResult<T> {
    serde_json::from_value(value)
        .map_err(|e| AppError::Store(format!("Bad document in {collection}: {e}")))
}

/// Decode a snapshot, skipping documents that fail to decode.
///
/// A malformed document written by another client must not take down the
/// live view; it is logged and dropped from the snapshot instead.
fn decode_all<T: DeserializeOwned>(collection: &str, snapshot: Vec<Value>) -> Vec<T> {
    snapshot
        .into_iter()
        .filter_map(|value| match decode(collection, value) {
            Ok(doc) => Some(doc),
            Err(e) => {
                tracing::warn!(collection, error = %e, "Skipping undecodable document");
                None
            }
        })
        .collect()
}

/// A live subscription decoded into typed documents.
pub struct TypedSubscription<T> {
    inner: Subscription,
    collection: &'static str,
    _marker: PhantomData<fn() -> T>,
}

impl<T: DeserializeOwned> TypedSubscription<T> {
    const fn new(inner: Subscription, collection: &'static str) -> Self {
        Self {
            inner,
            collection,
            _marker: PhantomData,
        }
    }

    /// Wait for the next decoded snapshot. See
    /// [`Subscription::next_snapshot`].
    pub async fn next_snapshot(&mut self) -> Option<Vec<T>> {
        let snapshot = self.inner.next_snapshot().await?;
        Some(decode_all(self.collection, snapshot))
    }

    /// Tear down the subscription and release the listener.
    pub fn unsubscribe(self) {
        self.inner.unsubscribe();
    }
}
