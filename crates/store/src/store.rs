//! The document store trait.

use std::sync::Arc;

use serde_json::{Map, Value};
use terrace_common::AppResult;

use crate::subscription::Subscription;

/// Shared handle to a document store driver.
pub type SharedStore = Arc<dyn DocumentStore>;

/// An external document store, addressed as named collections of
/// JSON documents keyed by id.
///
/// Write safety relies on the driver's per-document atomic primitives:
/// [`array_union`](Self::array_union) and
/// [`array_remove`](Self::array_remove) operate on exact value equality
/// and are atomic against the stored array. Multi-field read-modify-write
/// sequences are *not* transactional; callers that need them accept
/// last-write-wins semantics.
#[async_trait::async_trait]
pub trait DocumentStore: Send + Sync {
    /// Point-read a document. Returns `None` when absent.
    async fn get(&self, collection: &str, id: &str) -> AppResult<Option<Value>>;

    /// Create or fully replace a document.
    async fn set(&self, collection: &str, id: &str, doc: Value) -> AppResult<()>;

    /// Merge fields into an existing document.
    ///
    /// Fails with a not-found error when the document does not exist.
    async fn update(&self, collection: &str, id: &str, fields: Map<String, Value>)
    -> AppResult<()>;

    /// Delete a document. Deleting an absent document is a no-op.
    async fn delete(&self, collection: &str, id: &str) -> AppResult<()>;

    /// Atomically add values to an array field, skipping values already
    /// present (exact equality). Creates the field when absent.
    async fn array_union(
        &self,
        collection: &str,
        id: &str,
        field: &str,
        values: Vec<Value>,
    ) -> AppResult<()>;

    /// Atomically remove all occurrences of the given values from an
    /// array field (exact equality).
    async fn array_remove(
        &self,
        collection: &str,
        id: &str,
        field: &str,
        values: Vec<Value>,
    ) -> AppResult<()>;

    /// List a collection ordered by an integer field, descending.
    async fn list_desc(&self, collection: &str, order_field: &str) -> AppResult<Vec<Value>>;

    /// Subscribe to live ordered snapshots of a collection.
    ///
    /// The first snapshot delivered is the collection's current state;
    /// subsequent snapshots follow each committed write, in the order the
    /// store applied them. Independent subscriptions carry no
    /// cross-ordering guarantee. The returned handle must be dropped or
    /// explicitly unsubscribed to release the listener.
    async fn subscribe(&self, collection: &str, order_field: &str) -> AppResult<Subscription>;
}
