//! In-memory document store driver.
//!
//! This is the reference driver: all mutations run under a single write
//! lock, which is what makes the array primitives atomic per document.

use std::collections::{BTreeMap, HashMap};

use serde_json::{Map, Value};
use terrace_common::{AppError, AppResult};
use tokio::sync::{RwLock, broadcast};

use crate::store::DocumentStore;
use crate::subscription::{Snapshot, Subscription};

/// Documents of one collection, keyed by id.
pub(crate) type Documents = BTreeMap<String, Value>;

/// All collections, keyed by name.
pub(crate) type Collections = HashMap<String, Documents>;

const WATCH_CAPACITY: usize = 64;

struct State {
    collections: Collections,
    watchers: HashMap<(String, String), broadcast::Sender<Snapshot>>,
}

/// In-memory [`DocumentStore`] driver.
pub struct MemoryStore {
    state: RwLock<State>,
}

impl MemoryStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::from_collections(Collections::new())
    }

    pub(crate) fn from_collections(collections: Collections) -> Self {
        Self {
            state: RwLock::new(State {
                collections,
                watchers: HashMap::new(),
            }),
        }
    }

    pub(crate) async fn export(&self) -> Collections {
        self.state.read().await.collections.clone()
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

/// Order a collection's documents by an integer field, descending, with
/// the document id as tie-breaker.
fn ordered_snapshot(docs: &Documents, order_field: &str) -> Snapshot {
    let mut snapshot: Vec<(i64, String, Value)> = docs
        .iter()
        .map(|(id, doc)| {
            let key = doc.get(order_field).and_then(Value::as_i64).unwrap_or(0);
            (key, id.clone(), doc.clone())
        })
        .collect();
    snapshot.sort_by(|a, b| b.0.cmp(&a.0).then_with(|| b.1.cmp(&a.1)));
    snapshot.into_iter().map(|(_, _, doc)| doc).collect()
}

impl State {
    /// Notify every watcher of a collection after a committed write.
    fn notify(&self, collection: &str) {
        for ((watched, order_field), sender) in &self.watchers {
            if watched != collection || sender.receiver_count() == 0 {
                continue;
            }
            let docs = self.collections.get(collection);
            let snapshot = docs.map(|d| ordered_snapshot(d, order_field)).unwrap_or_default();
            // Send only fails when all receivers are gone; stale senders
            // are reclaimed on the next subscribe.
            let _ = sender.send(snapshot);
        }
    }

    fn doc_mut(&mut self, collection: &str, id: &str) -> AppResult<&mut Map<String, Value>> {
        self.collections
            .get_mut(collection)
            .and_then(|docs| docs.get_mut(id))
            .ok_or_else(|| AppError::NotFound(format!("{collection}/{id}")))?
            .as_object_mut()
            .ok_or_else(|| AppError::Store(format!("{collection}/{id} is not an object")))
    }
}

#[async_trait::async_trait]
impl DocumentStore for MemoryStore {
    async fn get(&self, collection: &str, id: &str) -> AppResult<Option<Value>> {
        let state = self.state.read().await;
        Ok(state
            .collections
            .get(collection)
            .and_then(|docs| docs.get(id))
            .cloned())
    }

    async fn set(&self, collection: &str, id: &str, doc: Value) -> AppResult<()> {
        let mut state = self.state.write().await;
        state
            .collections
            .entry(collection.to_string())
            .or_default()
            .insert(id.to_string(), doc);
        state.notify(collection);
        Ok(())
    }

    async fn update(
        &self,
        collection: &str,
        id: &str,
        fields: Map<String, Value>,
    ) -> AppResult<()> {
        let mut state = self.state.write().await;
        let doc = state.doc_mut(collection, id)?;
        for (key, value) in fields {
            doc.insert(key, value);
        }
        state.notify(collection);
        Ok(())
    }

    async fn delete(&self, collection: &str, id: &str) -> AppResult<()> {
        let mut state = self.state.write().await;
        let removed = state
            .collections
            .get_mut(collection)
            .and_then(|docs| docs.remove(id));
        if removed.is_some() {
            state.notify(collection);
        }
        Ok(())
    }

    async fn array_union(
        &self,
        collection: &str,
        id: &str,
        field: &str,
        values: Vec<Value>,
    ) -> AppResult<()> {
        let mut state = self.state.write().await;
        let doc = state.doc_mut(collection, id)?;
        let array = doc
            .entry(field.to_string())
            .or_insert_with(|| Value::Array(Vec::new()))
            .as_array_mut()
            .ok_or_else(|| {
                AppError::Store(format!("{collection}/{id}.{field} is not an array"))
            })?;
        for value in values {
            if !array.contains(&value) {
                array.push(value);
            }
        }
        state.notify(collection);
        Ok(())
    }

    async fn array_remove(
        &self,
        collection: &str,
        id: &str,
        field: &str,
        values: Vec<Value>,
    ) -> AppResult<()> {
        let mut state = self.state.write().await;
        let doc = state.doc_mut(collection, id)?;
        if let Some(array) = doc.get_mut(field).and_then(Value::as_array_mut) {
            array.retain(|existing| !values.contains(existing));
        }
        state.notify(collection);
        Ok(())
    }

    async fn list_desc(&self, collection: &str, order_field: &str) -> AppResult<Vec<Value>> {
        let state = self.state.read().await;
        Ok(state
            .collections
            .get(collection)
            .map(|docs| ordered_snapshot(docs, order_field))
            .unwrap_or_default())
    }

    async fn subscribe(&self, collection: &str, order_field: &str) -> AppResult<Subscription> {
        let mut state = self.state.write().await;
        let sender = state
            .watchers
            .entry((collection.to_string(), order_field.to_string()))
            .or_insert_with(|| broadcast::channel(WATCH_CAPACITY).0);
        let rx = sender.subscribe();
        let initial = state
            .collections
            .get(collection)
            .map(|docs| ordered_snapshot(docs, order_field))
            .unwrap_or_default();
        Ok(Subscription::new(initial, rx))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_set_then_get_round_trips() {
        let store = MemoryStore::new();
        store
            .set("events", "e1", json!({"title": "Derby day"}))
            .await
            .unwrap();

        let doc = store.get("events", "e1").await.unwrap();
        assert_eq!(doc, Some(json!({"title": "Derby day"})));
    }

    #[tokio::test]
    async fn test_get_missing_returns_none() {
        let store = MemoryStore::new();
        assert!(store.get("events", "nope").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_update_merges_fields() {
        let store = MemoryStore::new();
        store
            .set("events", "e1", json!({"title": "Old", "location": "North Stand"}))
            .await
            .unwrap();

        let mut fields = Map::new();
        fields.insert("title".to_string(), json!("New"));
        store.update("events", "e1", fields).await.unwrap();

        let doc = store.get("events", "e1").await.unwrap().unwrap();
        assert_eq!(doc["title"], "New");
        assert_eq!(doc["location"], "North Stand");
    }

    #[tokio::test]
    async fn test_update_missing_document_fails() {
        let store = MemoryStore::new();
        let result = store.update("events", "nope", Map::new()).await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_array_union_skips_duplicates() {
        let store = MemoryStore::new();
        store.set("events", "e1", json!({})).await.unwrap();

        store
            .array_union("events", "e1", "likes", vec![json!("u1")])
            .await
            .unwrap();
        store
            .array_union("events", "e1", "likes", vec![json!("u1"), json!("u2")])
            .await
            .unwrap();

        let doc = store.get("events", "e1").await.unwrap().unwrap();
        assert_eq!(doc["likes"], json!(["u1", "u2"]));
    }

    #[tokio::test]
    async fn test_array_remove_matches_exact_values() {
        let store = MemoryStore::new();
        store
            .set("events", "e1", json!({"likes": ["u1", "u2"]}))
            .await
            .unwrap();

        store
            .array_remove("events", "e1", "likes", vec![json!("u1"), json!("u3")])
            .await
            .unwrap();

        let doc = store.get("events", "e1").await.unwrap().unwrap();
        assert_eq!(doc["likes"], json!(["u2"]));
    }

    #[tokio::test]
    async fn test_list_desc_orders_by_field() {
        let store = MemoryStore::new();
        store
            .set("events", "a", json!({"createdAt": 100}))
            .await
            .unwrap();
        store
            .set("events", "b", json!({"createdAt": 300}))
            .await
            .unwrap();
        store
            .set("events", "c", json!({"createdAt": 200}))
            .await
            .unwrap();

        let listed = store.list_desc("events", "createdAt").await.unwrap();
        let order: Vec<i64> = listed.iter().map(|d| d["createdAt"].as_i64().unwrap()).collect();
        assert_eq!(order, vec![300, 200, 100]);
    }

    #[tokio::test]
    async fn test_subscribe_delivers_current_then_updates() {
        let store = MemoryStore::new();
        store
            .set("events", "e1", json!({"createdAt": 1}))
            .await
            .unwrap();

        let mut sub = store.subscribe("events", "createdAt").await.unwrap();
        let first = sub.next_snapshot().await.unwrap();
        assert_eq!(first.len(), 1);

        store
            .set("events", "e2", json!({"createdAt": 2}))
            .await
            .unwrap();
        let second = sub.next_snapshot().await.unwrap();
        assert_eq!(second.len(), 2);
        assert_eq!(second[0]["createdAt"], 2);

        sub.unsubscribe();
    }

    #[tokio::test]
    async fn test_independent_subscriptions_each_get_snapshots() {
        let store = MemoryStore::new();
        let mut sub_a = store.subscribe("events", "createdAt").await.unwrap();
        let mut sub_b = store.subscribe("events", "createdAt").await.unwrap();

        assert!(sub_a.next_snapshot().await.unwrap().is_empty());
        assert!(sub_b.next_snapshot().await.unwrap().is_empty());

        store.set("events", "e1", json!({"createdAt": 1})).await.unwrap();
        assert_eq!(sub_a.next_snapshot().await.unwrap().len(), 1);
        assert_eq!(sub_b.next_snapshot().await.unwrap().len(), 1);
    }
}
