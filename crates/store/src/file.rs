//! JSON-file-persisted document store driver.
//!
//! Backs one-shot tooling such as `terrace-admin`. The whole database is
//! loaded on open and flushed after every committed write; live
//! subscription semantics are inherited from the in-memory driver.
//!
//! A write commits to memory before the flush, so a failed flush leaves
//! the in-memory state ahead of the file until the process exits. The
//! error is surfaced to the caller; one-shot tooling stops there rather
//! than continuing on divergent state.

use std::path::PathBuf;

use serde_json::{Map, Value};
use terrace_common::{AppError, AppResult};

use crate::memory::{Collections, MemoryStore};
use crate::store::DocumentStore;
use crate::subscription::Subscription;

/// File-backed [`DocumentStore`] driver.
pub struct FileStore {
    path: PathBuf,
    inner: MemoryStore,
}

impl FileStore {
    /// Open a store at the given path, creating an empty one when the
    /// file does not exist yet.
    pub async fn open(path: impl Into<PathBuf>) -> AppResult<Self> {
        let path = path.into();
        let collections = match tokio::fs::read(&path).await {
            Ok(bytes) => serde_json::from_slice::<Collections>(&bytes)
                .map_err(|e| AppError::Store(format!("Failed to parse {}: {e}", path.display())))?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Collections::new(),
            Err(e) => {
                return Err(AppError::Store(format!(
                    "Failed to read {}: {e}",
                    path.display()
                )));
            }
        };

        Ok(Self {
            path,
            inner: MemoryStore::from_collections(collections),
        })
    }

    async fn flush(&self) -> AppResult<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent)
                    .await
                    .map_err(|e| AppError::Store(format!("Failed to create directory: {e}")))?;
            }
        }

        let collections = self.inner.export().await;
        let bytes = serde_json::to_vec_pretty(&collections)
            .map_err(|e| AppError::Store(format!("Failed to encode store: {e}")))?;
        tokio::fs::write(&self.path, bytes)
            .await
            .map_err(|e| AppError::Store(format!("Failed to write {}: {e}", self.path.display())))
    }
}

#[async_trait::async_trait]
impl DocumentStore for FileStore {
    async fn get(&self, collection: &str, id: &str) -> AppResult<Option<Value>> {
        self.inner.get(collection, id).await
    }

    async fn set(&self, collection: &str, id: &str, doc: Value) -> AppResult<()> {
        self.inner.set(collection, id, doc).await?;
        self.flush().await
    }

    async fn update(
        &self,
        collection: &str,
        id: &str,
        fields: Map<String, Value>,
    ) -> AppResult<()> {
        self.inner.update(collection, id, fields).await?;
        self.flush().await
    }

    async fn delete(&self, collection: &str, id: &str) -> AppResult<()> {
        self.inner.delete(collection, id).await?;
        self.flush().await
    }

    async fn array_union(
        &self,
        collection: &str,
        id: &str,
        field: &str,
        values: Vec<Value>,
    ) -> AppResult<()> {
        self.inner.array_union(collection, id, field, values).await?;
        self.flush().await
    }

    async fn array_remove(
        &self,
        collection: &str,
        id: &str,
        field: &str,
        values: Vec<Value>,
    ) -> AppResult<()> {
        self.inner.array_remove(collection, id, field, values).await?;
        self.flush().await
    }

    async fn list_desc(&self, collection: &str, order_field: &str) -> AppResult<Vec<Value>> {
        self.inner.list_desc(collection, order_field).await
    }

    async fn subscribe(&self, collection: &str, order_field: &str) -> AppResult<Subscription> {
        self.inner.subscribe(collection, order_field).await
    }
}
