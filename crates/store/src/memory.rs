//! In-memory reference backend.

use std::collections::{BTreeMap, HashMap};

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::{RwLock, broadcast};

use campuscare_common::config::StoreConfig;
use campuscare_common::{AppError, AppResult, IdGenerator};

use crate::gateway::{ChangeEvent, ChangeStream, DataStore, Document, Fields};

/// In-memory document store.
///
/// Assigns ULID document ids; iteration within a collection follows id
/// order, which tracks creation time at millisecond granularity. Every
/// successful mutation broadcasts a change notification to the collection's
/// subscribers.
pub struct MemoryStore {
    collections: RwLock<HashMap<String, BTreeMap<String, Fields>>>,
    changes: broadcast::Sender<ChangeEvent>,
    id_gen: IdGenerator,
}

impl MemoryStore {
    /// Create a store with the default change buffer.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(&StoreConfig::default())
    }

    /// Create a store with an explicit configuration.
    #[must_use]
    pub fn with_config(config: &StoreConfig) -> Self {
        let (changes, _) = broadcast::channel(config.change_buffer.max(1));
        Self {
            collections: RwLock::new(HashMap::new()),
            changes,
            id_gen: IdGenerator::new(),
        }
    }

    fn notify(&self, collection: &str) {
        // No receivers is fine; the send result only reports their absence.
        let _ = self.changes.send(ChangeEvent {
            collection: collection.to_string(),
        });
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DataStore for MemoryStore {
    async fn insert(&self, collection: &str, fields: Fields) -> AppResult<String> {
        let id = self.id_gen.generate();
        {
            let mut collections = self.collections.write().await;
            collections
                .entry(collection.to_string())
                .or_default()
                .insert(id.clone(), fields);
        }
        tracing::debug!(collection = collection, id = %id, "Inserted document");
        self.notify(collection);
        Ok(id)
    }

    async fn list(&self, collection: &str) -> AppResult<Vec<Document>> {
        let collections = self.collections.read().await;
        Ok(collections
            .get(collection)
            .map(|docs| {
                docs.iter()
                    .map(|(id, fields)| Document {
                        id: id.clone(),
                        fields: fields.clone(),
                    })
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn query_equals(
        &self,
        collection: &str,
        field: &str,
        value: &Value,
    ) -> AppResult<Vec<Document>> {
        let collections = self.collections.read().await;
        Ok(collections
            .get(collection)
            .map(|docs| {
                docs.iter()
                    .filter(|(_, fields)| fields.get(field) == Some(value))
                    .map(|(id, fields)| Document {
                        id: id.clone(),
                        fields: fields.clone(),
                    })
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn get_by_id(&self, collection: &str, id: &str) -> AppResult<Option<Fields>> {
        let collections = self.collections.read().await;
        Ok(collections
            .get(collection)
            .and_then(|docs| docs.get(id))
            .cloned())
    }

    async fn update_by_id(&self, collection: &str, id: &str, partial: Fields) -> AppResult<()> {
        {
            let mut collections = self.collections.write().await;
            let fields = collections
                .get_mut(collection)
                .and_then(|docs| docs.get_mut(id))
                .ok_or_else(|| AppError::Store(format!("no document {collection}/{id}")))?;

            for (key, value) in partial {
                fields.insert(key, value);
            }
        }
        tracing::debug!(collection = collection, id = id, "Updated document");
        self.notify(collection);
        Ok(())
    }

    async fn delete_by_id(&self, collection: &str, id: &str) -> AppResult<()> {
        let removed = {
            let mut collections = self.collections.write().await;
            collections
                .get_mut(collection)
                .and_then(|docs| docs.remove(id))
                .is_some()
        };
        if removed {
            tracing::debug!(collection = collection, id = id, "Deleted document");
            self.notify(collection);
        }
        Ok(())
    }

    fn subscribe(&self, collection: &str) -> ChangeStream {
        ChangeStream::new(self.changes.subscribe(), collection.to_string())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::gateway::StoreChange;
    use serde_json::json;

    fn fields(pairs: &[(&str, Value)]) -> Fields {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), v.clone()))
            .collect()
    }

    #[tokio::test]
    async fn test_insert_and_get() {
        let store = MemoryStore::new();
        let id = store
            .insert("users", fields(&[("username", json!("ann1"))]))
            .await
            .unwrap();

        let doc = store.get_by_id("users", &id).await.unwrap().unwrap();
        assert_eq!(doc.get("username"), Some(&json!("ann1")));
    }

    #[tokio::test]
    async fn test_query_equals_matches_exactly() {
        let store = MemoryStore::new();
        store
            .insert("users", fields(&[("username", json!("ann1"))]))
            .await
            .unwrap();
        store
            .insert("users", fields(&[("username", json!("bob2"))]))
            .await
            .unwrap();

        let hits = store
            .query_equals("users", "username", &json!("ann1"))
            .await
            .unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].fields.get("username"), Some(&json!("ann1")));

        let misses = store
            .query_equals("users", "username", &json!("ANN1"))
            .await
            .unwrap();
        assert!(misses.is_empty());
    }

    #[tokio::test]
    async fn test_update_merges_fields() {
        let store = MemoryStore::new();
        let id = store
            .insert(
                "complaints",
                fields(&[("status", json!("pending")), ("title", json!("Wifi down"))]),
            )
            .await
            .unwrap();

        store
            .update_by_id("complaints", &id, fields(&[("status", json!("resolved"))]))
            .await
            .unwrap();

        let doc = store.get_by_id("complaints", &id).await.unwrap().unwrap();
        assert_eq!(doc.get("status"), Some(&json!("resolved")));
        assert_eq!(doc.get("title"), Some(&json!("Wifi down")));
    }

    #[tokio::test]
    async fn test_update_missing_document_fails() {
        let store = MemoryStore::new();
        let err = store
            .update_by_id("complaints", "nope", Fields::new())
            .await
            .unwrap_err();
        assert_eq!(err.error_code(), "STORE_ERROR");
    }

    #[tokio::test]
    async fn test_delete_is_idempotent() {
        let store = MemoryStore::new();
        let id = store.insert("complaints", Fields::new()).await.unwrap();

        store.delete_by_id("complaints", &id).await.unwrap();
        assert!(store.get_by_id("complaints", &id).await.unwrap().is_none());

        // Second delete is a no-op, not an error.
        store.delete_by_id("complaints", &id).await.unwrap();
    }

    #[tokio::test]
    async fn test_subscribe_receives_changes() {
        let store = MemoryStore::new();
        let mut changes = store.subscribe("complaints");

        let id = store.insert("complaints", Fields::new()).await.unwrap();
        assert_eq!(changes.recv().await, Some(StoreChange::Changed));

        store
            .update_by_id("complaints", &id, fields(&[("status", json!("resolved"))]))
            .await
            .unwrap();
        assert_eq!(changes.recv().await, Some(StoreChange::Changed));

        store.delete_by_id("complaints", &id).await.unwrap();
        assert_eq!(changes.recv().await, Some(StoreChange::Changed));
    }

    #[tokio::test]
    async fn test_subscribe_filters_other_collections() {
        let store = MemoryStore::new();
        let mut changes = store.subscribe("complaints");

        store.insert("users", Fields::new()).await.unwrap();
        store.insert("complaints", Fields::new()).await.unwrap();

        // Only the complaints insert reaches this subscriber.
        assert_eq!(changes.recv().await, Some(StoreChange::Changed));
        let pending = tokio::time::timeout(std::time::Duration::from_millis(20), changes.recv());
        assert!(pending.await.is_err());
    }

    #[tokio::test]
    async fn test_deleting_absent_document_does_not_notify() {
        let store = MemoryStore::new();
        let mut changes = store.subscribe("complaints");

        store.delete_by_id("complaints", "nope").await.unwrap();

        let pending = tokio::time::timeout(std::time::Duration::from_millis(20), changes.recv());
        assert!(pending.await.is_err());
    }

    #[tokio::test]
    async fn test_list_returns_every_document() {
        let store = MemoryStore::new();
        let first = store.insert("complaints", Fields::new()).await.unwrap();
        let second = store.insert("complaints", Fields::new()).await.unwrap();

        let docs = store.list("complaints").await.unwrap();
        assert_eq!(docs.len(), 2);
        assert!(docs.iter().any(|d| d.id == first));
        assert!(docs.iter().any(|d| d.id == second));
    }
}
