//! State stores written to by the processing pipeline
//!
//! [`MockStore`] is the in-memory stand-in for an indexer's database. Every
//! read hands out a deep copy and every restore absorbs a deep copy, so no
//! caller ever holds a reference into the live collections.

use async_trait::async_trait;
use serde_json::Value;
use std::collections::BTreeMap;
use tokio::sync::RwLock;
use tracing::debug;

use crate::domain::state::{Record, StoreState};

/// A collection-keyed, append-only state container
#[async_trait]
pub trait StateStore: Send + Sync {
    /// Append a record to a collection, creating the collection on first use
    async fn save(&self, collection: &str, record: Record);

    /// Deep copy of every collection
    async fn get_state(&self) -> StoreState;

    /// Replace all collections with the array-valued entries of `new_state`
    async fn set_state(&self, new_state: &Value);

    /// Drop every collection
    async fn clear(&self);
}

/// In-memory [`StateStore`]
#[derive(Debug, Default)]
pub struct MockStore {
    collections: RwLock<BTreeMap<String, Vec<Record>>>,
}

impl MockStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of a single collection
    pub async fn collection(&self, name: &str) -> Option<Vec<Record>> {
        self.collections.read().await.get(name).cloned()
    }

    /// Total number of records across all collections
    pub async fn record_count(&self) -> usize {
        self.collections.read().await.values().map(Vec::len).sum()
    }
}

#[async_trait]
impl StateStore for MockStore {
    async fn save(&self, collection: &str, record: Record) {
        self.collections
            .write()
            .await
            .entry(collection.to_string())
            .or_default()
            .push(record);
    }

    async fn get_state(&self) -> StoreState {
        self.collections.read().await.clone().into()
    }

    async fn set_state(&self, new_state: &Value) {
        let mut collections = self.collections.write().await;
        collections.clear();

        let Some(entries) = new_state.as_object() else {
            debug!(
                kind = value_kind(new_state),
                "Restore input is not an object; store left empty"
            );
            return;
        };

        for (name, value) in entries {
            match value {
                Value::Array(records) => {
                    collections.insert(name.clone(), records.clone());
                }
                // Non-array entries are skipped on purpose: restore is lenient
                // towards malformed snapshots.
                other => {
                    debug!(
                        collection = %name,
                        kind = value_kind(other),
                        "Skipping non-array collection during restore"
                    );
                }
            }
        }
    }

    async fn clear(&self) {
        self.collections.write().await.clear();
    }
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn save_creates_collection_and_preserves_order() {
        let store = MockStore::new();
        store.save("events", json!(1)).await;
        store.save("events", json!(2)).await;
        store.save("events", json!(1)).await;

        assert_eq!(
            store.collection("events").await,
            Some(vec![json!(1), json!(2), json!(1)])
        );
        assert_eq!(store.collection("missing").await, None);
    }

    #[tokio::test]
    async fn get_state_is_a_detached_copy() {
        let store = MockStore::new();
        store.save("events", json!({"n": 1})).await;

        let snapshot = store.get_state().await;
        store.save("events", json!({"n": 2})).await;
        store.save("other", json!({"n": 3})).await;

        assert_eq!(snapshot.record_count(), 1);
        assert_eq!(store.record_count().await, 3);
    }

    #[tokio::test]
    async fn mutating_a_snapshot_leaves_store_untouched() {
        let store = MockStore::new();
        store.save("events", json!({"n": 1})).await;

        let mut snapshot = store.get_state().await;
        if let Some(events) = snapshot.collection_mut("events") {
            events.clear();
        }

        assert_eq!(store.collection("events").await, Some(vec![json!({"n": 1})]));
    }

    #[tokio::test]
    async fn set_state_replaces_everything() {
        let store = MockStore::new();
        store.save("stale", json!(true)).await;

        store
            .set_state(&json!({"events": [{"n": 1}], "transfers": []}))
            .await;

        let state = store.get_state().await;
        assert_eq!(state.collection("stale"), None);
        assert_eq!(state.collection("events"), Some(&[json!({"n": 1})][..]));
        assert_eq!(state.collection("transfers").map(<[Record]>::len), Some(0));
    }

    #[tokio::test]
    async fn set_state_skips_non_array_entries() {
        let store = MockStore::new();

        store
            .set_state(&json!({
                "events": [1],
                "count": 5,
                "meta": {"k": "v"},
                "nothing": null
            }))
            .await;

        assert_eq!(store.get_state().await.to_value(), json!({"events": [1]}));
    }

    #[tokio::test]
    async fn set_state_with_non_object_leaves_store_empty() {
        let store = MockStore::new();
        store.save("events", json!(1)).await;

        store.set_state(&json!([1, 2, 3])).await;

        assert!(store.get_state().await.is_empty());
    }

    #[tokio::test]
    async fn restored_input_is_not_aliased() {
        let store = MockStore::new();
        let mut input = json!({"events": [1]});

        store.set_state(&input).await;
        if let Some(events) = input["events"].as_array_mut() {
            events.push(json!(2));
        }

        assert_eq!(store.collection("events").await, Some(vec![json!(1)]));
    }

    #[tokio::test]
    async fn clear_drops_all_collections() {
        let store = MockStore::new();
        store.save("a", json!(1)).await;
        store.save("b", json!(2)).await;

        store.clear().await;

        assert!(store.get_state().await.is_empty());
        assert_eq!(store.record_count().await, 0);
    }
}
