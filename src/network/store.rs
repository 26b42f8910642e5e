//! Shared Store
//!
//! The replication substrate: a shared key-value namespace with per-key
//! last-write-observed semantics, partial (per-field) merges, null
//! tombstones, and an unordered change feed. Peers exchange state only
//! through this surface; the engine treats the backend as a black box.

use std::collections::BTreeMap;
use std::sync::{Mutex, PoisonError};

use serde_json::{Map, Value};
use thiserror::Error;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing::debug;

/// Store backend errors.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Writes must be JSON objects (field merge) or null (tombstone).
    #[error("unsupported write at {key}: expected object or null")]
    UnsupportedWrite {
        /// Key the write targeted
        key: String,
    },
}

/// One observed change.
///
/// `value` is the write as it happened: the partial object for a merge,
/// None for a tombstone. Subscribers must treat absent fields as "no
/// update", never as resets.
#[derive(Clone, Debug)]
pub struct StoreEvent {
    /// Key that changed
    pub key: String,

    /// The written partial, or None for a deletion
    pub value: Option<Value>,
}

/// A shared mutable key-value namespace connecting peers.
///
/// Contract: `put` of an object merges the given fields into the record
/// (a null field value clears that field); `put` of null tombstones the
/// whole record; `get` reads the full current record; `observe` returns a
/// change feed primed with every record already present. Delivery is
/// unordered and best-effort, and writers hear their own echoes.
pub trait SharedStore: Send + Sync {
    /// Merge fields into a record, or tombstone it with a null value.
    fn put(&self, key: &str, value: Value) -> Result<(), StoreError>;

    /// Read a full record.
    fn get(&self, key: &str) -> Option<Value>;

    /// Subscribe to the namespace. Existing records are replayed first so
    /// late joiners see the current population.
    fn observe(&self) -> UnboundedReceiver<StoreEvent>;
}

/// Process-local store used by tests and the demo binary.
///
/// Multiple sessions in one process share a namespace through this; it
/// implements the same merge/tombstone/replay semantics a networked
/// backend would provide.
#[derive(Default)]
pub struct MemoryStore {
    records: Mutex<BTreeMap<String, Map<String, Value>>>,
    subscribers: Mutex<Vec<UnboundedSender<StoreEvent>>>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    fn broadcast(&self, event: StoreEvent) {
        let mut subscribers = self
            .subscribers
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        subscribers.retain(|tx| tx.send(event.clone()).is_ok());
    }
}

impl SharedStore for MemoryStore {
    fn put(&self, key: &str, value: Value) -> Result<(), StoreError> {
        match value {
            Value::Null => {
                let existed = {
                    let mut records =
                        self.records.lock().unwrap_or_else(PoisonError::into_inner);
                    records.remove(key).is_some()
                };
                debug!(key, existed, "record tombstoned");
                // Broadcast even for unknown keys: racing evictions write
                // the same tombstone twice and both must stay harmless.
                self.broadcast(StoreEvent {
                    key: key.to_owned(),
                    value: None,
                });
                Ok(())
            }
            Value::Object(fields) => {
                {
                    let mut records =
                        self.records.lock().unwrap_or_else(PoisonError::into_inner);
                    let record = records.entry(key.to_owned()).or_default();
                    for (name, field) in &fields {
                        if field.is_null() {
                            record.remove(name);
                        } else {
                            record.insert(name.clone(), field.clone());
                        }
                    }
                }
                self.broadcast(StoreEvent {
                    key: key.to_owned(),
                    value: Some(Value::Object(fields)),
                });
                Ok(())
            }
            _ => Err(StoreError::UnsupportedWrite {
                key: key.to_owned(),
            }),
        }
    }

    fn get(&self, key: &str) -> Option<Value> {
        let records = self.records.lock().unwrap_or_else(PoisonError::into_inner);
        records.get(key).cloned().map(Value::Object)
    }

    fn observe(&self) -> UnboundedReceiver<StoreEvent> {
        let (tx, rx) = mpsc::unbounded_channel();
        // The records lock is held across replay and registration: a write
        // cannot land between them, so it is either replayed or broadcast.
        let records = self.records.lock().unwrap_or_else(PoisonError::into_inner);
        for (key, record) in records.iter() {
            let _ = tx.send(StoreEvent {
                key: key.clone(),
                value: Some(Value::Object(record.clone())),
            });
        }
        self.subscribers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(tx);
        drop(records);
        rx
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_put_merges_fields() {
        let store = MemoryStore::new();
        store.put("players/p1", json!({"name": "Aster", "x": 10})).unwrap();
        store.put("players/p1", json!({"x": 20, "health": 70})).unwrap();

        let record = store.get("players/p1").unwrap();
        assert_eq!(record["name"], "Aster");
        assert_eq!(record["x"], 20);
        assert_eq!(record["health"], 70);
    }

    #[test]
    fn test_null_field_clears_that_field() {
        let store = MemoryStore::new();
        store
            .put("players/p1", json!({"health": 70, "knockback": {"x": 15.0, "y": 0.0}}))
            .unwrap();
        store.put("players/p1", json!({"knockback": null})).unwrap();

        let record = store.get("players/p1").unwrap();
        assert_eq!(record["health"], 70);
        assert!(record.get("knockback").is_none());
    }

    #[test]
    fn test_null_value_tombstones_record() {
        let store = MemoryStore::new();
        store.put("players/p1", json!({"name": "Aster"})).unwrap();
        store.put("players/p1", Value::Null).unwrap();
        assert!(store.get("players/p1").is_none());

        // Second tombstone for the same key is harmless
        store.put("players/p1", Value::Null).unwrap();
        assert!(store.get("players/p1").is_none());
    }

    #[test]
    fn test_observe_replays_existing_records() {
        let store = MemoryStore::new();
        store.put("players/p1", json!({"name": "Aster"})).unwrap();
        store.put("players/p2", json!({"name": "Brynn"})).unwrap();

        let mut feed = store.observe();
        let first = feed.try_recv().unwrap();
        let second = feed.try_recv().unwrap();
        assert!(feed.try_recv().is_err());

        assert_eq!(first.key, "players/p1");
        assert_eq!(second.key, "players/p2");
        assert_eq!(first.value.unwrap()["name"], "Aster");
    }

    #[test]
    fn test_writes_racing_observe_are_never_lost() {
        use std::collections::BTreeSet;
        use std::sync::Arc;
        use std::thread;

        let store = Arc::new(MemoryStore::new());
        let writer = {
            let store = Arc::clone(&store);
            thread::spawn(move || {
                for i in 0..64 {
                    store
                        .put(&format!("players/w{:02}", i), json!({"x": i}))
                        .unwrap();
                }
            })
        };

        // Subscribe while the writer is mid-stream. Every write must show
        // up, either in the replay or as a live event.
        let mut feed = store.observe();
        writer.join().unwrap();

        let mut seen = BTreeSet::new();
        while let Ok(event) = feed.try_recv() {
            seen.insert(event.key);
        }
        for i in 0..64 {
            let key = format!("players/w{:02}", i);
            assert!(seen.contains(&key), "no event for {}", key);
        }
    }

    #[test]
    fn test_writer_hears_own_echo() {
        let store = MemoryStore::new();
        let mut feed = store.observe();

        store.put("players/p1", json!({"x": 5})).unwrap();
        let event = feed.try_recv().unwrap();
        assert_eq!(event.key, "players/p1");
        assert_eq!(event.value.unwrap(), json!({"x": 5}));
    }

    #[test]
    fn test_events_carry_the_partial_as_written() {
        let store = MemoryStore::new();
        store.put("players/p1", json!({"name": "Aster", "x": 1})).unwrap();

        let mut feed = store.observe();
        feed.try_recv().unwrap(); // replayed full record

        store.put("players/p1", json!({"x": 2})).unwrap();
        let event = feed.try_recv().unwrap();
        // Only the written field, not the whole record
        assert_eq!(event.value.unwrap(), json!({"x": 2}));
    }

    #[test]
    fn test_non_object_write_rejected() {
        let store = MemoryStore::new();
        let err = store.put("players/p1", json!(42)).unwrap_err();
        assert!(matches!(err, StoreError::UnsupportedWrite { .. }));
    }

    #[test]
    fn test_tombstone_reaches_subscribers() {
        let store = MemoryStore::new();
        store.put("players/p1", json!({"name": "Aster"})).unwrap();

        let mut feed = store.observe();
        feed.try_recv().unwrap();

        store.put("players/p1", Value::Null).unwrap();
        let event = feed.try_recv().unwrap();
        assert_eq!(event.key, "players/p1");
        assert!(event.value.is_none());
    }
}
