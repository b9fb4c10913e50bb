//! Selfsame Store - append-only cross-run history
//!
//! Persists observed values (usernames, avatar fingerprints) per resolved
//! identity so repeated runs can detect change. The storage backend is an
//! injected key-value abstraction; production uses a JSON file, tests use
//! an in-memory map.

pub mod history;
pub mod kv;

pub use history::{avatar_fingerprint, HistoryTracker};
pub use kv::{JsonFileStore, KeyValueStore, MemoryStore, StoreError};
