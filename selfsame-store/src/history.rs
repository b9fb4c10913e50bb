//! Compare-and-append history tracking
//!
//! One ordered, append-only sequence of observations per identity key.
//! A new observation is appended only when it differs from the current
//! tail, so re-running an investigation never grows history. The
//! read-check-write cycle is held under one lock; concurrent runs for the
//! same identity must not share separate store instances.

use parking_lot::Mutex;
use serde::de::DeserializeOwned;
use serde::Serialize;
use sha2::{Digest, Sha256};
use tracing::debug;

use crate::kv::{KeyValueStore, StoreError};

/// Tracks one attribute's history over an injected store
pub struct HistoryTracker<S> {
    store: S,
    lock: Mutex<()>,
}

impl<S: KeyValueStore> HistoryTracker<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            lock: Mutex::new(()),
        }
    }

    /// Load the history for `key`, append `current` when it differs from
    /// the tail, and report whether a change was observed.
    ///
    /// A first-ever observation always reports `changed = true`; that
    /// establishes the baseline.
    pub fn compare_and_append<T>(
        &self,
        key: &str,
        current: &T,
        same: impl Fn(&T, &T) -> bool,
    ) -> Result<(Vec<T>, bool), StoreError>
    where
        T: Serialize + DeserializeOwned + Clone,
    {
        let _guard = self.lock.lock();

        let mut history: Vec<T> = match self.store.get(key)? {
            Some(value) => serde_json::from_value(value)?,
            None => Vec::new(),
        };

        if let Some(tail) = history.last() {
            if same(tail, current) {
                debug!("history for {} unchanged ({} entries)", key, history.len());
                return Ok((history, false));
            }
        }

        history.push(current.clone());
        self.store.put(key, serde_json::to_value(&history)?)?;
        debug!("history for {} appended ({} entries)", key, history.len());

        Ok((history, true))
    }
}

/// Content fingerprint of an avatar image reference.
///
/// The query string is stripped before hashing so CDN cache-busting
/// parameters never register as an avatar change.
pub fn avatar_fingerprint(url: &str) -> String {
    let canonical = url.split('?').next().unwrap_or(url);
    let mut hasher = Sha256::new();
    hasher.update(canonical.as_bytes());
    format!("{:x}", hasher.finalize())[..16].to_string()
}
