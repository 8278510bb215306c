//! Time-bounded key/value store shared by every fetch in the process.
//!
//! Entries leave only by expiry or overwrite; there is no size bound. Values
//! are type-erased so one store can hold leagues, teams and match data side by
//! side. Expiry is measured on the tokio clock.

use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::sync::{Mutex, PoisonError};
use std::time::Duration;
use tokio::time::Instant;

struct CacheEntry {
    value: Box<dyn Any + Send + Sync>,
    expires_at: Instant,
}

#[derive(Default)]
pub struct TtlCache {
    entries: Mutex<HashMap<String, CacheEntry>>,
}

impl TtlCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// The value stored under `key`, if it has not expired and is a `T`.
    ///
    /// Expired entries are left in place and reported as absent; the next
    /// successful `set` overwrites them.
    pub fn get<T>(&self, key: &str) -> Option<T>
    where
        T: Clone + 'static,
    {
        let entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        let entry = entries.get(key)?;
        if Instant::now() >= entry.expires_at {
            return None;
        }
        entry.value.downcast_ref::<T>().cloned()
    }

    /// Store `value` under `key` until `now + ttl`, replacing any previous entry.
    pub fn set<T>(&self, key: impl Into<String>, value: T, ttl: Duration)
    where
        T: Send + Sync + 'static,
    {
        let entry = CacheEntry {
            value: Box::new(value),
            expires_at: Instant::now() + ttl,
        };
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.into(), entry);
    }
}

impl fmt::Debug for TtlCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let len = self.entries.lock().map(|e| e.len()).unwrap_or_default();
        f.debug_struct("TtlCache").field("entries", &len).finish()
    }
}
