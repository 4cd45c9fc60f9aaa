use serde_json::Value;
use std::{
    collections::HashMap,
    sync::{Mutex, PoisonError},
    time::{Duration, Instant},
};

#[derive(Debug)]
struct CacheEntry {
    resource: &'static str,
    stored_at: Instant,
    value: Value,
}

/// List responses kept for a short time, keyed by resource and query.
///
/// A zero TTL disables caching.
#[derive(Debug)]
pub struct QueryCache {
    ttl: Duration,
    entries: Mutex<HashMap<String, CacheEntry>>,
}

impl QueryCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: Mutex::new(HashMap::new()),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    fn key(resource: &str, query: &str) -> String {
        format!("{}?{}", resource, query)
    }

    pub fn get(&self, resource: &'static str, query: &str) -> Option<Value> {
        let key = Self::key(resource, query);
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);

        match entries.get(&key) {
            Some(entry) if entry.stored_at.elapsed() < self.ttl => Some(entry.value.clone()),
            Some(_) => {
                entries.remove(&key);
                None
            }
            None => None,
        }
    }

    pub fn insert(&self, resource: &'static str, query: &str, value: Value) {
        if self.ttl.is_zero() {
            return;
        }
        let entry = CacheEntry {
            resource,
            stored_at: Instant::now(),
            value,
        };
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(Self::key(resource, query), entry);
    }

    /// Drops every cached query of `resource`; returns how many were removed.
    pub fn invalidate(&self, resource: &str) -> usize {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        let before = entries.len();
        entries.retain(|_, entry| entry.resource != resource);
        before - entries.len()
    }

    pub fn clear(&self) {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }

    pub fn len(&self) -> usize {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
