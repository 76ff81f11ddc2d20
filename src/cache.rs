use std::{
    sync::Arc,
    time::{Duration, Instant},
};

use dashmap::DashMap;

#[derive(Clone, Debug)]
pub struct CachedEntry<T> {
    pub value: Arc<T>,
    inserted_at: Instant,
}

impl<T> CachedEntry<T> {
    fn is_fresh(&self, ttl: Duration) -> bool {
        self.inserted_at.elapsed() < ttl
    }
}

/// One value per key, dropped once it is older than `ttl`.
#[derive(Clone, Debug)]
pub struct ExpiringCache<K, V>
where
    K: Eq + std::hash::Hash,
{
    ttl: Duration,
    entries: Arc<DashMap<K, CachedEntry<V>>>,
}

impl<K, V> ExpiringCache<K, V>
where
    K: Eq + std::hash::Hash + Clone,
{
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: Arc::new(DashMap::new()),
        }
    }

    pub fn insert(&self, key: K, value: V) -> Arc<V> {
        let value = Arc::new(value);
        self.entries.insert(
            key,
            CachedEntry {
                value: value.clone(),
                inserted_at: Instant::now(),
            },
        );
        value
    }

    pub fn get(&self, key: &K) -> Option<Arc<V>> {
        self.entries
            .get(key)
            .filter(|entry| entry.is_fresh(self.ttl))
            .map(|entry| entry.value.clone())
    }

    pub fn invalidate(&self, key: &K) -> bool {
        self.entries.remove(key).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries
            .iter()
            .filter(|entry| entry.is_fresh(self.ttl))
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clean_expired(&self) -> (usize, usize) {
        let before = self.entries.len();
        self.entries.retain(|_, entry| entry.is_fresh(self.ttl));
        let remaining = self.entries.len();
        (before.saturating_sub(remaining), remaining)
    }
}
