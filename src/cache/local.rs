// src/cache/local.rs

use std::sync::Arc;

use chrono::{DateTime, TimeDelta, Utc};
use dashmap::DashMap;
use serde_json::Value;

use super::clock::Clock;

/// Valor guardado + instante absoluto de expiração.
#[derive(Debug, Clone)]
pub struct CacheEnvelope {
    pub value: Value,
    pub expires_at: DateTime<Utc>,
}

impl CacheEnvelope {
    fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }
}

/// Camada local do cache: mapa do processo com TTL por chave e despejo preguiçoso.
pub struct LocalCache {
    entries: DashMap<String, CacheEnvelope>,
    clock: Arc<dyn Clock>,
}

impl LocalCache {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: DashMap::new(),
            clock,
        }
    }

    pub fn get(&self, key: &str) -> Option<Value> {
        let now = self.clock.now();

        // O `Ref` do DashMap precisa ser solto antes do `remove_if`, senão trava o shard.
        if let Some(entry) = self.entries.get(key) {
            if !entry.is_expired(now) {
                return Some(entry.value.clone());
            }
        }

        self.entries.remove_if(key, |_, entry| entry.is_expired(now));
        None
    }

    pub fn insert(&self, key: &str, value: Value, ttl_secs: u64) {
        // TTL acima do que o chrono representa vira "nunca expira"
        let ttl = i64::try_from(ttl_secs)
            .ok()
            .and_then(TimeDelta::try_seconds)
            .unwrap_or(TimeDelta::MAX);
        let expires_at = self
            .clock
            .now()
            .checked_add_signed(ttl)
            .unwrap_or(DateTime::<Utc>::MAX_UTC);

        self.entries
            .insert(key.to_string(), CacheEnvelope { value, expires_at });
    }

    pub fn remove(&self, key: &str) {
        self.entries.remove(key);
    }

    /// Remove tudo que já expirou. Retorna quantas entradas saíram.
    pub fn purge_expired(&self) -> usize {
        let now = self.clock.now();
        let before = self.entries.len();
        self.entries.retain(|_, entry| !entry.is_expired(now));
        before.saturating_sub(self.entries.len())
    }

    pub fn clear(&self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::clock::{ManualClock, SystemClock};
    use chrono::Duration;
    use serde_json::json;

    fn cache() -> (LocalCache, Arc<ManualClock>) {
        let clock = Arc::new(ManualClock::default());
        (LocalCache::new(clock.clone()), clock)
    }

    #[test]
    fn returns_value_until_ttl_elapses() {
        let (cache, clock) = cache();
        cache.insert("k", json!({ "a": 1 }), 60);

        clock.advance(Duration::seconds(59));
        assert_eq!(cache.get("k"), Some(json!({ "a": 1 })));

        clock.advance(Duration::seconds(1));
        assert_eq!(cache.get("k"), None);
        // despejo preguiçoso na leitura
        assert!(cache.is_empty());
    }

    #[test]
    fn cached_null_is_a_hit() {
        let (cache, _) = cache();
        cache.insert("permissions:ghost@x.com", Value::Null, 60);
        assert_eq!(cache.get("permissions:ghost@x.com"), Some(Value::Null));
    }

    #[test]
    fn purge_only_drops_expired_entries() {
        let (cache, clock) = cache();
        cache.insert("short", json!(1), 10);
        cache.insert("long", json!(2), 120);

        clock.advance(Duration::seconds(30));
        assert_eq!(cache.purge_expired(), 1);
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.get("long"), Some(json!(2)));
    }

    #[test]
    fn overwrite_resets_expiry() {
        let (cache, clock) = cache();
        cache.insert("k", json!("old"), 10);
        clock.advance(Duration::seconds(8));
        cache.insert("k", json!("new"), 10);
        clock.advance(Duration::seconds(8));

        assert_eq!(cache.get("k"), Some(json!("new")));
    }

    #[test]
    fn huge_ttl_saturates_instead_of_panicking() {
        let (cache, clock) = cache();
        cache.insert("chrono-limit", json!(1), 10_000_000_000_000_000);
        cache.insert("u64-max", json!(2), u64::MAX);

        clock.advance(Duration::days(365 * 1_000));
        assert_eq!(cache.get("chrono-limit"), Some(json!(1)));
        assert_eq!(cache.get("u64-max"), Some(json!(2)));

        let system = LocalCache::new(Arc::new(SystemClock));
        system.insert("k", json!(3), 10_000_000_000_000_000);
        assert_eq!(system.get("k"), Some(json!(3)));
    }
}
