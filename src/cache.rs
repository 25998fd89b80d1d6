use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::debug;

/// Fetched values keyed by endpoint, fresh for `ttl` after insertion.
#[derive(Debug)]
pub struct TtlCache<V> {
    ttl: Duration,
    entries: HashMap<String, (Instant, Arc<V>)>,
}

impl<V> TtlCache<V> {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: HashMap::new(),
        }
    }

    pub fn get(&self, key: &str) -> Option<Arc<V>> {
        self.entries
            .get(key)
            .filter(|(stored_at, _)| stored_at.elapsed() < self.ttl)
            .map(|(_, value)| Arc::clone(value))
    }

    pub fn insert(&mut self, key: &str, value: V) -> Arc<V> {
        let value = Arc::new(value);
        self.entries
            .insert(key.to_string(), (Instant::now(), Arc::clone(&value)));
        value
    }

    /// Returns the fresh cached value or runs `fetch` and caches its success.
    /// Errors are passed through and nothing is cached for them.
    pub async fn get_or_try_insert_with<F, Fut, E>(&mut self, key: &str, fetch: F) -> Result<Arc<V>, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<V, E>>,
    {
        if let Some(value) = self.get(key) {
            debug!("cache hit for {}", key);
            return Ok(value);
        }
        let value = fetch().await?;
        Ok(self.insert(key, value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_entries_are_returned() {
        let mut cache = TtlCache::new(Duration::from_secs(60));
        cache.insert("a", 1);
        assert_eq!(cache.get("a").as_deref(), Some(&1));
        assert!(cache.get("b").is_none());
    }

    #[test]
    fn zero_ttl_never_hits() {
        let mut cache = TtlCache::new(Duration::ZERO);
        cache.insert("a", 1);
        assert!(cache.get("a").is_none());
    }

    #[tokio::test]
    async fn fetch_runs_once_while_fresh() {
        let mut cache = TtlCache::new(Duration::from_secs(60));
        let mut calls = 0;

        for _ in 0..3 {
            let value = cache
                .get_or_try_insert_with("draw", || {
                    calls += 1;
                    async { Ok::<_, String>(42) }
                })
                .await
                .unwrap();
            assert_eq!(*value, 42);
        }
        assert_eq!(calls, 1);
    }

    #[tokio::test]
    async fn failures_are_not_cached() {
        let mut cache: TtlCache<u32> = TtlCache::new(Duration::from_secs(60));

        let err = cache
            .get_or_try_insert_with("draw", || async { Err("offline".to_string()) })
            .await
            .unwrap_err();
        assert_eq!(err, "offline");

        let value = cache
            .get_or_try_insert_with("draw", || async { Ok::<_, String>(7) })
            .await
            .unwrap();
        assert_eq!(*value, 7);
    }
}
