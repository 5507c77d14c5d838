//! In-memory time-to-live memoization for provider calls

use moka::future::Cache;
use std::time::Duration;

/// Upper bound on entries held by one provider cache
pub const MAX_ENTRIES: u64 = 10_000;

/// Provider results keyed by query or rounded coordinates
pub type ProviderCache<T> = Cache<String, T>;

/// Builds a provider cache whose entries are evicted once `ttl` has elapsed.
#[must_use]
pub fn provider_cache<T>(name: &'static str, ttl: Duration) -> ProviderCache<T>
where
    T: Clone + Send + Sync + 'static,
{
    tracing::debug!("Initializing {} cache with {}s TTL", name, ttl.as_secs());
    Cache::builder()
        .name(name)
        .max_capacity(MAX_ENTRIES)
        .time_to_live(ttl)
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_insert_then_get_returns_value() {
        let cache = provider_cache("weather", Duration::from_secs(60));
        cache.insert("weather:15.80:73.70".to_string(), 28.5_f32).await;
        assert_eq!(cache.get("weather:15.80:73.70").await, Some(28.5));
        assert_eq!(cache.get("weather:0.00:0.00").await, None);
    }

    #[tokio::test]
    async fn test_expired_entries_are_evicted() {
        let cache = provider_cache("geocoding", Duration::from_millis(50));
        for i in 0..1000 {
            cache.insert(format!("query-{i}"), i).await;
        }
        cache.run_pending_tasks().await;
        assert_eq!(cache.entry_count(), 1000);

        tokio::time::sleep(Duration::from_millis(150)).await;
        assert_eq!(cache.get("query-0").await, None);

        cache.insert("fresh".to_string(), 1).await;
        cache.run_pending_tasks().await;
        assert_eq!(cache.entry_count(), 1);
        assert_eq!(cache.get("fresh").await, Some(1));
    }

    #[tokio::test]
    async fn test_invalidate() {
        let cache = provider_cache("tides", Duration::from_secs(60));
        cache.insert("k".to_string(), 1_u8).await;
        cache.invalidate("k").await;
        assert_eq!(cache.get("k").await, None);
    }
}
