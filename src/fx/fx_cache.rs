//! In-memory rate cache with TTL using moka.
//!
//! First lookup tier of the resolver. A miss is never an error, only a signal
//! to fall through to the live feed; absence is distinguishable from a zero
//! rate because `get` returns `None` rather than an empty mapping.

use std::time::Duration;

use moka::future::Cache;

use crate::constants::{ALL_RATES_CACHE_KEY, BASE_RATES_CACHE_PREFIX};
use crate::fx::fx_model::{AllRates, RateMap};

/// Time-bounded cache for resolved exchange rates.
///
/// Holds two tiers with independent TTLs: per-base mappings (short TTL, keyed
/// `exchange_rates_<BASE>`) and the aggregate of every supported base (long
/// TTL, single `all_exchange_rates` entry).
pub struct RateCache {
    per_base: Cache<String, RateMap>,
    aggregate: Cache<String, AllRates>,
}

impl RateCache {
    pub fn new(base_ttl: Duration, aggregate_ttl: Duration) -> Self {
        Self {
            per_base: Cache::builder()
                .time_to_live(base_ttl)
                .max_capacity(64)
                .build(),
            aggregate: Cache::builder()
                .time_to_live(aggregate_ttl)
                .max_capacity(1)
                .build(),
        }
    }

    /// Cached rates for one base currency, if present and fresh.
    pub async fn rates_for_base(&self, base_currency: &str) -> Option<RateMap> {
        self.per_base.get(&Self::base_key(base_currency)).await
    }

    /// Stores the rates for one base currency.
    pub async fn set_rates_for_base(&self, base_currency: &str, rates: RateMap) {
        self.per_base
            .insert(Self::base_key(base_currency), rates)
            .await;
    }

    /// The cached aggregate mapping, if present and fresh.
    pub async fn all_rates(&self) -> Option<AllRates> {
        self.aggregate.get(ALL_RATES_CACHE_KEY).await
    }

    /// Stores the aggregate mapping for every supported base.
    pub async fn set_all_rates(&self, rates: AllRates) {
        self.aggregate
            .insert(ALL_RATES_CACHE_KEY.to_string(), rates)
            .await;
    }

    /// Drops every cached entry.
    pub async fn invalidate_all(&self) {
        self.per_base.invalidate_all();
        self.aggregate.invalidate_all();
    }

    fn base_key(base_currency: &str) -> String {
        format!("{}{}", BASE_RATES_CACHE_PREFIX, base_currency)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use std::collections::HashMap;

    fn usd_rates() -> RateMap {
        HashMap::from([
            ("EUR".to_string(), dec!(0.92)),
            ("NGN".to_string(), dec!(1530)),
        ])
    }

    #[tokio::test]
    async fn test_cache_set_get() {
        let cache = RateCache::new(Duration::from_secs(60), Duration::from_secs(3600));

        cache.set_rates_for_base("USD", usd_rates()).await;

        let hit = cache.rates_for_base("USD").await.unwrap();
        assert_eq!(hit.get("EUR"), Some(&dec!(0.92)));
    }

    #[tokio::test]
    async fn test_cache_miss_is_none() {
        let cache = RateCache::new(Duration::from_secs(60), Duration::from_secs(3600));
        assert!(cache.rates_for_base("USD").await.is_none());
        assert!(cache.all_rates().await.is_none());
    }

    #[tokio::test]
    async fn test_zero_rate_is_not_a_miss() {
        let cache = RateCache::new(Duration::from_secs(60), Duration::from_secs(3600));

        let rates = HashMap::from([("EUR".to_string(), dec!(0))]);
        cache.set_rates_for_base("USD", rates).await;

        let hit = cache.rates_for_base("USD").await;
        assert!(hit.is_some());
        assert_eq!(hit.unwrap().get("EUR"), Some(&dec!(0)));
    }

    #[tokio::test]
    async fn test_bases_are_independent() {
        let cache = RateCache::new(Duration::from_secs(60), Duration::from_secs(3600));

        cache.set_rates_for_base("USD", usd_rates()).await;
        assert!(cache.rates_for_base("EUR").await.is_none());
    }

    #[tokio::test]
    async fn test_invalidate_all() {
        let cache = RateCache::new(Duration::from_secs(60), Duration::from_secs(3600));

        cache.set_rates_for_base("USD", usd_rates()).await;
        cache
            .set_all_rates(HashMap::from([("USD".to_string(), usd_rates())]))
            .await;
        cache.invalidate_all().await;

        // moka invalidation is applied lazily; reads observe it immediately.
        assert!(cache.rates_for_base("USD").await.is_none());
        assert!(cache.all_rates().await.is_none());
    }
}
