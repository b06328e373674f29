// Time-boxed memoization of idempotent read requests. The cache is an
// explicitly constructed object shared behind an `Arc`; nothing in the
// workspace holds a module-level instance, so tests stay hermetic.
use crate::counter;
use crate::metrics_defs::{MetricDef, MetricType};
use moka::Expiry;
use moka::sync::Cache;
use serde_json::Value;
use std::sync::Arc;
use std::time::{Duration, Instant};

pub const CACHE_HIT: MetricDef = MetricDef {
    name: "response_cache.hit",
    metric_type: MetricType::Counter,
    description: "Number of reads served from the response cache",
};

pub const CACHE_MISS: MetricDef = MetricDef {
    name: "response_cache.miss",
    metric_type: MetricType::Counter,
    description: "Number of reads that missed the response cache",
};

pub const ALL_METRICS: &[MetricDef] = &[CACHE_HIT, CACHE_MISS];

const SIZE: u64 = 10_000;

/// TTL classes per request kind.
pub const DOMAINS_TTL: Duration = Duration::from_secs(2 * 60);
pub const CAMPAIGNS_TTL: Duration = Duration::from_secs(5 * 60);
pub const CAMPAIGN_DETAILS_TTL: Duration = Duration::from_secs(10 * 60);
pub const DEFAULT_TTL: Duration = Duration::from_secs(5 * 60);

/// Interval of the periodic sweep that evicts expired entries even when
/// nothing reads them.
pub const SWEEP_INTERVAL: Duration = Duration::from_secs(5 * 60);

/// Cache keys are `method:url:body`; mutation requests are never cached, so
/// in practice the body component is empty.
pub fn cache_key(method: &str, url: &str, body: &str) -> String {
    format!("{method}:{url}:{body}")
}

#[derive(Clone)]
struct Entry {
    data: Arc<Value>,
    ttl: Duration,
}

// Per-entry TTL: the entry carries its own lifetime and the expiry policy
// reads it back, so one cache serves all TTL classes.
struct PerEntryTtl;

impl Expiry<String, Entry> for PerEntryTtl {
    fn expire_after_create(&self, _key: &String, entry: &Entry, _created_at: Instant) -> Option<Duration> {
        Some(entry.ttl)
    }
}

pub struct ResponseCache {
    cache: Cache<String, Entry>,
}

impl ResponseCache {
    pub fn new() -> Self {
        let cache = Cache::builder()
            .max_capacity(SIZE)
            .expire_after(PerEntryTtl)
            .support_invalidation_closures()
            .build();

        ResponseCache { cache }
    }

    /// Expired entries self-evict on read; a miss and an expired entry are
    /// indistinguishable to the caller.
    pub fn get(&self, key: &str) -> Option<Arc<Value>> {
        let entry = self.cache.get(key);
        let metric_def = if entry.is_some() { CACHE_HIT } else { CACHE_MISS };
        counter!(metric_def).increment(1);
        entry.map(|e| e.data)
    }

    /// Upsert, idempotent. Returns the shared handle to the stored value.
    pub fn set(&self, key: &str, data: Value, ttl: Duration) -> Arc<Value> {
        let data = Arc::new(data);
        self.cache.insert(
            key.to_string(),
            Entry {
                data: Arc::clone(&data),
                ttl,
            },
        );
        data
    }

    pub fn delete(&self, key: &str) {
        self.cache.invalidate(key);
    }

    pub fn clear(&self) {
        self.cache.invalidate_all();
    }

    /// Drop cached internal-API reads, leaving provider campaign data
    /// intact. Every domain or route mutation must call this before the next
    /// read to keep read-your-writes within the session.
    pub fn invalidate_domains(&self) {
        self.invalidate_matching(|key| key.contains("/api/v1") && !key.contains("campaigns"));
    }

    /// Drop cached campaign list/details responses.
    pub fn invalidate_campaigns(&self) {
        self.invalidate_matching(|key| key.contains("campaigns"));
    }

    fn invalidate_matching(&self, predicate: impl Fn(&str) -> bool + Send + Sync + 'static) {
        if let Err(err) = self.cache.invalidate_entries_if(move |key, _| predicate(key)) {
            tracing::warn!(error = %err, "cache invalidation predicate rejected");
        }
    }

    /// Run moka's pending housekeeping now. Lookups already self-evict on
    /// read; this handles entries nothing reads again.
    pub fn sweep(&self) {
        self.cache.run_pending_tasks();
    }

    pub fn entry_count(&self) -> u64 {
        self.cache.entry_count()
    }

    /// Periodic sweep companion to the lazy on-read eviction.
    pub fn spawn_sweeper(self: Arc<Self>, interval: Duration) -> tokio::task::JoinHandle<()> {
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            // The first tick completes immediately; skip it so the sweep
            // cadence starts one full interval out.
            ticker.tick().await;
            loop {
                ticker.tick().await;
                self.sweep();
            }
        })
    }
}

impl Default for ResponseCache {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn set_then_get_returns_value() {
        let cache = ResponseCache::new();
        cache.set("GET:http://api/api/v1:", json!({"domains": []}), DEFAULT_TTL);

        let hit = cache.get("GET:http://api/api/v1:").expect("cached entry");
        assert_eq!(*hit, json!({"domains": []}));
    }

    #[test]
    fn expired_entry_returns_none() {
        let cache = ResponseCache::new();
        cache.set("k", json!(1), Duration::from_millis(100));

        std::thread::sleep(Duration::from_millis(150));
        assert!(cache.get("k").is_none());
    }

    #[test]
    fn delete_and_clear() {
        let cache = ResponseCache::new();
        cache.set("a", json!(1), DEFAULT_TTL);
        cache.set("b", json!(2), DEFAULT_TTL);

        cache.delete("a");
        assert!(cache.get("a").is_none());
        assert!(cache.get("b").is_some());

        cache.clear();
        assert!(cache.get("b").is_none());
    }

    #[test]
    fn domain_invalidation_spares_campaign_keys() {
        let cache = ResponseCache::new();
        let domains_key = cache_key("GET", "http://138.68.231.226:3000/api/v1", "");
        let campaigns_key = cache_key(
            "GET",
            "https://api.ringba.com/v2/RAtest/campaigns/ui?includestats=true",
            "",
        );
        cache.set(&domains_key, json!([]), DOMAINS_TTL);
        cache.set(&campaigns_key, json!({"campaigns": []}), CAMPAIGNS_TTL);

        cache.invalidate_domains();
        cache.sweep();

        assert!(cache.get(&domains_key).is_none());
        assert!(cache.get(&campaigns_key).is_some());
    }

    #[test]
    fn campaign_invalidation_spares_domain_keys() {
        let cache = ResponseCache::new();
        let domains_key = cache_key("GET", "http://138.68.231.226:3000/api/v1", "");
        let details_key = cache_key("GET", "https://api.ringba.com/v2/RAtest/campaigns/CA123", "");
        cache.set(&domains_key, json!([]), DOMAINS_TTL);
        cache.set(&details_key, json!({"jsTags": {}}), CAMPAIGN_DETAILS_TTL);

        cache.invalidate_campaigns();
        cache.sweep();

        assert!(cache.get(&details_key).is_none());
        assert!(cache.get(&domains_key).is_some());
    }

    #[test]
    fn sweep_evicts_expired_entries() {
        let cache = ResponseCache::new();
        cache.set("short", json!(1), Duration::from_millis(10));

        std::thread::sleep(Duration::from_millis(60));
        cache.sweep();
        assert_eq!(cache.entry_count(), 0);
    }

    #[test]
    fn key_includes_method_url_and_body() {
        assert_eq!(cache_key("GET", "http://x/api/v1", ""), "GET:http://x/api/v1:");
        assert_ne!(
            cache_key("GET", "http://x/api/v1", ""),
            cache_key("POST", "http://x/api/v1", "")
        );
    }
}
