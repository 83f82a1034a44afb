use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration as StdDuration;

use chrono::{DateTime, Duration, Utc};
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use futures::future::{BoxFuture, FutureExt, Shared};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use sha2::{Digest, Sha256};
use tokio::task::JoinHandle;

use crate::error::FetchError;
use crate::options::FetchOptions;
use crate::response::FetchResponse;
use crate::transport::Transport;

#[cfg(feature = "graphql")]
use async_graphql::SimpleObject;

/// Time source for entry expiry, injectable for deterministic tests.
pub trait Clock: Send + Sync + 'static {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall-clock time.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Configuration for the request cache.
#[derive(Clone, Debug)]
pub struct CacheConfig {
    /// Sliding lifetime of a cached outcome; every hit pushes the window
    /// forward by this much.
    pub ttl: Duration,
    /// Period of the background sweep that reclaims expired entries.
    pub sweep_interval: Duration,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl: Duration::milliseconds(5000),
            sweep_interval: Duration::minutes(10),
        }
    }
}

impl CacheConfig {
    pub fn new(ttl: Duration, sweep_interval: Duration) -> Self {
        Self {
            ttl,
            sweep_interval,
        }
    }
}

/// Canonical identity of one request.
///
/// SHA-256 over a deterministic serialization of the target plus the
/// top-level options, options ordered by descending name. Total for any
/// input; equal keys mean "same request" for deduplication purposes.
#[derive(Hash, Eq, PartialEq, Clone, Debug)]
pub struct CacheKey(String);

impl CacheKey {
    pub fn from_request(target: &str, options: &FetchOptions) -> Self {
        let canonical = Self::canonical_string(target, options);
        let mut hasher = Sha256::new();
        hasher.update(canonical.as_bytes());
        CacheKey(hex::encode(hasher.finalize()))
    }

    /// The exact serialization fed to the digest.
    pub fn canonical_string(target: &str, options: &FetchOptions) -> String {
        let mut parts = vec![Value::String(target.to_string())];
        for (name, value) in options.canonical_entries() {
            parts.push(json!([name, value]));
        }
        Value::Array(parts).to_string()
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Shared outcome of one issued request. Clone-able and awaitable by any
/// number of callers.
pub(crate) type SharedOutcome = Shared<BoxFuture<'static, Result<FetchResponse, FetchError>>>;

/// One slot per key: the shared outcome plus its sliding expiry.
struct CacheEntry {
    outcome: SharedOutcome,
    expires_at: DateTime<Utc>,
    /// Issue number of the request that created this entry. Settlement
    /// eviction checks it so a stale request never removes a newer entry
    /// under the same key.
    seq: u64,
}

/// Entry counts for monitoring.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "graphql", derive(SimpleObject))]
pub struct CacheStats {
    pub total_entries: usize,
    pub live_entries: usize,
    pub expired_entries: usize,
    pub pending_entries: usize,
}

/// Deduplicating short-TTL cache over an injectable transport.
///
/// At most one live entry exists per canonical key. Concurrent identical
/// calls attach to the same in-flight outcome, repeated calls within the
/// TTL window reuse the settled outcome without touching the transport,
/// and outcomes that settle as failures are dropped immediately so the
/// next call retries.
pub struct RequestCache {
    entries: Arc<DashMap<CacheKey, CacheEntry>>,
    clock: Arc<dyn Clock>,
    config: CacheConfig,
    next_seq: AtomicU64,
}

impl RequestCache {
    pub fn new(config: CacheConfig) -> Self {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    pub fn with_clock(config: CacheConfig, clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: Arc::new(DashMap::new()),
            clock,
            config,
            next_seq: AtomicU64::new(0),
        }
    }

    pub fn config(&self) -> &CacheConfig {
        &self.config
    }

    /// Resolves `target`+`options` through the cache, issuing the
    /// underlying request only when no live entry exists.
    pub async fn fetch(
        &self,
        transport: &Arc<dyn Transport>,
        target: &str,
        options: &FetchOptions,
    ) -> Result<FetchResponse, FetchError> {
        let key = CacheKey::from_request(target, options);
        let (outcome, issued) = self.attach(transport, key, target, options);
        if issued {
            // Detached driver: the request settles even if every caller
            // stops polling.
            let _ = tokio::spawn(outcome.clone());
        }
        outcome.await
    }

    /// Returns the outcome to await plus whether this call issued it.
    ///
    /// The map entry is inserted before the driver task can run, so a
    /// settlement can never observe the map without its own entry.
    fn attach(
        &self,
        transport: &Arc<dyn Transport>,
        key: CacheKey,
        target: &str,
        options: &FetchOptions,
    ) -> (SharedOutcome, bool) {
        let now = self.clock.now();
        let expires_at = now + self.config.ttl;

        match self.entries.entry(key) {
            Entry::Occupied(mut occupied) if occupied.get().expires_at >= now => {
                occupied.get_mut().expires_at = expires_at;
                log::debug!("cache hit for {}", occupied.key());
                (occupied.get().outcome.clone(), false)
            }
            entry => {
                let seq = self.next_seq.fetch_add(1, Ordering::Relaxed);
                let outcome = self.issue(transport, entry.key().clone(), target, options, seq);
                let cache_entry = CacheEntry {
                    outcome: outcome.clone(),
                    expires_at,
                    seq,
                };
                match entry {
                    Entry::Occupied(mut occupied) => {
                        log::debug!("cache entry expired for {}, reissuing", occupied.key());
                        occupied.insert(cache_entry);
                    }
                    Entry::Vacant(vacant) => {
                        log::debug!("cache miss for {}", vacant.key());
                        vacant.insert(cache_entry);
                    }
                }
                (outcome, true)
            }
        }
    }

    /// Builds the shared future that performs the request and, on a failed
    /// settlement, evicts its own entry.
    fn issue(
        &self,
        transport: &Arc<dyn Transport>,
        key: CacheKey,
        target: &str,
        options: &FetchOptions,
        seq: u64,
    ) -> SharedOutcome {
        let transport = Arc::clone(transport);
        let entries = Arc::clone(&self.entries);
        let target = target.to_string();
        let options = options.clone();

        async move {
            let result = transport.send(&target, &options).await;
            let settled_ok = matches!(&result, Ok(response) if response.ok());
            if !settled_ok {
                entries.remove_if(&key, |_, entry| entry.seq == seq);
                log::debug!("dropped failed outcome for {}", key);
            }
            result
        }
        .boxed()
        .shared()
    }

    /// One sweep pass over the whole map.
    ///
    /// Expiry is already enforced at read time; sweeping only reclaims
    /// memory held by entries nobody re-requests. Returns the number of
    /// entries removed.
    pub fn evict_expired(&self) -> usize {
        sweep(&self.entries, self.clock.now())
    }

    /// Drops every entry.
    pub fn clear(&self) {
        self.entries.clear();
        log::info!("request cache cleared");
    }

    /// Snapshot of entry counts.
    pub fn stats(&self) -> CacheStats {
        let now = self.clock.now();
        let mut stats = CacheStats::default();
        for entry in self.entries.iter() {
            stats.total_entries += 1;
            if entry.value().outcome.peek().is_none() {
                stats.pending_entries += 1;
            }
            if entry.value().expires_at < now {
                stats.expired_entries += 1;
            } else {
                stats.live_entries += 1;
            }
        }
        stats
    }

    /// Spawns the recurring sweep task. Dropping the returned handle
    /// detaches the task; aborting it stops sweeping.
    pub fn start_sweeper(&self) -> JoinHandle<()> {
        let entries = Arc::clone(&self.entries);
        let clock = Arc::clone(&self.clock);
        let period = self
            .config
            .sweep_interval
            .to_std()
            .unwrap_or_else(|_| StdDuration::from_secs(600));

        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            // The first tick of an interval completes immediately.
            ticker.tick().await;
            loop {
                ticker.tick().await;
                let removed = sweep(&entries, clock.now());
                if removed > 0 {
                    log::debug!("sweeper reclaimed {} expired cache entries", removed);
                }
            }
        })
    }
}

fn sweep(entries: &DashMap<CacheKey, CacheEntry>, now: DateTime<Utc>) -> usize {
    let expired: Vec<CacheKey> = entries
        .iter()
        .filter(|entry| entry.value().expires_at < now)
        .map(|entry| entry.key().clone())
        .collect();

    let mut removed = 0;
    for key in expired {
        // Re-check under the removal lock; a hit may have refreshed the
        // entry since the scan.
        if entries
            .remove_if(&key, |_, entry| entry.expires_at < now)
            .is_some()
        {
            removed += 1;
        }
    }
    removed
}
