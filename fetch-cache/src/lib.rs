pub mod cache;
mod error;
mod options;
mod response;
mod transport;


use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use lazy_static::lazy_static;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;

pub use cache::{CacheConfig, CacheKey, CacheStats, Clock, RequestCache, SystemClock};
pub use error::{ErrorKind, FetchError};
pub use options::{CredentialsMode, FetchOptions, Method};
pub use response::FetchResponse;
pub use surf::StatusCode;
pub use transport::{SurfTransport, Transport};

/// Shared handle for callers that pass one client around.
pub type SharedFetchClient = Arc<FetchClient>;

/// Front door of the fetch layer: a transport plus the deduplicating
/// request cache.
///
/// Cloning is cheap and every clone shares the same cache, so one client
/// per process is the expected shape (see [`global`]).
#[derive(Clone)]
pub struct FetchClient {
    transport: Arc<dyn Transport>,
    cache: Arc<RequestCache>,
}

impl Default for FetchClient {
    fn default() -> Self {
        Self::new()
    }
}

impl FetchClient {
    /// Client with the surf transport and the stock cache windows.
    pub fn new() -> Self {
        Self::with_config(CacheConfig::default())
    }

    pub fn with_config(config: CacheConfig) -> Self {
        Self::from_parts(Arc::new(SurfTransport::new()), RequestCache::new(config))
    }

    /// Assembles a client from an explicit transport and cache.
    pub fn from_parts(transport: Arc<dyn Transport>, cache: RequestCache) -> Self {
        Self {
            transport,
            cache: Arc::new(cache),
        }
    }

    /// Deduplicated, cached fetch.
    ///
    /// Identical calls inside the sliding TTL window share one underlying
    /// request and one outcome. A failed outcome is delivered to every
    /// caller that attached to it and is never cached.
    pub async fn fetch(
        &self,
        target: &str,
        options: &FetchOptions,
    ) -> Result<FetchResponse, FetchError> {
        self.cache.fetch(&self.transport, target, options).await
    }

    /// Fetch with empty options.
    pub async fn get(&self, target: &str) -> Result<FetchResponse, FetchError> {
        self.fetch(target, &FetchOptions::new()).await
    }

    pub fn cache(&self) -> &RequestCache {
        &self.cache
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }

    pub fn clear_cache(&self) {
        self.cache.clear();
    }

    pub fn evict_expired_cache(&self) -> usize {
        self.cache.evict_expired()
    }

    /// Spawns the background sweep for this client's cache.
    pub fn start_sweeper(&self) -> JoinHandle<()> {
        self.cache.start_sweeper()
    }
}

lazy_static! {
    static ref GLOBAL: FetchClient = FetchClient::new();
}

static GLOBAL_SWEEPER_STARTED: AtomicBool = AtomicBool::new(false);

/// Process-wide client, built on first use.
///
/// The sweep task starts on the first call made from inside a Tokio
/// runtime. Until then read-time expiry alone keeps results correct; the
/// sweep only reclaims memory.
pub fn global() -> &'static FetchClient {
    let client: &FetchClient = &GLOBAL;
    if Handle::try_current().is_ok()
        && GLOBAL_SWEEPER_STARTED
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_ok()
    {
        let _ = client.start_sweeper();
    }
    client
}
