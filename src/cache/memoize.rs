//! Memoization Module
//!
//! Wraps async fetches with the shared API cache. A fresh entry short-cuts
//! the fetch; a failed fetch falls back to a stale entry still held by the
//! cache. There is no in-flight de-duplication: two callers racing on the
//! same cold key both run the fetch.

use std::fmt::Display;
use std::future::Future;
use std::marker::PhantomData;
use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::{debug, warn};

use crate::cache::{ApiCache, Lookup};

/// API cache shared between services and the cleanup task.
pub type SharedCache<T> = Arc<RwLock<ApiCache<T>>>;

/// Wraps a cache for sharing.
pub fn shared<T>(cache: ApiCache<T>) -> SharedCache<T> {
    Arc::new(RwLock::new(cache))
}

/// Returns the fresh value under `key`, or runs `fetch` and caches its
/// result.
///
/// When `fetch` fails and a stale entry for `key` has not been reclaimed yet,
/// the stale value is returned instead of the error.
pub async fn fetch_with_cache<T, E, F, Fut>(
    cache: &SharedCache<T>,
    key: &str,
    ttl: Option<u64>,
    fetch: F,
) -> Result<T, E>
where
    T: Clone,
    E: Display,
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<T, E>>,
{
    // Lock is released before the fetch is awaited
    let lookup = cache.write().await.peek(key);

    let stale = match lookup {
        Lookup::Fresh(data) => {
            debug!(key, "api cache hit");
            return Ok(data);
        }
        Lookup::Stale(data) => Some(data),
        Lookup::Missing => None,
    };

    match fetch().await {
        Ok(data) => {
            cache.write().await.set(key, data.clone(), ttl);
            Ok(data)
        }
        Err(err) => match stale {
            Some(data) => {
                warn!(key, error = %err, "fetch failed, serving stale cache entry");
                Ok(data)
            }
            None => Err(err),
        },
    }
}

// == Memoized ==
/// A fetch function bound to a cache, a key generator and a TTL.
///
/// Built by [`with_cache`]; call it with the fetch arguments.
pub struct Memoized<T, A, F, K> {
    cache: SharedCache<T>,
    fetch: F,
    key_for: K,
    ttl: Option<u64>,
    _args: PhantomData<fn(A)>,
}

/// Binds `fetch` to `cache`. Each call derives its key from the arguments
/// with `key_for` and caches results for `ttl` milliseconds (the cache
/// default when `None`).
pub fn with_cache<T, A, F, K>(
    cache: SharedCache<T>,
    fetch: F,
    key_for: K,
    ttl: Option<u64>,
) -> Memoized<T, A, F, K>
where
    K: Fn(&A) -> String,
{
    Memoized {
        cache,
        fetch,
        key_for,
        ttl,
        _args: PhantomData,
    }
}

impl<T, A, F, K> Memoized<T, A, F, K>
where
    T: Clone,
    K: Fn(&A) -> String,
{
    pub async fn call<Fut, E>(&self, args: A) -> Result<T, E>
    where
        F: Fn(A) -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: Display,
    {
        let key = (self.key_for)(&args);
        fetch_with_cache(&self.cache, &key, self.ttl, || (self.fetch)(args)).await
    }

    /// The cache the wrapper reads and writes.
    pub fn cache(&self) -> &SharedCache<T> {
        &self.cache
    }
}
