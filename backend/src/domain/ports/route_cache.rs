//! Ports for caching rendered route views and invalidating them.
//!
//! Reads go through [`RouteCache`]: a lookup either hits or hands back a
//! [`CacheTicket`] stamped with the route's current generation. Writes go
//! through [`RouteInvalidator`], which bumps the generation. A ticket issued
//! before an invalidation can no longer store, so a read that raced a write
//! never re-materialises stale data.
use async_trait::async_trait;

use super::{RouteCacheKey, RoutePath};

/// Permission to store a freshly computed view for a key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheTicket {
    key: RouteCacheKey,
    generation: u64,
}

impl CacheTicket {
    /// Issue a ticket for `key` at `generation`.
    pub fn new(key: RouteCacheKey, generation: u64) -> Self {
        Self { key, generation }
    }

    /// Key the ticket was issued for.
    pub fn key(&self) -> &RouteCacheKey {
        &self.key
    }

    /// Route generation observed at lookup time.
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

/// Result of a cache lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CacheLookup<V> {
    Hit(V),
    Miss(CacheTicket),
}

/// Cache of materialised route views.
///
/// Implementations must treat failures as misses: the cache is an
/// optimisation and never the source of truth.
#[async_trait]
pub trait RouteCache<V>: Send + Sync
where
    V: Clone + Send + Sync + 'static,
{
    /// Look up the view cached for `key`.
    async fn lookup(&self, key: &RouteCacheKey) -> CacheLookup<V>;

    /// Store a view computed after a miss. Returns `false` when the route was
    /// invalidated since the ticket was issued and the view was discarded.
    async fn store(&self, ticket: CacheTicket, view: V) -> bool;
}

/// Publisher of route invalidation events.
///
/// Fire-and-forget: invalidation cannot fail the caller. Adapters log their
/// own faults. Invalidating the same route twice is harmless.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RouteInvalidator: Send + Sync {
    /// Mark every cached variant of `route` as stale.
    async fn invalidate(&self, route: &RoutePath);
}

/// Cache that never holds anything. Every lookup misses and stores are
/// discarded.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopRouteCache;

#[async_trait]
impl<V> RouteCache<V> for NoopRouteCache
where
    V: Clone + Send + Sync + 'static,
{
    async fn lookup(&self, key: &RouteCacheKey) -> CacheLookup<V> {
        CacheLookup::Miss(CacheTicket::new(key.clone(), 0))
    }

    async fn store(&self, _ticket: CacheTicket, _view: V) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn noop_cache_always_misses() {
        let cache = NoopRouteCache;
        let key = RouteCacheKey::route(RoutePath::invoices());

        let lookup: CacheLookup<u8> = cache.lookup(&key).await;
        let CacheLookup::Miss(ticket) = lookup else {
            panic!("noop cache must miss");
        };
        assert_eq!(ticket.key(), &key);
        assert!(!cache.store(ticket, 1_u8).await);
        assert!(matches!(cache.lookup(&key).await, CacheLookup::<u8>::Miss(_)));
    }
}
