//! Process-local route cache.
//!
//! Entries remember the route generation they were computed under. Entries
//! whose route has since been invalidated are evicted on the next access, a
//! lookup only hits a current entry, and a store is refused when the ticket's
//! generation has been overtaken by an invalidation.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use async_trait::async_trait;
use tracing::trace;

use crate::domain::ports::{CacheLookup, CacheTicket, RouteCache, RouteCacheKey};

use super::RouteInvalidationBus;

#[derive(Debug, Clone)]
struct Entry<V> {
    generation: u64,
    view: V,
}

/// Route cache holding views in memory, invalidated through a shared bus.
#[derive(Debug)]
pub struct InMemoryRouteCache<V> {
    bus: Arc<RouteInvalidationBus>,
    entries: Mutex<HashMap<RouteCacheKey, Entry<V>>>,
}

impl<V> InMemoryRouteCache<V> {
    /// Create an empty cache following the generations of `bus`.
    pub fn new(bus: Arc<RouteInvalidationBus>) -> Self {
        Self {
            bus,
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Number of live entries. Entries of invalidated routes are evicted first.
    pub fn len(&self) -> usize {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        self.evict_stale(&mut entries);
        entries.len()
    }

    /// Whether the cache holds no entries.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn evict_stale(&self, entries: &mut HashMap<RouteCacheKey, Entry<V>>) {
        let before = entries.len();
        entries.retain(|key, entry| entry.generation == self.bus.generation(key.route_path()));
        let evicted = before - entries.len();
        if evicted > 0 {
            trace!(evicted, "evicted route cache entries from invalidated routes");
        }
    }
}

#[async_trait]
impl<V> RouteCache<V> for InMemoryRouteCache<V>
where
    V: Clone + Send + Sync + 'static,
{
    async fn lookup(&self, key: &RouteCacheKey) -> CacheLookup<V> {
        let current = self.bus.generation(key.route_path());
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        self.evict_stale(&mut entries);
        match entries.get(key) {
            Some(entry) if entry.generation == current => {
                trace!(key = %key, "route cache hit");
                CacheLookup::Hit(entry.view.clone())
            }
            _ => CacheLookup::Miss(CacheTicket::new(key.clone(), current)),
        }
    }

    async fn store(&self, ticket: CacheTicket, view: V) -> bool {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        self.evict_stale(&mut entries);
        // Generation check and insert both happen under the entries lock.
        if self.bus.generation(ticket.key().route_path()) != ticket.generation() {
            trace!(key = %ticket.key(), "discarding view computed before invalidation");
            return false;
        }
        entries.insert(
            ticket.key().clone(),
            Entry {
                generation: ticket.generation(),
                view,
            },
        );
        true
    }
}
