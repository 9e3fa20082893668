//! Route invalidation bus.
//!
//! Keeps one generation counter per route. Invalidating a route bumps its
//! counter before anything else happens, so a cache entry or ticket stamped
//! with an older generation is stale from that moment on. Every invalidation
//! is also broadcast to subscribers, which lets other processes or caches
//! follow along.

use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;
use tokio::sync::broadcast;
use tracing::{debug, trace};

use crate::domain::ports::{RouteInvalidator, RoutePath};

/// Capacity of the broadcast channel. Slow subscribers lag rather than
/// block invalidation.
const EVENT_CAPACITY: usize = 64;

/// Generation counters plus a broadcast of invalidated routes.
#[derive(Debug)]
pub struct RouteInvalidationBus {
    generations: Mutex<HashMap<RoutePath, u64>>,
    events: broadcast::Sender<RoutePath>,
}

impl Default for RouteInvalidationBus {
    fn default() -> Self {
        Self::new()
    }
}

impl RouteInvalidationBus {
    pub fn new() -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            generations: Mutex::new(HashMap::new()),
            events,
        }
    }

    /// Current generation of `route`. Routes never invalidated are at zero.
    pub fn generation(&self, route: &RoutePath) -> u64 {
        let generations = self
            .generations
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        generations.get(route).copied().unwrap_or(0)
    }

    /// Receive every route invalidated after this call.
    pub fn subscribe(&self) -> broadcast::Receiver<RoutePath> {
        self.events.subscribe()
    }

    fn bump(&self, route: &RoutePath) -> u64 {
        let mut generations = self
            .generations
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        let generation = generations.entry(route.clone()).or_insert(0);
        *generation = generation.wrapping_add(1);
        *generation
    }
}

#[async_trait]
impl RouteInvalidator for RouteInvalidationBus {
    async fn invalidate(&self, route: &RoutePath) {
        let generation = self.bump(route);
        debug!(route = %route, generation, "route invalidated");
        if self.events.send(route.clone()).is_err() {
            trace!(route = %route, "no invalidation subscribers");
        }
    }
}
