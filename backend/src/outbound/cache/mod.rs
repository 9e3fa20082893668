//! In-process route cache adapters.
//!
//! [`RouteInvalidationBus`] implements the `RouteInvalidator` port and owns
//! the per-route generation counters. [`InMemoryRouteCache`] implements the
//! `RouteCache` port on top of it. One bus is shared by every cache in the
//! process so a single invalidation reaches all of them.

mod in_memory_route_cache;
mod route_invalidation_bus;

pub use in_memory_route_cache::InMemoryRouteCache;
pub use route_invalidation_bus::RouteInvalidationBus;
