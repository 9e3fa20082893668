//! Invoice dashboard backend.
//!
//! Hexagonal layout: `domain` holds entities, services and ports;
//! `inbound::http` adapts Actix requests onto driving ports; `outbound`
//! implements driven ports over PostgreSQL, an in-memory store and the route
//! cache.

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;

/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
pub use domain::TraceId;
pub use middleware::Trace;
