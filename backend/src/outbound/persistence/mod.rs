//! PostgreSQL persistence adapters using Diesel ORM.
//!
//! This module provides concrete implementations of domain repository ports
//! backed by PostgreSQL via the Diesel ORM with async support through
//! `diesel-async` and `bb8` connection pooling.
//!
//! # Architecture
//!
//! - **Thin adapters**: Repository implementations only translate between
//!   Diesel models and domain types. No business logic resides here.
//! - **Internal models**: Diesel row structs (`models.rs`) and schema
//!   definitions (`schema.rs`) are internal implementation details, never
//!   exposed to the domain layer.
//! - **One statement per mutation**: inserts, updates and deletes of invoices
//!   are single parameterised statements; there is no multi-step write path.
//! - **Strongly typed errors**: All database errors are mapped to domain
//!   repository error types.
//!
//! # Example
//!
//! ```ignore
//! use dashboard::outbound::persistence::{DbPool, DieselInvoiceRepository, PoolConfig};
//!
//! let pool = DbPool::new(PoolConfig::new("postgres://localhost/dashboard")).await?;
//! let invoices = DieselInvoiceRepository::new(pool);
//! ```

mod diesel_account_repository;
mod diesel_basic_error_mapping;
mod diesel_customer_repository;
mod diesel_invoice_repository;
mod diesel_overview_repository;
mod migrations;
mod models;
mod pool;
mod schema;

pub use diesel_account_repository::DieselAccountRepository;
pub use diesel_customer_repository::DieselCustomerRepository;
pub use diesel_invoice_repository::DieselInvoiceRepository;
pub use diesel_overview_repository::DieselOverviewRepository;
pub use migrations::{MigrationError, run_pending_migrations};
pub use pool::{
    DEFAULT_CHECKOUT_TIMEOUT, DEFAULT_MAX_CONNECTIONS, DbPool, PoolConfig, PoolError,
};
