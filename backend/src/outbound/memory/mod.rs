//! In-memory adapters for database-less runs and integration tests.
//!
//! [`InMemoryDashboardStore`] implements the invoice, customer and overview
//! repository ports over a single lock-protected dataset, mirroring the
//! behaviour of the SQL adapters: unknown customers are rejected, updates and
//! deletes of absent invoices report `Missing`, and text search matches
//! name, email, amount, date and status case-insensitively.

mod seed;
mod store;

pub use store::InMemoryDashboardStore;
