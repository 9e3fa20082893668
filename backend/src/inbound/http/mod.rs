//! HTTP inbound adapter exposing the dashboard REST endpoints.

pub mod auth;
pub mod customers;
pub mod dashboard;
pub mod error;
pub mod health;
pub mod invoices;
pub mod session;
pub mod session_config;
pub mod state;
#[cfg(test)]
pub mod test_utils;

pub use error::ApiResult;
