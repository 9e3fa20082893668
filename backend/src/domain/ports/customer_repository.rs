//! Port for customer reads.

use async_trait::async_trait;

use crate::domain::{CustomerOption, CustomerSummary};

use super::define_port_error;

define_port_error! {
    /// Errors raised by customer repository adapters.
    pub enum CustomerRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "customer repository connection failed: {message}",
        /// Query failed during execution.
        Query { message: String } =>
            "customer repository query failed: {message}",
    }
}

/// Port for reading customers and their invoice totals.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CustomerRepository: Send + Sync {
    /// Every customer as an `(id, name)` option, ordered by name.
    async fn list_options(&self) -> Result<Vec<CustomerOption>, CustomerRepositoryError>;

    /// Customers whose name or email contains `query` (case-insensitive),
    /// with invoice counts and totals, ordered by name.
    async fn list_filtered(
        &self,
        query: &str,
    ) -> Result<Vec<CustomerSummary>, CustomerRepositoryError>;
}
