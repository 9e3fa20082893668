//! Port for the aggregates behind the dashboard overview.

use async_trait::async_trait;

use crate::domain::{CardData, LatestInvoice, MonthlyRevenue};

use super::define_port_error;

/// Number of rows in the "latest invoices" region.
pub const LATEST_INVOICES_LIMIT: i64 = 5;

define_port_error! {
    /// Errors raised by overview repository adapters.
    pub enum OverviewRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "overview repository connection failed: {message}",
        /// Query failed during execution.
        Query { message: String } =>
            "overview repository query failed: {message}",
    }
}

/// Port serving one query per overview region.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait OverviewRepository: Send + Sync {
    /// Customer and invoice counts plus paid and pending totals.
    async fn card_data(&self) -> Result<CardData, OverviewRepositoryError>;

    /// Monthly revenue in calendar order.
    async fn revenue(&self) -> Result<Vec<MonthlyRevenue>, OverviewRepositoryError>;

    /// The most recent invoices, newest first, at most
    /// [`LATEST_INVOICES_LIMIT`] rows.
    async fn latest_invoices(&self) -> Result<Vec<LatestInvoice>, OverviewRepositoryError>;
}
