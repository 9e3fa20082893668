//! Port for invoice persistence.
//!
//! Every mutation maps to exactly one parameterised statement in SQL-backed
//! adapters. Callers treat all error variants as "the operation failed"; the
//! variants exist for logs and for choosing an error code on reads.

use async_trait::async_trait;

use crate::domain::{Invoice, InvoiceChanges, InvoiceId, InvoiceListing, NewInvoice};

use super::define_port_error;

/// Number of invoices on one listing page.
pub const INVOICES_PER_PAGE: u32 = 6;

define_port_error! {
    /// Errors raised by invoice repository adapters.
    pub enum InvoiceRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "invoice repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "invoice repository query failed: {message}",
        /// No row matched the identifier of an update or delete.
        Missing { id: String } =>
            "invoice {id} not found",
    }
}

/// Search and paging parameters for the listing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InvoiceFilter {
    /// Case-insensitive text matched against customer name, email, amount,
    /// date and status. Blank matches everything.
    pub query: String,
    /// One-based page number.
    pub page: u32,
}

impl InvoiceFilter {
    /// Build a filter, clamping the page to at least one.
    pub fn new(query: impl Into<String>, page: u32) -> Self {
        Self {
            query: query.into().trim().to_owned(),
            page: page.max(1),
        }
    }

    /// Row offset of the first invoice on the page.
    pub fn offset(&self) -> i64 {
        i64::from(self.page.max(1) - 1) * i64::from(INVOICES_PER_PAGE)
    }
}

/// Number of pages needed for `total` rows. An empty listing still has one
/// page, so page 1 is always valid.
pub fn page_count(total: i64) -> u32 {
    let per_page = i64::from(INVOICES_PER_PAGE);
    let pages = (total.max(0) + per_page - 1) / per_page;
    u32::try_from(pages).unwrap_or(u32::MAX).max(1)
}

/// Port for invoice storage and retrieval.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait InvoiceRepository: Send + Sync {
    /// Insert a new invoice; the store assigns its identifier.
    async fn insert(&self, invoice: &NewInvoice) -> Result<(), InvoiceRepositoryError>;

    /// Overwrite customer, amount and status of an existing invoice.
    ///
    /// Returns [`InvoiceRepositoryError::Missing`] when no row matches `id`.
    async fn update(
        &self,
        id: &InvoiceId,
        changes: &InvoiceChanges,
    ) -> Result<(), InvoiceRepositoryError>;

    /// Delete an invoice.
    ///
    /// Returns [`InvoiceRepositoryError::Missing`] when no row matches `id`.
    async fn remove(&self, id: &InvoiceId) -> Result<(), InvoiceRepositoryError>;

    /// Fetch one invoice, `None` when the identifier matches nothing.
    async fn find_by_id(&self, id: &InvoiceId) -> Result<Option<Invoice>, InvoiceRepositoryError>;

    /// Fetch one page of the filtered listing, newest first.
    async fn list_filtered(
        &self,
        filter: &InvoiceFilter,
    ) -> Result<Vec<InvoiceListing>, InvoiceRepositoryError>;

    /// Count every invoice matching the filter text.
    async fn count_filtered(&self, filter: &InvoiceFilter) -> Result<i64, InvoiceRepositoryError>;
}
