//! Driving ports for invoice and customer reads.
//!
//! Inbound adapters use these ports to render the listing, edit form and
//! customers table without importing persistence or cache concerns.

use async_trait::async_trait;

use crate::domain::{
    CustomerOption, CustomerSummary, Error, InvoiceEditView, InvoiceId, InvoicePage,
};

use super::InvoiceFilter;

/// Domain use-case port for invoice reads.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait InvoiceQuery: Send + Sync {
    /// One page of the filtered listing with the total page count.
    async fn list_invoices(&self, filter: InvoiceFilter) -> Result<InvoicePage, Error>;

    /// Values for the edit form, `None` when the invoice does not exist.
    async fn invoice_for_edit(&self, id: &InvoiceId) -> Result<Option<InvoiceEditView>, Error>;
}

/// Domain use-case port for customer reads.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CustomerQuery: Send + Sync {
    /// Options for the customer selector.
    async fn customer_options(&self) -> Result<Vec<CustomerOption>, Error>;

    /// Customers table filtered by name or email.
    async fn filtered_customers(&self, query: &str) -> Result<Vec<CustomerSummary>, Error>;
}
