//! Driving port for invoice mutations.
//!
//! Each method is one form submission. Outcomes are values, not errors: a
//! validation failure or a store failure is a normal answer the caller
//! renders, so the methods are infallible at the type level.

use async_trait::async_trait;

use crate::domain::{InvoiceId, MutationOutcome, RawInvoiceForm};

/// Domain use-case port for creating, updating and deleting invoices.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait InvoiceCommand: Send + Sync {
    /// Validate and insert a new invoice dated today.
    async fn create_invoice(&self, form: RawInvoiceForm) -> MutationOutcome;

    /// Validate and overwrite an existing invoice.
    async fn update_invoice(&self, id: InvoiceId, form: RawInvoiceForm) -> MutationOutcome;

    /// Delete an invoice.
    async fn delete_invoice(&self, id: InvoiceId) -> MutationOutcome;
}
