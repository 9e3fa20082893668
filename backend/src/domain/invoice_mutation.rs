//! Invoice mutation orchestration.
//!
//! Each entry point is one form submission: validate, persist with a single
//! repository call, invalidate the affected routes, then decide where the
//! client goes next. The outcome is only produced once the persistence result
//! has been fully handled, so a redirect can never be mistaken for a store
//! failure or the other way round.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use serde::Serialize;
use utoipa::ToSchema;
use tracing::{debug, error, info};

use crate::domain::ports::{InvoiceCommand, InvoiceRepository, RouteInvalidator, RoutePath};
use crate::domain::{
    FieldErrors, InvoiceChanges, InvoiceId, NewInvoice, RawInvoiceForm, ValidInvoiceForm,
    ValidationResult, validate_invoice_form,
};

pub(crate) const CREATE_MISSING_FIELDS: &str = "Missing Fields. Failed to Create Invoice.";
pub(crate) const UPDATE_MISSING_FIELDS: &str = "Missing Fields. Failed to Update Invoice.";
pub(crate) const CREATE_FAILED: &str = "Database Error: Failed to Create Invoice.";
pub(crate) const UPDATE_FAILED: &str = "Database Error: Failed to Update Invoice.";
pub(crate) const DELETE_FAILED: &str = "Database Error: Failed to Delete Invoice.";

/// Result of one invoice mutation. Exactly one variant per submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(tag = "outcome", rename_all = "camelCase")]
pub enum MutationOutcome {
    /// The change was stored; navigate to `target`.
    Redirect { target: String },
    /// The store rejected the change. `message` is safe to display.
    Failure { message: String },
    /// The form did not validate; nothing was stored.
    FieldErrors {
        message: String,
        #[schema(value_type = Object)]
        errors: FieldErrors,
    },
    /// The change was stored and the caller stays where it is.
    Completed,
}

impl MutationOutcome {
    fn redirect(route: &RoutePath) -> Self {
        Self::Redirect {
            target: route.as_str().to_owned(),
        }
    }

    fn failure(message: &str) -> Self {
        Self::Failure {
            message: message.to_owned(),
        }
    }

    fn field_errors(message: &str, errors: FieldErrors) -> Self {
        Self::FieldErrors {
            message: message.to_owned(),
            errors,
        }
    }
}

/// Invoice command service over an [`InvoiceRepository`].
#[derive(Clone)]
pub struct InvoiceMutationService<R> {
    repository: Arc<R>,
    invalidator: Arc<dyn RouteInvalidator>,
    clock: Arc<dyn Clock>,
}

impl<R> InvoiceMutationService<R> {
    /// Create a new service with the given repository, invalidator and clock.
    pub fn new(
        repository: Arc<R>,
        invalidator: Arc<dyn RouteInvalidator>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            repository,
            invalidator,
            clock,
        }
    }

    async fn invalidate_invoice(&self, id: &InvoiceId) {
        self.invalidator.invalidate(&RoutePath::invoices()).await;
        self.invalidator
            .invalidate(&RoutePath::invoice_edit(id))
            .await;
    }
}

fn validated(form: &RawInvoiceForm, missing_fields: &str) -> Result<ValidInvoiceForm, MutationOutcome> {
    match validate_invoice_form(form) {
        ValidationResult::Valid(valid) => Ok(valid),
        ValidationResult::Invalid(errors) => {
            debug!(fields = ?errors, "invoice form rejected");
            Err(MutationOutcome::field_errors(missing_fields, errors))
        }
    }
}

#[async_trait]
impl<R> InvoiceCommand for InvoiceMutationService<R>
where
    R: InvoiceRepository,
{
    async fn create_invoice(&self, form: RawInvoiceForm) -> MutationOutcome {
        let valid = match validated(&form, CREATE_MISSING_FIELDS) {
            Ok(valid) => valid,
            Err(outcome) => return outcome,
        };

        let invoice = NewInvoice {
            customer_id: valid.customer_id,
            amount: valid.amount,
            status: valid.status,
            date: self.clock.utc().date_naive(),
        };
        if let Err(err) = self.repository.insert(&invoice).await {
            error!(error = %err, customer_id = %invoice.customer_id, "failed to create invoice");
            return MutationOutcome::failure(CREATE_FAILED);
        }

        info!(customer_id = %invoice.customer_id, "invoice created");
        let listing = RoutePath::invoices();
        self.invalidator.invalidate(&listing).await;
        MutationOutcome::redirect(&listing)
    }

    async fn update_invoice(&self, id: InvoiceId, form: RawInvoiceForm) -> MutationOutcome {
        let valid = match validated(&form, UPDATE_MISSING_FIELDS) {
            Ok(valid) => valid,
            Err(outcome) => return outcome,
        };

        let changes = InvoiceChanges {
            customer_id: valid.customer_id,
            amount: valid.amount,
            status: valid.status,
        };
        if let Err(err) = self.repository.update(&id, &changes).await {
            error!(error = %err, invoice_id = %id, "failed to update invoice");
            return MutationOutcome::failure(UPDATE_FAILED);
        }

        info!(invoice_id = %id, "invoice updated");
        self.invalidate_invoice(&id).await;
        MutationOutcome::redirect(&RoutePath::invoices())
    }

    async fn delete_invoice(&self, id: InvoiceId) -> MutationOutcome {
        if let Err(err) = self.repository.remove(&id).await {
            error!(error = %err, invoice_id = %id, "failed to delete invoice");
            return MutationOutcome::failure(DELETE_FAILED);
        }

        info!(invoice_id = %id, "invoice deleted");
        self.invalidate_invoice(&id).await;
        MutationOutcome::Completed
    }
}

#[cfg(test)]
#[path = "invoice_mutation_tests.rs"]
mod tests;
