//! Invoice form validation.
//!
//! Turns the raw, stringly typed fields of an invoice form into either a
//! validated payload or the complete set of per-field messages. Validation is
//! pure: it never touches a port.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::{AmountCents, CustomerId, InvoiceStatus};

pub(crate) const CUSTOMER_REQUIRED: &str = "Please select a customer.";
pub(crate) const AMOUNT_NOT_POSITIVE: &str = "Please enter an amount greater than $0.";
pub(crate) const AMOUNT_NOT_A_NUMBER: &str = "Please enter a valid amount.";
pub(crate) const AMOUNT_TOO_PRECISE: &str =
    "Please enter an amount with at most two decimal places.";
pub(crate) const AMOUNT_TOO_LARGE: &str = "Please enter a smaller amount.";
pub(crate) const STATUS_REQUIRED: &str = "Please select an invoice status.";

/// Largest accepted amount, $1,000,000,000.00. Keeps per-status totals over
/// tens of millions of invoices inside `i64`.
pub const MAX_AMOUNT_CENTS: i64 = 100_000_000_000;

/// Raw field values exactly as submitted.
///
/// Missing fields are `None`; present fields keep caller whitespace so the
/// validator decides what counts as blank.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RawInvoiceForm {
    #[schema(example = "3958dc9e-712f-4377-85e9-fec4b6a6442a")]
    pub customer_id: Option<String>,
    #[schema(example = "125.50")]
    pub amount: Option<String>,
    #[schema(example = "pending")]
    pub status: Option<String>,
}

impl RawInvoiceForm {
    /// Convenience constructor used by tests and tooling.
    pub fn new(customer_id: &str, amount: &str, status: &str) -> Self {
        Self {
            customer_id: Some(customer_id.to_owned()),
            amount: Some(amount.to_owned()),
            status: Some(status.to_owned()),
        }
    }
}

/// Named inputs of the invoice form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FormField {
    CustomerId,
    Amount,
    Status,
}

impl FormField {
    /// Wire name of the field.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::CustomerId => "customerId",
            Self::Amount => "amount",
            Self::Status => "status",
        }
    }
}

impl fmt::Display for FormField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-field validation messages, ordered by field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<FormField, Vec<String>>);

impl FieldErrors {
    /// Record a message against a field.
    pub fn push(&mut self, field: FormField, message: impl Into<String>) {
        self.0.entry(field).or_default().push(message.into());
    }

    /// Messages recorded for a field, empty when the field passed.
    pub fn messages(&self, field: FormField) -> &[String] {
        self.0.get(&field).map(Vec::as_slice).unwrap_or_default()
    }

    /// Whether the field has at least one message.
    pub fn contains(&self, field: FormField) -> bool {
        self.0.contains_key(&field)
    }

    /// True when no field failed.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate over failing fields and their messages.
    pub fn iter(&self) -> impl Iterator<Item = (FormField, &[String])> {
        self.0.iter().map(|(field, messages)| (*field, messages.as_slice()))
    }
}

/// Form values that passed every rule, with the amount already in cents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidInvoiceForm {
    pub customer_id: CustomerId,
    pub amount: AmountCents,
    pub status: InvoiceStatus,
}

/// Outcome of [`validate_invoice_form`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationResult {
    Valid(ValidInvoiceForm),
    Invalid(FieldErrors),
}

/// Validate a raw invoice form, collecting every failing field.
///
/// # Examples
/// ```
/// use dashboard::domain::{validate_invoice_form, FormField, RawInvoiceForm, ValidationResult};
///
/// let result = validate_invoice_form(&RawInvoiceForm::new("c1", "888", "pending"));
/// let ValidationResult::Valid(form) = result else { panic!("expected valid form") };
/// assert_eq!(form.amount.cents(), 88_800);
///
/// let result = validate_invoice_form(&RawInvoiceForm::new("", "0", "overdue"));
/// let ValidationResult::Invalid(errors) = result else { panic!("expected errors") };
/// assert!(errors.contains(FormField::CustomerId));
/// assert!(errors.contains(FormField::Amount));
/// assert!(errors.contains(FormField::Status));
/// ```
pub fn validate_invoice_form(raw: &RawInvoiceForm) -> ValidationResult {
    let mut errors = FieldErrors::default();

    let customer_id = raw
        .customer_id
        .as_deref()
        .and_then(|value| CustomerId::new(value).ok());
    if customer_id.is_none() {
        errors.push(FormField::CustomerId, CUSTOMER_REQUIRED);
    }

    let amount = match coerce_amount(raw.amount.as_deref()) {
        Ok(amount) => Some(amount),
        Err(message) => {
            errors.push(FormField::Amount, message);
            None
        }
    };

    let status = raw
        .status
        .as_deref()
        .and_then(|value| InvoiceStatus::from_str(value).ok());
    if status.is_none() {
        errors.push(FormField::Status, STATUS_REQUIRED);
    }

    match (customer_id, amount, status) {
        (Some(customer_id), Some(amount), Some(status)) => ValidationResult::Valid(ValidInvoiceForm {
            customer_id,
            amount,
            status,
        }),
        _ => ValidationResult::Invalid(errors),
    }
}

/// Coerce a decimal dollar string into cents.
///
/// Blank input coerces to zero and therefore fails the positivity rule.
fn coerce_amount(raw: Option<&str>) -> Result<AmountCents, &'static str> {
    let text = raw.unwrap_or_default().trim();
    if text.is_empty() {
        return Err(AMOUNT_NOT_POSITIVE);
    }

    let Ok(value) = Decimal::from_str(text).or_else(|_| Decimal::from_scientific(text)) else {
        return Err(beyond_decimal_range(text));
    };
    if value <= Decimal::ZERO {
        return Err(AMOUNT_NOT_POSITIVE);
    }
    if value.normalize().scale() > 2 {
        return Err(AMOUNT_TOO_PRECISE);
    }

    let cents = value
        .checked_mul(Decimal::ONE_HUNDRED)
        .and_then(|cents| cents.trunc().to_i64())
        .filter(|cents| *cents <= MAX_AMOUNT_CENTS)
        .ok_or(AMOUNT_TOO_LARGE)?;
    AmountCents::new(cents).map_err(|_| AMOUNT_NOT_POSITIVE)
}

/// Classify text `Decimal` cannot hold. Finite numbers outside its 96-bit
/// range or 28-digit scale still get a magnitude-specific message.
fn beyond_decimal_range(text: &str) -> &'static str {
    match text.parse::<f64>() {
        Ok(value) if value.is_finite() && value <= 0.0 => AMOUNT_NOT_POSITIVE,
        Ok(value) if value.is_finite() && value >= 1.0 => AMOUNT_TOO_LARGE,
        Ok(value) if value.is_finite() => AMOUNT_TOO_PRECISE,
        _ => AMOUNT_NOT_A_NUMBER,
    }
}
