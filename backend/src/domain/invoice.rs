//! Invoice data model.
//!
//! Amounts are carried in minor currency units (cents) end to end; decimal
//! input is converted once, by the form validator, before anything reaches a
//! repository.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Validation errors raised by invoice value constructors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InvoiceValidationError {
    #[error("invoice id must not be empty")]
    EmptyInvoiceId,
    #[error("customer id must not be empty")]
    EmptyCustomerId,
    #[error("amount must be greater than zero, got {cents} cents")]
    NonPositiveAmount { cents: i64 },
    #[error("unknown invoice status: {value}")]
    UnknownStatus { value: String },
}

macro_rules! opaque_id {
    ($(#[$meta:meta])* $name:ident, $empty:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(try_from = "String", into = "String")]
        pub struct $name(String);

        impl $name {
            /// Validate and construct the identifier from borrowed input.
            ///
            /// Surrounding whitespace is trimmed; the remaining text is kept
            /// verbatim because storage adapters own the concrete format.
            pub fn new(id: impl AsRef<str>) -> Result<Self, InvoiceValidationError> {
                let trimmed = id.as_ref().trim();
                if trimmed.is_empty() {
                    return Err(InvoiceValidationError::$empty);
                }
                Ok(Self(trimmed.to_owned()))
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                self.0.as_str()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<$name> for String {
            fn from(value: $name) -> Self {
                value.0
            }
        }

        impl TryFrom<String> for $name {
            type Error = InvoiceValidationError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }
    };
}

opaque_id!(
    /// Opaque invoice identifier.
    InvoiceId,
    EmptyInvoiceId
);

opaque_id!(
    /// Opaque reference to the customer an invoice is billed to.
    CustomerId,
    EmptyCustomerId
);

/// Settlement state of an invoice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum InvoiceStatus {
    Pending,
    Paid,
}

impl InvoiceStatus {
    /// Storage and wire representation.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Paid => "paid",
        }
    }
}

impl fmt::Display for InvoiceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for InvoiceStatus {
    type Err = InvoiceValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "pending" => Ok(Self::Pending),
            "paid" => Ok(Self::Paid),
            other => Err(InvoiceValidationError::UnknownStatus {
                value: other.to_owned(),
            }),
        }
    }
}

/// Positive amount in cents.
///
/// # Examples
/// ```
/// use dashboard::domain::AmountCents;
///
/// let amount = AmountCents::new(88_800).unwrap();
/// assert_eq!(amount.to_string(), "$888.00");
/// assert!(AmountCents::new(0).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, ToSchema)]
#[serde(try_from = "i64", into = "i64")]
#[schema(value_type = i64, example = 88800)]
pub struct AmountCents(i64);

impl AmountCents {
    /// Construct an amount, rejecting zero and negative values.
    pub fn new(cents: i64) -> Result<Self, InvoiceValidationError> {
        if cents <= 0 {
            return Err(InvoiceValidationError::NonPositiveAmount { cents });
        }
        Ok(Self(cents))
    }

    /// Raw value in cents.
    pub fn cents(self) -> i64 {
        self.0
    }
}

impl fmt::Display for AmountCents {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&format_currency(self.0))
    }
}

impl From<AmountCents> for i64 {
    fn from(value: AmountCents) -> Self {
        value.0
    }
}

impl TryFrom<i64> for AmountCents {
    type Error = InvoiceValidationError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Render a cent amount as US dollars with thousands separators.
///
/// # Examples
/// ```
/// use dashboard::domain::format_currency;
///
/// assert_eq!(format_currency(123_456_789), "$1,234,567.89");
/// assert_eq!(format_currency(-5), "-$0.05");
/// ```
pub fn format_currency(cents: i64) -> String {
    let sign = if cents < 0 { "-" } else { "" };
    let magnitude = cents.unsigned_abs();
    let dollars = (magnitude / 100).to_string();
    let remainder = magnitude % 100;

    let mut grouped = String::with_capacity(dollars.len() + dollars.len() / 3);
    for (index, digit) in dollars.chars().enumerate() {
        if index > 0 && (dollars.len() - index) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }
    format!("{sign}${grouped}.{remainder:02}")
}

/// Values written by the create path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewInvoice {
    pub customer_id: CustomerId,
    pub amount: AmountCents,
    pub status: InvoiceStatus,
    pub date: NaiveDate,
}

/// Values written by the update path. The issue date is left untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvoiceChanges {
    pub customer_id: CustomerId,
    pub amount: AmountCents,
    pub status: InvoiceStatus,
}

/// Stored invoice row as seen by the domain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invoice {
    pub id: InvoiceId,
    pub customer_id: CustomerId,
    pub amount: AmountCents,
    pub status: InvoiceStatus,
    pub date: NaiveDate,
}

/// Invoice joined with its customer for the listing table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceListing {
    #[schema(value_type = String)]
    pub id: InvoiceId,
    #[schema(value_type = String)]
    pub customer_id: CustomerId,
    pub name: String,
    pub email: String,
    pub image_url: String,
    pub amount: AmountCents,
    pub formatted_amount: String,
    pub status: InvoiceStatus,
    pub date: NaiveDate,
}

/// One page of the filtered invoice listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct InvoicePage {
    pub invoices: Vec<InvoiceListing>,
    pub page: u32,
    pub total_pages: u32,
}

/// Prefilled values for the edit form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceEditView {
    #[schema(value_type = String)]
    pub id: InvoiceId,
    #[schema(value_type = String)]
    pub customer_id: CustomerId,
    pub amount: AmountCents,
    pub status: InvoiceStatus,
}

impl From<Invoice> for InvoiceEditView {
    fn from(value: Invoice) -> Self {
        Self {
            id: value.id,
            customer_id: value.customer_id,
            amount: value.amount,
            status: value.status,
        }
    }
}
