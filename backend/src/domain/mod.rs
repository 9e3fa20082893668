//! Domain primitives, services and ports.
//!
//! Purpose: Define strongly typed invoice, customer and account entities,
//! the validation and orchestration rules applied to them, and the ports
//! adapters implement. Nothing here knows about HTTP, SQL or cache storage.
//!
//! Public surface:
//! - Error (alias to `error::Error`): API error response payload.
//! - ErrorCode (alias to `error::ErrorCode`): stable error identifier.
//! - RawInvoiceForm / validate_invoice_form: schema validation of submitted
//!   invoice forms.
//! - InvoiceMutationService: create, update and delete orchestration.
//! - InvoiceQueryService / CustomerQueryService / OverviewService: cached
//!   and streamed reads.
//! - PasswordLoginService: credential verification against stored accounts.

pub mod account;
pub mod auth;
pub mod customer;
pub mod customer_query_service;
pub mod error;
pub mod invoice;
pub mod invoice_form;
pub mod invoice_mutation;
pub mod invoice_query_service;
pub mod overview;
pub mod overview_service;
pub mod password_login_service;
pub mod ports;
pub mod trace_id;

pub use self::account::{Account, AccountValidationError, PasswordDigest, UserId};
pub use self::auth::{
    AuthError, INVALID_CREDENTIALS_MESSAGE, LoginCredentials, LoginValidationError,
    PASSWORD_MIN_LEN, SessionGrant, UNEXPECTED_AUTH_MESSAGE,
};
pub use self::customer::{CustomerOption, CustomerSummary};
pub use self::customer_query_service::CustomerQueryService;
pub use self::error::{Error, ErrorCode, ErrorValidationError};
pub use self::invoice::{
    AmountCents, CustomerId, Invoice, InvoiceChanges, InvoiceEditView, InvoiceId, InvoiceListing,
    InvoicePage, InvoiceStatus, InvoiceValidationError, NewInvoice, format_currency,
};
pub use self::invoice_form::{
    FieldErrors, FormField, MAX_AMOUNT_CENTS, RawInvoiceForm, ValidInvoiceForm, ValidationResult,
    validate_invoice_form,
};
pub use self::invoice_mutation::{InvoiceMutationService, MutationOutcome};
pub use self::invoice_query_service::{EditFormCache, InvoiceQueryService, ListingCache};
pub use self::overview::{
    CardData, LatestInvoice, MonthlyRevenue, OverviewRegion, OverviewSnapshot, RegionData,
    RegionFrame, RegionState,
};
pub use self::overview_service::{DEFAULT_OVERVIEW_DEADLINE, OverviewService};
pub use self::password_login_service::PasswordLoginService;
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use dashboard::domain::{ApiResult, Error};
///
/// fn lookup() -> ApiResult<u32> {
///     Err(Error::not_found("no such invoice"))
/// }
///
/// assert!(lookup().is_err());
/// ```
pub type ApiResult<T> = Result<T, Error>;
