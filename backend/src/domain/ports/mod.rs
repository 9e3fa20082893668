//! Domain ports and supporting types for the hexagonal boundary.

mod macros;
pub(crate) use macros::define_port_error;

mod account_repository;
mod cache_key;
mod customer_repository;
mod invoice_command;
mod invoice_query;
mod invoice_repository;
mod login_service;
mod overview_query;
mod overview_repository;
mod route_cache;

#[cfg(test)]
pub use account_repository::MockAccountRepository;
pub use account_repository::{AccountRepository, AccountRepositoryError};
pub use cache_key::{RouteCacheKey, RouteCacheKeyValidationError, RoutePath};
#[cfg(test)]
pub use customer_repository::MockCustomerRepository;
pub use customer_repository::{CustomerRepository, CustomerRepositoryError};
pub use invoice_command::InvoiceCommand;
#[cfg(test)]
pub use invoice_command::MockInvoiceCommand;
pub use invoice_query::{CustomerQuery, InvoiceQuery};
#[cfg(test)]
pub use invoice_query::{MockCustomerQuery, MockInvoiceQuery};
#[cfg(test)]
pub use invoice_repository::MockInvoiceRepository;
pub use invoice_repository::{
    INVOICES_PER_PAGE, InvoiceFilter, InvoiceRepository, InvoiceRepositoryError, page_count,
};
pub use login_service::{
    FIXTURE_LOGIN_EMAIL, FIXTURE_LOGIN_PASSWORD, FIXTURE_LOGIN_USER_ID, FixtureLoginService,
    LoginService,
};
#[cfg(test)]
pub use login_service::MockLoginService;
#[cfg(test)]
pub use overview_query::MockOverviewQuery;
pub use overview_query::OverviewQuery;
#[cfg(test)]
pub use overview_repository::MockOverviewRepository;
pub use overview_repository::{
    LATEST_INVOICES_LIMIT, OverviewRepository, OverviewRepositoryError,
};
#[cfg(test)]
pub use route_cache::MockRouteInvalidator;
pub use route_cache::{CacheLookup, CacheTicket, NoopRouteCache, RouteCache, RouteInvalidator};
