//! Adapter selection and HTTP state assembly.
//!
//! With a database pool every port is Diesel-backed and logins check stored
//! Argon2 digests. Without one, a seeded in-memory store and the fixture
//! login stand in. Both paths share one invalidation bus so mutations evict
//! cached listings and edit forms.

use std::sync::Arc;
use std::time::Duration;

use actix_web::web;
use mockable::{Clock, DefaultClock};
use tracing::info;

use dashboard::domain::ports::{
    CustomerRepository, FixtureLoginService, InvoiceRepository, LoginService, OverviewRepository,
};
use dashboard::domain::{
    CustomerQueryService, EditFormCache, InvoiceMutationService, InvoiceQueryService, ListingCache,
    OverviewService, PasswordLoginService,
};
use dashboard::inbound::http::state::HttpState;
use dashboard::outbound::cache::{InMemoryRouteCache, RouteInvalidationBus};
use dashboard::outbound::memory::InMemoryDashboardStore;
use dashboard::outbound::persistence::{
    DieselAccountRepository, DieselCustomerRepository, DieselInvoiceRepository,
    DieselOverviewRepository,
};

use super::ServerConfig;

/// Repositories backing one HTTP state.
struct Repositories<I, C, O> {
    invoices: Arc<I>,
    customers: Arc<C>,
    overview: Arc<O>,
    login: Arc<dyn LoginService>,
}

fn assemble<I, C, O>(repos: Repositories<I, C, O>, overview_deadline: Duration) -> HttpState
where
    I: InvoiceRepository + 'static,
    C: CustomerRepository + 'static,
    O: OverviewRepository + 'static,
{
    let bus = Arc::new(RouteInvalidationBus::new());
    let listings: ListingCache = Arc::new(InMemoryRouteCache::new(Arc::clone(&bus)));
    let edit_forms: EditFormCache = Arc::new(InMemoryRouteCache::new(Arc::clone(&bus)));
    let clock: Arc<dyn Clock> = Arc::new(DefaultClock);

    HttpState {
        login: repos.login,
        invoices: Arc::new(InvoiceMutationService::new(
            Arc::clone(&repos.invoices),
            bus,
            clock,
        )),
        invoice_query: Arc::new(InvoiceQueryService::new(
            repos.invoices,
            listings,
            edit_forms,
        )),
        customers: Arc::new(CustomerQueryService::new(repos.customers)),
        overview: Arc::new(OverviewService::new(repos.overview, overview_deadline)),
    }
}

/// Build handler state for the configured backing store.
pub(super) fn build_http_state(config: &ServerConfig) -> web::Data<HttpState> {
    let state = match &config.db_pool {
        Some(pool) => {
            info!("serving from PostgreSQL");
            let accounts = Arc::new(DieselAccountRepository::new(pool.clone()));
            assemble(
                Repositories {
                    invoices: Arc::new(DieselInvoiceRepository::new(pool.clone())),
                    customers: Arc::new(DieselCustomerRepository::new(pool.clone())),
                    overview: Arc::new(DieselOverviewRepository::new(pool.clone())),
                    login: Arc::new(PasswordLoginService::new(accounts)),
                },
                config.overview_deadline,
            )
        }
        None => {
            info!("serving seeded in-memory data with the fixture login");
            let store = Arc::new(InMemoryDashboardStore::seeded());
            assemble(
                Repositories {
                    invoices: Arc::clone(&store),
                    customers: Arc::clone(&store),
                    overview: store,
                    login: Arc::new(FixtureLoginService),
                },
                config.overview_deadline,
            )
        }
    };
    web::Data::new(state)
}
