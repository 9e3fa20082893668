//! Invoice read service.
//!
//! Listing pages and edit forms are served through route caches. A miss
//! queries the repository and stores the result with the ticket issued at
//! lookup time; the cache drops it if the route was invalidated meanwhile.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use crate::domain::ports::{
    CacheLookup, InvoiceFilter, InvoiceQuery, InvoiceRepository, InvoiceRepositoryError,
    RouteCache, RouteCacheKey, RoutePath, page_count,
};
use crate::domain::{Error, InvoiceEditView, InvoiceId, InvoicePage};

/// Cache of rendered listing pages keyed by search and page.
pub type ListingCache = Arc<dyn RouteCache<InvoicePage>>;
/// Cache of edit form values keyed by invoice route.
pub type EditFormCache = Arc<dyn RouteCache<Option<InvoiceEditView>>>;

/// Invoice query service implementing [`InvoiceQuery`].
#[derive(Clone)]
pub struct InvoiceQueryService<R> {
    repository: Arc<R>,
    listings: ListingCache,
    edit_forms: EditFormCache,
}

impl<R> InvoiceQueryService<R> {
    /// Create a new service over `repository` with the given caches.
    pub fn new(repository: Arc<R>, listings: ListingCache, edit_forms: EditFormCache) -> Self {
        Self {
            repository,
            listings,
            edit_forms,
        }
    }
}

fn listing_key(filter: &InvoiceFilter) -> RouteCacheKey {
    RouteCacheKey::variant(
        RoutePath::invoices(),
        format!("page={}&query={}", filter.page, filter.query),
    )
}

pub(crate) fn map_invoice_repository_error(error: InvoiceRepositoryError) -> Error {
    match error {
        InvoiceRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("invoice repository unavailable: {message}"))
        }
        InvoiceRepositoryError::Query { message } => {
            Error::internal(format!("invoice repository error: {message}"))
        }
        InvoiceRepositoryError::Missing { id } => Error::not_found(format!("invoice {id} not found")),
    }
}

#[async_trait]
impl<R> InvoiceQuery for InvoiceQueryService<R>
where
    R: InvoiceRepository,
{
    async fn list_invoices(&self, filter: InvoiceFilter) -> Result<InvoicePage, Error> {
        let key = listing_key(&filter);
        let ticket = match self.listings.lookup(&key).await {
            CacheLookup::Hit(page) => {
                debug!(key = %key, "invoice listing served from cache");
                return Ok(page);
            }
            CacheLookup::Miss(ticket) => ticket,
        };

        let (invoices, total) = tokio::try_join!(
            self.repository.list_filtered(&filter),
            self.repository.count_filtered(&filter),
        )
        .map_err(map_invoice_repository_error)?;

        let page = InvoicePage {
            invoices,
            page: filter.page,
            total_pages: page_count(total),
        };
        if !self.listings.store(ticket, page.clone()).await {
            debug!(key = %key, "invoice listing invalidated while loading; not cached");
        }
        Ok(page)
    }

    async fn invoice_for_edit(&self, id: &InvoiceId) -> Result<Option<InvoiceEditView>, Error> {
        let key = RouteCacheKey::route(RoutePath::invoice_edit(id));
        let ticket = match self.edit_forms.lookup(&key).await {
            CacheLookup::Hit(view) => return Ok(view),
            CacheLookup::Miss(ticket) => ticket,
        };

        let view = self
            .repository
            .find_by_id(id)
            .await
            .map_err(map_invoice_repository_error)?
            .map(InvoiceEditView::from);
        self.edit_forms.store(ticket, view.clone()).await;
        Ok(view)
    }
}

#[cfg(test)]
#[path = "invoice_query_service_tests.rs"]
mod tests;
