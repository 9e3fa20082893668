//! Tests for the invoice query service.

use std::collections::HashMap;
use std::sync::Mutex;

use chrono::NaiveDate;
use rstest::rstest;

use super::*;
use crate::domain::ports::{CacheTicket, MockInvoiceRepository, NoopRouteCache};
use crate::domain::{
    AmountCents, CustomerId, ErrorCode, Invoice, InvoiceListing, InvoiceStatus, format_currency,
};

/// Cache double that remembers stores and can pretend a route was
/// invalidated after the ticket was issued.
struct RecordingCache<V> {
    entries: Mutex<HashMap<String, V>>,
    stale_tickets: bool,
}

impl<V> Default for RecordingCache<V> {
    fn default() -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            stale_tickets: false,
        }
    }
}

impl<V> RecordingCache<V> {
    fn rejecting_stores() -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            stale_tickets: true,
        }
    }

    fn len(&self) -> usize {
        self.entries.lock().expect("cache lock").len()
    }
}

#[async_trait]
impl<V> RouteCache<V> for RecordingCache<V>
where
    V: Clone + Send + Sync + 'static,
{
    async fn lookup(&self, key: &RouteCacheKey) -> CacheLookup<V> {
        let entries = self.entries.lock().expect("cache lock");
        match entries.get(&key.to_string()) {
            Some(view) => CacheLookup::Hit(view.clone()),
            None => CacheLookup::Miss(CacheTicket::new(key.clone(), 0)),
        }
    }

    async fn store(&self, ticket: CacheTicket, view: V) -> bool {
        if self.stale_tickets {
            return false;
        }
        self.entries
            .lock()
            .expect("cache lock")
            .insert(ticket.key().to_string(), view);
        true
    }
}

fn listing(id: &str, cents: i64) -> InvoiceListing {
    InvoiceListing {
        id: InvoiceId::new(id).expect("invoice id"),
        customer_id: CustomerId::new("c1").expect("customer id"),
        name: "Lee Robinson".to_owned(),
        email: "lee@robinson.com".to_owned(),
        image_url: "/customers/lee-robinson.png".to_owned(),
        amount: AmountCents::new(cents).expect("amount"),
        formatted_amount: format_currency(cents),
        status: InvoiceStatus::Pending,
        date: NaiveDate::from_ymd_opt(2023, 6, 5).expect("date"),
    }
}

fn stored_invoice(id: &InvoiceId) -> Invoice {
    Invoice {
        id: id.clone(),
        customer_id: CustomerId::new("c1").expect("customer id"),
        amount: AmountCents::new(15_795).expect("amount"),
        status: InvoiceStatus::Paid,
        date: NaiveDate::from_ymd_opt(2023, 8, 5).expect("date"),
    }
}

#[rstest]
#[tokio::test]
async fn list_invoices_combines_rows_and_page_count() {
    let mut repo = MockInvoiceRepository::new();
    repo.expect_list_filtered()
        .withf(|filter| filter.query == "lee" && filter.page == 2)
        .times(1)
        .return_once(|_| Ok(vec![listing("i7", 500)]));
    repo.expect_count_filtered()
        .times(1)
        .return_once(|_| Ok(7));

    let service = InvoiceQueryService::new(
        Arc::new(repo),
        Arc::new(NoopRouteCache),
        Arc::new(NoopRouteCache),
    );
    let page = service
        .list_invoices(InvoiceFilter::new(" lee ", 2))
        .await
        .expect("listing");

    assert_eq!(page.page, 2);
    assert_eq!(page.total_pages, 2);
    assert_eq!(page.invoices.len(), 1);
}

#[rstest]
#[tokio::test]
async fn empty_listing_still_reports_one_page() {
    let mut repo = MockInvoiceRepository::new();
    repo.expect_list_filtered().return_once(|_| Ok(Vec::new()));
    repo.expect_count_filtered().return_once(|_| Ok(0));

    let service = InvoiceQueryService::new(
        Arc::new(repo),
        Arc::new(NoopRouteCache),
        Arc::new(NoopRouteCache),
    );
    let page = service
        .list_invoices(InvoiceFilter::new("nobody", 1))
        .await
        .expect("listing");

    assert!(page.invoices.is_empty());
    assert_eq!(page.total_pages, 1);
}

#[rstest]
#[tokio::test]
async fn cached_listing_skips_the_repository() {
    let mut repo = MockInvoiceRepository::new();
    repo.expect_list_filtered()
        .times(1)
        .return_once(|_| Ok(vec![listing("i1", 100)]));
    repo.expect_count_filtered().times(1).return_once(|_| Ok(1));

    let listings = Arc::new(RecordingCache::<InvoicePage>::default());
    let service =
        InvoiceQueryService::new(Arc::new(repo), listings.clone(), Arc::new(NoopRouteCache));

    let first = service
        .list_invoices(InvoiceFilter::new("", 1))
        .await
        .expect("first listing");
    let second = service
        .list_invoices(InvoiceFilter::new("", 1))
        .await
        .expect("second listing");

    assert_eq!(first, second);
    assert_eq!(listings.len(), 1);
}

#[rstest]
#[tokio::test]
async fn stale_tickets_still_return_fresh_data() {
    let mut repo = MockInvoiceRepository::new();
    repo.expect_list_filtered()
        .times(2)
        .returning(|_| Ok(vec![listing("i1", 100)]));
    repo.expect_count_filtered().times(2).returning(|_| Ok(1));

    let listings = Arc::new(RecordingCache::<InvoicePage>::rejecting_stores());
    let service =
        InvoiceQueryService::new(Arc::new(repo), listings.clone(), Arc::new(NoopRouteCache));

    for _ in 0..2 {
        let page = service
            .list_invoices(InvoiceFilter::new("", 1))
            .await
            .expect("listing");
        assert_eq!(page.total_pages, 1);
    }
    assert_eq!(listings.len(), 0);
}

#[rstest]
#[case(InvoiceRepositoryError::connection("refused"), ErrorCode::ServiceUnavailable)]
#[case(InvoiceRepositoryError::query("syntax"), ErrorCode::InternalError)]
#[tokio::test]
async fn listing_errors_map_to_error_codes(
    #[case] failure: InvoiceRepositoryError,
    #[case] expected: ErrorCode,
) {
    let mut repo = MockInvoiceRepository::new();
    repo.expect_list_filtered()
        .return_once(move |_| Err(failure));
    repo.expect_count_filtered().returning(|_| Ok(0));

    let service = InvoiceQueryService::new(
        Arc::new(repo),
        Arc::new(NoopRouteCache),
        Arc::new(NoopRouteCache),
    );
    let error = service
        .list_invoices(InvoiceFilter::default())
        .await
        .expect_err("listing should fail");

    assert_eq!(error.code(), expected);
}

#[rstest]
#[tokio::test]
async fn invoice_for_edit_returns_form_values() {
    let id = InvoiceId::new("i9").expect("invoice id");
    let stored = stored_invoice(&id);
    let mut repo = MockInvoiceRepository::new();
    repo.expect_find_by_id()
        .times(1)
        .return_once(move |_| Ok(Some(stored)));

    let edit_forms = Arc::new(RecordingCache::<Option<InvoiceEditView>>::default());
    let service =
        InvoiceQueryService::new(Arc::new(repo), Arc::new(NoopRouteCache), edit_forms.clone());

    let view = service
        .invoice_for_edit(&id)
        .await
        .expect("lookup")
        .expect("invoice exists");
    assert_eq!(view.amount.cents(), 15_795);
    assert_eq!(view.status, InvoiceStatus::Paid);

    let cached = service.invoice_for_edit(&id).await.expect("cached lookup");
    assert_eq!(cached, Some(view));
    assert_eq!(edit_forms.len(), 1);
}

#[rstest]
#[tokio::test]
async fn invoice_for_edit_reports_absent_invoice() {
    let mut repo = MockInvoiceRepository::new();
    repo.expect_find_by_id().return_once(|_| Ok(None));

    let service = InvoiceQueryService::new(
        Arc::new(repo),
        Arc::new(NoopRouteCache),
        Arc::new(NoopRouteCache),
    );
    let view = service
        .invoice_for_edit(&InvoiceId::new("missing").expect("invoice id"))
        .await
        .expect("lookup");

    assert_eq!(view, None);
}
