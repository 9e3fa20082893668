//! Lock-protected dataset behind the in-memory repositories.

use std::cmp::Reverse;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::ports::{
    CustomerRepository, CustomerRepositoryError, INVOICES_PER_PAGE, InvoiceFilter,
    InvoiceRepository, InvoiceRepositoryError, LATEST_INVOICES_LIMIT, OverviewRepository,
    OverviewRepositoryError,
};
use crate::domain::{
    AmountCents, CardData, CustomerId, CustomerOption, CustomerSummary, Invoice, InvoiceChanges,
    InvoiceId, InvoiceListing, InvoiceStatus, LatestInvoice, MonthlyRevenue, NewInvoice,
    format_currency,
};

use super::seed;

#[derive(Debug, Clone)]
struct CustomerRecord {
    id: CustomerId,
    name: String,
    email: String,
    image_url: String,
}

#[derive(Debug, Default)]
struct Dataset {
    customers: Vec<CustomerRecord>,
    invoices: Vec<Invoice>,
    revenue: Vec<MonthlyRevenue>,
}

impl Dataset {
    fn customer(&self, id: &CustomerId) -> Option<&CustomerRecord> {
        self.customers.iter().find(|customer| &customer.id == id)
    }

    fn listing(&self, invoice: &Invoice) -> Option<InvoiceListing> {
        let customer = self.customer(&invoice.customer_id)?;
        Some(InvoiceListing {
            id: invoice.id.clone(),
            customer_id: customer.id.clone(),
            name: customer.name.clone(),
            email: customer.email.clone(),
            image_url: customer.image_url.clone(),
            amount: invoice.amount,
            formatted_amount: format_currency(invoice.amount.cents()),
            status: invoice.status,
            date: invoice.date,
        })
    }

    /// Listings matching `query`, newest first.
    fn matching(&self, query: &str) -> Vec<InvoiceListing> {
        let needle = query.to_lowercase();
        let mut rows: Vec<InvoiceListing> = self
            .invoices
            .iter()
            .filter_map(|invoice| self.listing(invoice))
            .filter(|row| needle.is_empty() || listing_matches(row, &needle))
            .collect();
        rows.sort_by_key(|row| Reverse(row.date));
        rows
    }
}

fn listing_matches(row: &InvoiceListing, needle: &str) -> bool {
    [
        row.name.to_lowercase(),
        row.email.to_lowercase(),
        row.amount.cents().to_string(),
        row.date.to_string(),
        row.status.as_str().to_owned(),
    ]
    .iter()
    .any(|field| field.contains(needle))
}

fn status_of(paid: bool) -> InvoiceStatus {
    if paid {
        InvoiceStatus::Paid
    } else {
        InvoiceStatus::Pending
    }
}

/// In-memory invoice, customer and overview store.
#[derive(Debug, Default)]
pub struct InMemoryDashboardStore {
    data: RwLock<Dataset>,
}

impl InMemoryDashboardStore {
    /// Create an empty store with no customers.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store holding the demo customers, invoices and revenue.
    pub fn seeded() -> Self {
        let customers: Vec<CustomerRecord> = seed::CUSTOMERS
            .iter()
            .filter_map(|customer| {
                Some(CustomerRecord {
                    id: CustomerId::new(customer.id).ok()?,
                    name: customer.name.to_owned(),
                    email: customer.email.to_owned(),
                    image_url: customer.image_url.to_owned(),
                })
            })
            .collect();
        let invoices = seed::INVOICES
            .iter()
            .filter_map(|invoice| {
                Some(Invoice {
                    id: InvoiceId::new(Uuid::new_v4().to_string()).ok()?,
                    customer_id: customers.get(invoice.customer)?.id.clone(),
                    amount: AmountCents::new(invoice.cents).ok()?,
                    status: status_of(invoice.paid),
                    date: invoice.naive_date()?,
                })
            })
            .collect();
        let revenue = seed::REVENUE
            .iter()
            .map(|(month, revenue)| MonthlyRevenue {
                month: (*month).to_owned(),
                revenue: *revenue,
            })
            .collect();
        Self {
            data: RwLock::new(Dataset {
                customers,
                invoices,
                revenue,
            }),
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, Dataset> {
        self.data.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Dataset> {
        self.data.write().unwrap_or_else(PoisonError::into_inner)
    }
}

fn unknown_customer(id: &CustomerId) -> InvoiceRepositoryError {
    InvoiceRepositoryError::query(format!("customer {id} does not exist"))
}

#[async_trait]
impl InvoiceRepository for InMemoryDashboardStore {
    async fn insert(&self, invoice: &NewInvoice) -> Result<(), InvoiceRepositoryError> {
        let mut data = self.write();
        if data.customer(&invoice.customer_id).is_none() {
            return Err(unknown_customer(&invoice.customer_id));
        }
        let id = InvoiceId::new(Uuid::new_v4().to_string())
            .map_err(|err| InvoiceRepositoryError::query(err.to_string()))?;
        data.invoices.push(Invoice {
            id,
            customer_id: invoice.customer_id.clone(),
            amount: invoice.amount,
            status: invoice.status,
            date: invoice.date,
        });
        Ok(())
    }

    async fn update(
        &self,
        id: &InvoiceId,
        changes: &InvoiceChanges,
    ) -> Result<(), InvoiceRepositoryError> {
        let mut data = self.write();
        if data.customer(&changes.customer_id).is_none() {
            return Err(unknown_customer(&changes.customer_id));
        }
        let invoice = data
            .invoices
            .iter_mut()
            .find(|invoice| &invoice.id == id)
            .ok_or_else(|| InvoiceRepositoryError::missing(id.as_ref()))?;
        invoice.customer_id = changes.customer_id.clone();
        invoice.amount = changes.amount;
        invoice.status = changes.status;
        Ok(())
    }

    async fn remove(&self, id: &InvoiceId) -> Result<(), InvoiceRepositoryError> {
        let mut data = self.write();
        let before = data.invoices.len();
        data.invoices.retain(|invoice| &invoice.id != id);
        if data.invoices.len() == before {
            return Err(InvoiceRepositoryError::missing(id.as_ref()));
        }
        Ok(())
    }

    async fn find_by_id(&self, id: &InvoiceId) -> Result<Option<Invoice>, InvoiceRepositoryError> {
        Ok(self
            .read()
            .invoices
            .iter()
            .find(|invoice| &invoice.id == id)
            .cloned())
    }

    async fn list_filtered(
        &self,
        filter: &InvoiceFilter,
    ) -> Result<Vec<InvoiceListing>, InvoiceRepositoryError> {
        let offset = usize::try_from(filter.offset()).unwrap_or(usize::MAX);
        let limit = usize::try_from(INVOICES_PER_PAGE).unwrap_or(usize::MAX);
        Ok(self
            .read()
            .matching(&filter.query)
            .into_iter()
            .skip(offset)
            .take(limit)
            .collect())
    }

    async fn count_filtered(&self, filter: &InvoiceFilter) -> Result<i64, InvoiceRepositoryError> {
        let count = self.read().matching(&filter.query).len();
        Ok(i64::try_from(count).unwrap_or(i64::MAX))
    }
}

#[async_trait]
impl CustomerRepository for InMemoryDashboardStore {
    async fn list_options(&self) -> Result<Vec<CustomerOption>, CustomerRepositoryError> {
        let mut options: Vec<CustomerOption> = self
            .read()
            .customers
            .iter()
            .map(|customer| CustomerOption {
                id: customer.id.clone(),
                name: customer.name.clone(),
            })
            .collect();
        options.sort_by(|left, right| left.name.cmp(&right.name));
        Ok(options)
    }

    async fn list_filtered(
        &self,
        query: &str,
    ) -> Result<Vec<CustomerSummary>, CustomerRepositoryError> {
        let needle = query.to_lowercase();
        let data = self.read();
        let mut rows: Vec<CustomerSummary> = data
            .customers
            .iter()
            .filter(|customer| {
                customer.name.to_lowercase().contains(&needle)
                    || customer.email.to_lowercase().contains(&needle)
            })
            .map(|customer| {
                let owned = data
                    .invoices
                    .iter()
                    .filter(|invoice| invoice.customer_id == customer.id);
                let (mut total_invoices, mut total_pending, mut total_paid) = (0_i64, 0_i64, 0_i64);
                for invoice in owned {
                    total_invoices += 1;
                    match invoice.status {
                        InvoiceStatus::Pending => {
                            total_pending = total_pending.saturating_add(invoice.amount.cents());
                        }
                        InvoiceStatus::Paid => {
                            total_paid = total_paid.saturating_add(invoice.amount.cents());
                        }
                    }
                }
                CustomerSummary {
                    id: customer.id.clone(),
                    name: customer.name.clone(),
                    email: customer.email.clone(),
                    image_url: customer.image_url.clone(),
                    total_invoices,
                    total_pending,
                    total_paid,
                    formatted_total_pending: format_currency(total_pending),
                    formatted_total_paid: format_currency(total_paid),
                }
            })
            .collect();
        rows.sort_by(|left, right| left.name.cmp(&right.name));
        Ok(rows)
    }
}

#[async_trait]
impl OverviewRepository for InMemoryDashboardStore {
    async fn card_data(&self) -> Result<CardData, OverviewRepositoryError> {
        let data = self.read();
        let sum = |status: InvoiceStatus| -> i64 {
            data.invoices
                .iter()
                .filter(|invoice| invoice.status == status)
                .fold(0_i64, |total, invoice| total.saturating_add(invoice.amount.cents()))
        };
        let total_paid = sum(InvoiceStatus::Paid);
        let total_pending = sum(InvoiceStatus::Pending);
        Ok(CardData {
            number_of_customers: i64::try_from(data.customers.len()).unwrap_or(i64::MAX),
            number_of_invoices: i64::try_from(data.invoices.len()).unwrap_or(i64::MAX),
            total_paid,
            total_pending,
            formatted_total_paid: format_currency(total_paid),
            formatted_total_pending: format_currency(total_pending),
        })
    }

    async fn revenue(&self) -> Result<Vec<MonthlyRevenue>, OverviewRepositoryError> {
        Ok(self.read().revenue.clone())
    }

    async fn latest_invoices(&self) -> Result<Vec<LatestInvoice>, OverviewRepositoryError> {
        let limit = usize::try_from(LATEST_INVOICES_LIMIT).unwrap_or(usize::MAX);
        Ok(self
            .read()
            .matching("")
            .into_iter()
            .take(limit)
            .map(|row| LatestInvoice {
                id: row.id,
                name: row.name,
                email: row.email,
                image_url: row.image_url,
                amount: row.amount,
                formatted_amount: row.formatted_amount,
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    //! Behaviour parity with the SQL adapters.
    use super::*;
    use chrono::NaiveDate;
    use rstest::{fixture, rstest};

    const LEE: &str = "3958dc9e-742f-4377-85e9-fec4b6a6442a";

    #[fixture]
    fn store() -> InMemoryDashboardStore {
        InMemoryDashboardStore::seeded()
    }

    fn new_invoice(customer: &str, cents: i64) -> NewInvoice {
        NewInvoice {
            customer_id: CustomerId::new(customer).expect("customer id"),
            amount: AmountCents::new(cents).expect("amount"),
            status: InvoiceStatus::Pending,
            date: NaiveDate::from_ymd_opt(2024, 1, 2).expect("date"),
        }
    }

    #[rstest]
    #[tokio::test]
    async fn seeded_listing_pages_newest_first(store: InMemoryDashboardStore) {
        let first = InvoiceRepository::list_filtered(&store, &InvoiceFilter::new("", 1))
            .await
            .expect("page one");
        let third = InvoiceRepository::list_filtered(&store, &InvoiceFilter::new("", 3))
            .await
            .expect("page three");

        assert_eq!(first.len(), 6);
        assert_eq!(third.len(), 1);
        assert!(first.windows(2).all(|pair| pair[0].date >= pair[1].date));
        assert_eq!(
            store
                .count_filtered(&InvoiceFilter::new("", 1))
                .await
                .expect("count"),
            13
        );
    }

    #[rstest]
    #[case("LEE", 2)]
    #[case("paid", 8)]
    #[case("2022-12", 1)]
    #[case("44800", 1)]
    #[case("nobody", 0)]
    #[tokio::test]
    async fn search_matches_every_text_column(
        store: InMemoryDashboardStore,
        #[case] query: &str,
        #[case] expected: i64,
    ) {
        let count = store
            .count_filtered(&InvoiceFilter::new(query, 1))
            .await
            .expect("count");
        assert_eq!(count, expected);
    }

    #[rstest]
    #[tokio::test]
    async fn insert_rejects_unknown_customer(store: InMemoryDashboardStore) {
        let err = store
            .insert(&new_invoice("no-such-customer", 100))
            .await
            .expect_err("unknown customer");
        assert!(matches!(err, InvoiceRepositoryError::Query { .. }));
    }

    #[rstest]
    #[tokio::test]
    async fn insert_update_remove_round_trip(store: InMemoryDashboardStore) {
        store
            .insert(&new_invoice(LEE, 12_345))
            .await
            .expect("insert");
        let created = InvoiceRepository::list_filtered(&store, &InvoiceFilter::new("12345", 1))
            .await
            .expect("search")
            .pop()
            .expect("created invoice");

        let changes = InvoiceChanges {
            customer_id: created.customer_id.clone(),
            amount: AmountCents::new(99).expect("amount"),
            status: InvoiceStatus::Paid,
        };
        store.update(&created.id, &changes).await.expect("update");
        let stored = store
            .find_by_id(&created.id)
            .await
            .expect("lookup")
            .expect("still present");
        assert_eq!(stored.amount.cents(), 99);
        assert_eq!(stored.date, NaiveDate::from_ymd_opt(2024, 1, 2).expect("date"));

        store.remove(&created.id).await.expect("remove");
        let err = store.remove(&created.id).await.expect_err("already gone");
        assert_eq!(err, InvoiceRepositoryError::missing(created.id.as_ref()));
    }

    #[rstest]
    #[tokio::test]
    async fn customer_totals_split_by_status(store: InMemoryDashboardStore) {
        let rows = CustomerRepository::list_filtered(&store, "lee")
            .await
            .expect("customers");
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].total_invoices, 2);
        assert_eq!(rows[0].total_pending, 54_246);
        assert_eq!(rows[0].total_paid, 1_000);
        assert_eq!(rows[0].formatted_total_pending, "$542.46");
    }

    #[rstest]
    #[tokio::test]
    async fn overview_aggregates(store: InMemoryDashboardStore) {
        let cards = store.card_data().await.expect("cards");
        assert_eq!(cards.number_of_customers, 6);
        assert_eq!(cards.number_of_invoices, 13);
        assert_eq!(cards.total_pending, 15_795 + 20_348 + 34_577 + 54_246 + 666);

        let latest = store.latest_invoices().await.expect("latest");
        assert_eq!(latest.len(), 5);
        assert_eq!(latest[0].name, "Michael Novotny");

        assert_eq!(store.revenue().await.expect("revenue").len(), 12);
    }

    #[rstest]
    #[tokio::test]
    async fn totals_saturate_instead_of_wrapping(store: InMemoryDashboardStore) {
        for _ in 0..2 {
            store
                .insert(&new_invoice(LEE, i64::MAX))
                .await
                .expect("insert");
        }

        let cards = store.card_data().await.expect("cards");
        assert_eq!(cards.total_pending, i64::MAX);
        let rows = CustomerRepository::list_filtered(&store, "lee")
            .await
            .expect("customers");
        assert_eq!(rows[0].total_pending, i64::MAX);
    }
}
