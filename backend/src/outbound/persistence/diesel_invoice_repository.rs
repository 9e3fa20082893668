//! PostgreSQL-backed `InvoiceRepository` implementation using Diesel ORM.
//!
//! Each mutation is a single parameterised statement. The listing search
//! casts amount and date to text so one pattern matches every visible
//! column, which the query builder cannot express; it runs through
//! `sql_query` with bound parameters instead.

use std::str::FromStr;

use async_trait::async_trait;
use diesel::prelude::*;
use diesel::sql_query;
use diesel::sql_types::{BigInt, Text};
use diesel_async::RunQueryDsl;

use crate::domain::ports::{
    INVOICES_PER_PAGE, InvoiceFilter, InvoiceRepository, InvoiceRepositoryError,
};
use crate::domain::{
    AmountCents, CustomerId, Invoice, InvoiceChanges, InvoiceId, InvoiceListing, InvoiceStatus,
    NewInvoice, format_currency,
};

use super::diesel_basic_error_mapping::{
    contains_pattern, map_basic_diesel_error, map_basic_pool_error, parse_uuid,
};
use super::models::{CountRow, InvoiceChangeset, InvoiceListingRow, InvoiceRow, NewInvoiceRow};
use super::pool::{DbPool, PoolError};
use super::schema::invoices;

const SEARCH_PREDICATE: &str = "customers.name ILIKE $1 \
    OR customers.email ILIKE $1 \
    OR invoices.amount::text ILIKE $1 \
    OR invoices.date::text ILIKE $1 \
    OR invoices.status ILIKE $1";

/// Diesel-backed implementation of the invoice repository port.
#[derive(Clone)]
pub struct DieselInvoiceRepository {
    pool: DbPool,
}

impl DieselInvoiceRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> InvoiceRepositoryError {
    map_basic_pool_error(error, InvoiceRepositoryError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> InvoiceRepositoryError {
    map_basic_diesel_error(
        error,
        InvoiceRepositoryError::query,
        InvoiceRepositoryError::connection,
    )
}

fn customer_key(id: &CustomerId) -> Result<uuid::Uuid, InvoiceRepositoryError> {
    parse_uuid(id.as_ref())
        .ok_or_else(|| InvoiceRepositoryError::query(format!("customer {id} does not exist")))
}

fn corrupt(field: &str, detail: impl std::fmt::Display) -> InvoiceRepositoryError {
    InvoiceRepositoryError::query(format!("stored invoice has invalid {field}: {detail}"))
}

fn decode_ids(
    id: uuid::Uuid,
    customer_id: uuid::Uuid,
) -> Result<(InvoiceId, CustomerId), InvoiceRepositoryError> {
    let id = InvoiceId::new(id.to_string()).map_err(|err| corrupt("id", err))?;
    let customer_id =
        CustomerId::new(customer_id.to_string()).map_err(|err| corrupt("customer id", err))?;
    Ok((id, customer_id))
}

fn decode_amount_and_status(
    amount: i64,
    status: &str,
) -> Result<(AmountCents, InvoiceStatus), InvoiceRepositoryError> {
    let amount = AmountCents::new(amount).map_err(|err| corrupt("amount", err))?;
    let status = InvoiceStatus::from_str(status).map_err(|err| corrupt("status", err))?;
    Ok((amount, status))
}

fn row_to_invoice(row: InvoiceRow) -> Result<Invoice, InvoiceRepositoryError> {
    let (id, customer_id) = decode_ids(row.id, row.customer_id)?;
    let (amount, status) = decode_amount_and_status(row.amount, &row.status)?;
    Ok(Invoice {
        id,
        customer_id,
        amount,
        status,
        date: row.date,
    })
}

fn row_to_listing(row: InvoiceListingRow) -> Result<InvoiceListing, InvoiceRepositoryError> {
    let (id, customer_id) = decode_ids(row.id, row.customer_id)?;
    let (amount, status) = decode_amount_and_status(row.amount, &row.status)?;
    Ok(InvoiceListing {
        id,
        customer_id,
        name: row.name,
        email: row.email,
        image_url: row.image_url,
        amount,
        formatted_amount: format_currency(amount.cents()),
        status,
        date: row.date,
    })
}

#[async_trait]
impl InvoiceRepository for DieselInvoiceRepository {
    async fn insert(&self, invoice: &NewInvoice) -> Result<(), InvoiceRepositoryError> {
        let row = NewInvoiceRow {
            customer_id: customer_key(&invoice.customer_id)?,
            amount: invoice.amount.cents(),
            status: invoice.status.as_str(),
            date: invoice.date,
        };
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        diesel::insert_into(invoices::table)
            .values(&row)
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_diesel_error)
    }

    async fn update(
        &self,
        id: &InvoiceId,
        changes: &InvoiceChanges,
    ) -> Result<(), InvoiceRepositoryError> {
        let Some(key) = parse_uuid(id.as_ref()) else {
            return Err(InvoiceRepositoryError::missing(id.as_ref()));
        };
        let changeset = InvoiceChangeset {
            customer_id: customer_key(&changes.customer_id)?,
            amount: changes.amount.cents(),
            status: changes.status.as_str(),
        };
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let updated = diesel::update(invoices::table.find(key))
            .set(&changeset)
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        if updated == 0 {
            return Err(InvoiceRepositoryError::missing(id.as_ref()));
        }
        Ok(())
    }

    async fn remove(&self, id: &InvoiceId) -> Result<(), InvoiceRepositoryError> {
        let Some(key) = parse_uuid(id.as_ref()) else {
            return Err(InvoiceRepositoryError::missing(id.as_ref()));
        };
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let deleted = diesel::delete(invoices::table.find(key))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        if deleted == 0 {
            return Err(InvoiceRepositoryError::missing(id.as_ref()));
        }
        Ok(())
    }

    async fn find_by_id(&self, id: &InvoiceId) -> Result<Option<Invoice>, InvoiceRepositoryError> {
        let Some(key) = parse_uuid(id.as_ref()) else {
            return Ok(None);
        };
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<InvoiceRow> = invoices::table
            .find(key)
            .select(InvoiceRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(row_to_invoice).transpose()
    }

    async fn list_filtered(
        &self,
        filter: &InvoiceFilter,
    ) -> Result<Vec<InvoiceListing>, InvoiceRepositoryError> {
        let query = format!(
            "SELECT invoices.id, invoices.customer_id, customers.name, customers.email, \
             customers.image_url, invoices.amount, invoices.status, invoices.date \
             FROM invoices JOIN customers ON invoices.customer_id = customers.id \
             WHERE {SEARCH_PREDICATE} \
             ORDER BY invoices.date DESC, invoices.id \
             LIMIT $2 OFFSET $3"
        );
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<InvoiceListingRow> = sql_query(query)
            .bind::<Text, _>(contains_pattern(&filter.query))
            .bind::<BigInt, _>(i64::from(INVOICES_PER_PAGE))
            .bind::<BigInt, _>(filter.offset())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        rows.into_iter().map(row_to_listing).collect()
    }

    async fn count_filtered(&self, filter: &InvoiceFilter) -> Result<i64, InvoiceRepositoryError> {
        let query = format!(
            "SELECT COUNT(*) AS count \
             FROM invoices JOIN customers ON invoices.customer_id = customers.id \
             WHERE {SEARCH_PREDICATE}"
        );
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: CountRow = sql_query(query)
            .bind::<Text, _>(contains_pattern(&filter.query))
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(row.count)
    }
}
