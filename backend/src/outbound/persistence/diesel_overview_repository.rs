//! PostgreSQL-backed `OverviewRepository` implementation using Diesel ORM.
//!
//! One method per overview region so regions can be fetched and fail
//! independently.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel::sql_query;
use diesel_async::RunQueryDsl;
use uuid::Uuid;

use crate::domain::ports::{LATEST_INVOICES_LIMIT, OverviewRepository, OverviewRepositoryError};
use crate::domain::{
    AmountCents, CardData, InvoiceId, LatestInvoice, MonthlyRevenue, format_currency,
};

use super::diesel_basic_error_mapping::{map_basic_diesel_error, map_basic_pool_error};
use super::models::{RevenueRow, StatusTotalsRow};
use super::pool::{DbPool, PoolError};
use super::schema::{customers, invoices, revenue};

const STATUS_TOTALS_SQL: &str = "SELECT \
    COALESCE(SUM(CASE WHEN status = 'paid' THEN amount ELSE 0 END), 0)::bigint AS paid, \
    COALESCE(SUM(CASE WHEN status = 'pending' THEN amount ELSE 0 END), 0)::bigint AS pending \
    FROM invoices";

/// Diesel-backed implementation of the overview repository port.
#[derive(Clone)]
pub struct DieselOverviewRepository {
    pool: DbPool,
}

impl DieselOverviewRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> OverviewRepositoryError {
    map_basic_pool_error(error, OverviewRepositoryError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> OverviewRepositoryError {
    map_basic_diesel_error(
        error,
        OverviewRepositoryError::query,
        OverviewRepositoryError::connection,
    )
}

type LatestRow = (Uuid, String, String, String, i64);

fn row_to_latest(row: LatestRow) -> Result<LatestInvoice, OverviewRepositoryError> {
    let (id, name, email, image_url, amount) = row;
    let id = InvoiceId::new(id.to_string())
        .map_err(|err| OverviewRepositoryError::query(format!("stored invoice id: {err}")))?;
    let amount = AmountCents::new(amount)
        .map_err(|err| OverviewRepositoryError::query(format!("stored invoice amount: {err}")))?;
    Ok(LatestInvoice {
        id,
        name,
        email,
        image_url,
        amount,
        formatted_amount: format_currency(amount.cents()),
    })
}

#[async_trait]
impl OverviewRepository for DieselOverviewRepository {
    async fn card_data(&self) -> Result<CardData, OverviewRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let number_of_customers: i64 = customers::table
            .count()
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        let number_of_invoices: i64 = invoices::table
            .count()
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        let totals: StatusTotalsRow = sql_query(STATUS_TOTALS_SQL)
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(CardData {
            number_of_customers,
            number_of_invoices,
            total_paid: totals.paid,
            total_pending: totals.pending,
            formatted_total_paid: format_currency(totals.paid),
            formatted_total_pending: format_currency(totals.pending),
        })
    }

    async fn revenue(&self) -> Result<Vec<MonthlyRevenue>, OverviewRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<RevenueRow> = revenue::table
            .select(RevenueRow::as_select())
            .order_by(revenue::month_index.asc())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(rows
            .into_iter()
            .map(|row| MonthlyRevenue {
                month: row.month,
                revenue: row.revenue,
            })
            .collect())
    }

    async fn latest_invoices(&self) -> Result<Vec<LatestInvoice>, OverviewRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<LatestRow> = invoices::table
            .inner_join(customers::table)
            .select((
                invoices::id,
                customers::name,
                customers::email,
                customers::image_url,
                invoices::amount,
            ))
            .order_by(invoices::date.desc())
            .limit(LATEST_INVOICES_LIMIT)
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        rows.into_iter().map(row_to_latest).collect()
    }
}
