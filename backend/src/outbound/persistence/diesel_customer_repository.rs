//! PostgreSQL-backed `CustomerRepository` implementation using Diesel ORM.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel::sql_query;
use diesel::sql_types::Text;
use diesel_async::RunQueryDsl;
use uuid::Uuid;

use crate::domain::ports::{CustomerRepository, CustomerRepositoryError};
use crate::domain::{CustomerId, CustomerOption, CustomerSummary, format_currency};

use super::diesel_basic_error_mapping::{
    contains_pattern, map_basic_diesel_error, map_basic_pool_error,
};
use super::models::CustomerTotalsRow;
use super::pool::{DbPool, PoolError};
use super::schema::customers;

const CUSTOMER_TOTALS_SQL: &str = "SELECT customers.id, customers.name, customers.email, \
    customers.image_url, \
    COUNT(invoices.id) AS total_invoices, \
    COALESCE(SUM(CASE WHEN invoices.status = 'pending' THEN invoices.amount ELSE 0 END), 0)::bigint \
        AS total_pending, \
    COALESCE(SUM(CASE WHEN invoices.status = 'paid' THEN invoices.amount ELSE 0 END), 0)::bigint \
        AS total_paid \
    FROM customers LEFT JOIN invoices ON customers.id = invoices.customer_id \
    WHERE customers.name ILIKE $1 OR customers.email ILIKE $1 \
    GROUP BY customers.id, customers.name, customers.email, customers.image_url \
    ORDER BY customers.name ASC";

/// Diesel-backed implementation of the customer repository port.
#[derive(Clone)]
pub struct DieselCustomerRepository {
    pool: DbPool,
}

impl DieselCustomerRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> CustomerRepositoryError {
    map_basic_pool_error(error, CustomerRepositoryError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> CustomerRepositoryError {
    map_basic_diesel_error(
        error,
        CustomerRepositoryError::query,
        CustomerRepositoryError::connection,
    )
}

fn customer_id(id: Uuid) -> Result<CustomerId, CustomerRepositoryError> {
    CustomerId::new(id.to_string())
        .map_err(|err| CustomerRepositoryError::query(format!("stored customer id: {err}")))
}

fn row_to_summary(row: CustomerTotalsRow) -> Result<CustomerSummary, CustomerRepositoryError> {
    Ok(CustomerSummary {
        id: customer_id(row.id)?,
        name: row.name,
        email: row.email,
        image_url: row.image_url,
        total_invoices: row.total_invoices,
        total_pending: row.total_pending,
        total_paid: row.total_paid,
        formatted_total_pending: format_currency(row.total_pending),
        formatted_total_paid: format_currency(row.total_paid),
    })
}

#[async_trait]
impl CustomerRepository for DieselCustomerRepository {
    async fn list_options(&self) -> Result<Vec<CustomerOption>, CustomerRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<(Uuid, String)> = customers::table
            .select((customers::id, customers::name))
            .order_by(customers::name.asc())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        rows.into_iter()
            .map(|(id, name)| {
                Ok(CustomerOption {
                    id: customer_id(id)?,
                    name,
                })
            })
            .collect()
    }

    async fn list_filtered(
        &self,
        query: &str,
    ) -> Result<Vec<CustomerSummary>, CustomerRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<CustomerTotalsRow> = sql_query(CUSTOMER_TOTALS_SQL)
            .bind::<Text, _>(contains_pattern(query))
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        rows.into_iter().map(row_to_summary).collect()
    }
}
