//! Internal Diesel row structs for database operations.
//!
//! These types are implementation details of the persistence layer and must
//! never be exposed to the domain. They exist solely to satisfy Diesel's
//! type requirements for queries and mutations.

use chrono::NaiveDate;
use diesel::prelude::*;
use diesel::sql_types::{BigInt, Date, Text, Uuid as SqlUuid};
use uuid::Uuid;

use super::schema::{invoices, revenue, users};

// ---------------------------------------------------------------------------
// Invoice models
// ---------------------------------------------------------------------------

/// Row struct for reading from the invoices table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = invoices)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct InvoiceRow {
    pub id: Uuid,
    pub customer_id: Uuid,
    pub amount: i64,
    pub status: String,
    pub date: NaiveDate,
}

/// Insertable struct for new invoices. The id is assigned by the database.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = invoices)]
pub(crate) struct NewInvoiceRow<'a> {
    pub customer_id: Uuid,
    pub amount: i64,
    pub status: &'a str,
    pub date: NaiveDate,
}

/// Changeset for the update path. The issue date is never rewritten.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = invoices)]
pub(crate) struct InvoiceChangeset<'a> {
    pub customer_id: Uuid,
    pub amount: i64,
    pub status: &'a str,
}

/// Invoice joined with its customer, as returned by the listing search.
#[derive(Debug, Clone, QueryableByName)]
pub(crate) struct InvoiceListingRow {
    #[diesel(sql_type = SqlUuid)]
    pub id: Uuid,
    #[diesel(sql_type = SqlUuid)]
    pub customer_id: Uuid,
    #[diesel(sql_type = Text)]
    pub name: String,
    #[diesel(sql_type = Text)]
    pub email: String,
    #[diesel(sql_type = Text)]
    pub image_url: String,
    #[diesel(sql_type = BigInt)]
    pub amount: i64,
    #[diesel(sql_type = Text)]
    pub status: String,
    #[diesel(sql_type = Date)]
    pub date: NaiveDate,
}

/// Count row for raw SQL queries.
#[derive(Debug, Clone, Copy, QueryableByName)]
pub(crate) struct CountRow {
    #[diesel(sql_type = BigInt)]
    pub count: i64,
}

// ---------------------------------------------------------------------------
// Customer and overview models
// ---------------------------------------------------------------------------

/// Customer with invoice totals, as returned by the customers search.
#[derive(Debug, Clone, QueryableByName)]
pub(crate) struct CustomerTotalsRow {
    #[diesel(sql_type = SqlUuid)]
    pub id: Uuid,
    #[diesel(sql_type = Text)]
    pub name: String,
    #[diesel(sql_type = Text)]
    pub email: String,
    #[diesel(sql_type = Text)]
    pub image_url: String,
    #[diesel(sql_type = BigInt)]
    pub total_invoices: i64,
    #[diesel(sql_type = BigInt)]
    pub total_pending: i64,
    #[diesel(sql_type = BigInt)]
    pub total_paid: i64,
}

/// Paid and pending sums across every invoice.
#[derive(Debug, Clone, Copy, QueryableByName)]
pub(crate) struct StatusTotalsRow {
    #[diesel(sql_type = BigInt)]
    pub paid: i64,
    #[diesel(sql_type = BigInt)]
    pub pending: i64,
}

/// Row struct for reading from the revenue table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = revenue)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct RevenueRow {
    pub month: String,
    #[diesel(column_name = amount)]
    pub revenue: i32,
}

// ---------------------------------------------------------------------------
// Account models
// ---------------------------------------------------------------------------

/// Row struct for reading from the users table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct AccountRow {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub password: String,
}

/// Insertable struct for creating accounts.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = users)]
pub(crate) struct NewAccountRow<'a> {
    pub id: Uuid,
    pub name: &'a str,
    pub email: &'a str,
    pub password: &'a str,
}
