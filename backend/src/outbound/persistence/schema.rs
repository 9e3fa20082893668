//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match the database migrations exactly. They are used
//! by Diesel for compile-time query validation and type-safe SQL generation.
//!
//! # Maintenance
//!
//! When migrations change the schema, this file should be regenerated or
//! manually updated to reflect those changes. The `diesel print-schema`
//! command can generate these definitions from a live database.

diesel::table! {
    /// Accounts allowed to sign in to the dashboard.
    users (id) {
        id -> Uuid,
        name -> Varchar,
        /// Unique login email, matched exactly.
        email -> Text,
        /// Argon2 PHC string.
        password -> Text,
    }
}

diesel::table! {
    /// Customers referenced by invoices. Read-only for the dashboard.
    customers (id) {
        id -> Uuid,
        name -> Varchar,
        email -> Varchar,
        image_url -> Varchar,
    }
}

diesel::table! {
    /// Invoices with amounts in cents.
    invoices (id) {
        id -> Uuid,
        customer_id -> Uuid,
        /// Positive amount in cents.
        amount -> Int8,
        /// Either `pending` or `paid`.
        status -> Varchar,
        date -> Date,
    }
}

diesel::table! {
    /// Monthly revenue figures in whole dollars.
    revenue (month_index) {
        /// Calendar position, 1 for January.
        month_index -> Int2,
        month -> Varchar,
        /// Whole dollars, stored in the `revenue` column.
        #[sql_name = "revenue"]
        amount -> Int4,
    }
}

diesel::joinable!(invoices -> customers (customer_id));

diesel::allow_tables_to_appear_in_same_query!(customers, invoices, revenue, users);
