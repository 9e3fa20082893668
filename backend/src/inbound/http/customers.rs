//! Customer table and invoice-form selector.
//!
//! ```text
//! GET /api/v1/customers?query=amy
//! GET /api/v1/customers/options
//! ```

use actix_web::{get, web};
use serde::Deserialize;
use utoipa::IntoParams;

use crate::domain::{CustomerOption, CustomerSummary, Error};
use crate::inbound::http::ApiResult;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct CustomerSearchParams {
    /// Matched against name and email, case-insensitively.
    #[serde(default)]
    pub query: String,
}

/// Customers with their invoice totals.
#[utoipa::path(
    get,
    path = "/api/v1/customers",
    params(CustomerSearchParams),
    responses(
        (status = 200, description = "Customers", body = [CustomerSummary]),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["customers"],
    operation_id = "listCustomers"
)]
#[get("/customers")]
pub async fn list_customers(
    state: web::Data<HttpState>,
    session: SessionContext,
    params: web::Query<CustomerSearchParams>,
) -> ApiResult<web::Json<Vec<CustomerSummary>>> {
    session.require_user_id()?;
    let rows = state.customers.filtered_customers(&params.query).await?;
    Ok(web::Json(rows))
}

/// Id and name of every customer, ordered by name.
#[utoipa::path(
    get,
    path = "/api/v1/customers/options",
    responses(
        (status = 200, description = "Customer options", body = [CustomerOption]),
        (status = 401, description = "Unauthorised", body = Error)
    ),
    tags = ["customers"],
    operation_id = "customerOptions"
)]
#[get("/customers/options")]
pub async fn customer_options(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<Vec<CustomerOption>>> {
    session.require_user_id()?;
    Ok(web::Json(state.customers.customer_options().await?))
}
