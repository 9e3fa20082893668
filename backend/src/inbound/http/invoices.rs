//! Invoice listing, edit view and mutation handlers.
//!
//! ```text
//! GET    /api/v1/invoices?query=lee&page=2
//! POST   /api/v1/invoices        customerId=..&amount=125.50&status=pending
//! GET    /api/v1/invoices/{id}
//! PUT    /api/v1/invoices/{id}   customerId=..&amount=..&status=paid
//! DELETE /api/v1/invoices/{id}
//! ```
//!
//! Mutations accept `application/x-www-form-urlencoded` bodies and answer
//! with the tagged outcome; the status code mirrors the outcome variant.

use actix_web::http::header;
use actix_web::{HttpResponse, delete, get, post, put, web};
use serde::Deserialize;
use utoipa::IntoParams;

use crate::domain::ports::InvoiceFilter;
use crate::domain::{
    Error, InvoiceEditView, InvoiceId, InvoicePage, MutationOutcome, RawInvoiceForm,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

/// Query string of the listing.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct InvoiceListParams {
    /// Search text; blank lists everything.
    #[serde(default)]
    pub query: String,
    /// One-based page. Anything that is not a positive number means page 1.
    pub page: Option<String>,
}

impl InvoiceListParams {
    fn into_filter(self) -> InvoiceFilter {
        let page = self
            .page
            .and_then(|raw| raw.trim().parse::<u32>().ok())
            .unwrap_or(1);
        InvoiceFilter::new(self.query, page)
    }
}

fn invoice_id(raw: String) -> Result<InvoiceId, Error> {
    InvoiceId::new(raw).map_err(|err| Error::invalid_request(err.to_string()))
}

fn outcome_response(outcome: MutationOutcome) -> HttpResponse {
    let mut builder = match &outcome {
        MutationOutcome::Redirect { target } => {
            let mut builder = HttpResponse::SeeOther();
            builder.insert_header((header::LOCATION, target.as_str()));
            builder
        }
        MutationOutcome::FieldErrors { .. } => HttpResponse::UnprocessableEntity(),
        MutationOutcome::Failure { .. } => HttpResponse::InternalServerError(),
        MutationOutcome::Completed => HttpResponse::Ok(),
    };
    builder.json(outcome)
}

/// One page of invoices, newest first.
#[utoipa::path(
    get,
    path = "/api/v1/invoices",
    params(InvoiceListParams),
    responses(
        (status = 200, description = "Invoice page", body = InvoicePage),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 503, description = "Store unavailable", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["invoices"],
    operation_id = "listInvoices"
)]
#[get("/invoices")]
pub async fn list_invoices(
    state: web::Data<HttpState>,
    session: SessionContext,
    params: web::Query<InvoiceListParams>,
) -> ApiResult<web::Json<InvoicePage>> {
    session.require_user_id()?;
    let page = state
        .invoice_query
        .list_invoices(params.into_inner().into_filter())
        .await?;
    Ok(web::Json(page))
}

/// Create an invoice dated today.
#[utoipa::path(
    post,
    path = "/api/v1/invoices",
    request_body(content = RawInvoiceForm, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 303, description = "Created; Location names the listing", body = MutationOutcome),
        (status = 422, description = "Field errors", body = MutationOutcome),
        (status = 500, description = "Store failure", body = MutationOutcome),
        (status = 401, description = "Unauthorised", body = Error)
    ),
    tags = ["invoices"],
    operation_id = "createInvoice"
)]
#[post("/invoices")]
pub async fn create_invoice(
    state: web::Data<HttpState>,
    session: SessionContext,
    form: web::Form<RawInvoiceForm>,
) -> ApiResult<HttpResponse> {
    session.require_user_id()?;
    let outcome = state.invoices.create_invoice(form.into_inner()).await;
    Ok(outcome_response(outcome))
}

/// Current values of one invoice for the edit form.
#[utoipa::path(
    get,
    path = "/api/v1/invoices/{id}",
    params(("id" = String, Path, description = "Invoice id")),
    responses(
        (status = 200, description = "Edit form values", body = InvoiceEditView),
        (status = 404, description = "No such invoice", body = Error),
        (status = 401, description = "Unauthorised", body = Error)
    ),
    tags = ["invoices"],
    operation_id = "getInvoice"
)]
#[get("/invoices/{id}")]
pub async fn get_invoice(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<web::Json<InvoiceEditView>> {
    session.require_user_id()?;
    let id = invoice_id(path.into_inner())?;
    state
        .invoice_query
        .invoice_for_edit(&id)
        .await?
        .map(web::Json)
        .ok_or_else(|| Error::not_found(format!("invoice {id} not found")))
}

/// Replace an invoice's customer, amount and status.
#[utoipa::path(
    put,
    path = "/api/v1/invoices/{id}",
    params(("id" = String, Path, description = "Invoice id")),
    request_body(content = RawInvoiceForm, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 303, description = "Updated; Location names the listing", body = MutationOutcome),
        (status = 422, description = "Field errors", body = MutationOutcome),
        (status = 500, description = "Store failure", body = MutationOutcome),
        (status = 401, description = "Unauthorised", body = Error)
    ),
    tags = ["invoices"],
    operation_id = "updateInvoice"
)]
#[put("/invoices/{id}")]
pub async fn update_invoice(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
    form: web::Form<RawInvoiceForm>,
) -> ApiResult<HttpResponse> {
    session.require_user_id()?;
    let id = invoice_id(path.into_inner())?;
    let outcome = state.invoices.update_invoice(id, form.into_inner()).await;
    Ok(outcome_response(outcome))
}

/// Delete an invoice.
#[utoipa::path(
    delete,
    path = "/api/v1/invoices/{id}",
    params(("id" = String, Path, description = "Invoice id")),
    responses(
        (status = 200, description = "Deleted", body = MutationOutcome),
        (status = 500, description = "Store failure", body = MutationOutcome),
        (status = 401, description = "Unauthorised", body = Error)
    ),
    tags = ["invoices"],
    operation_id = "deleteInvoice"
)]
#[delete("/invoices/{id}")]
pub async fn delete_invoice(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    session.require_user_id()?;
    let id = invoice_id(path.into_inner())?;
    Ok(outcome_response(state.invoices.delete_invoice(id).await))
}

#[cfg(test)]
#[path = "invoices_tests.rs"]
mod tests;
