//! Customer read models. Customers are never written by the dashboard.

use serde::Serialize;
use utoipa::ToSchema;

use super::CustomerId;

/// Entry in the customer selector of the invoice form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CustomerOption {
    #[schema(value_type = String, example = "3958dc9e-712f-4377-85e9-fec4b6a6442a")]
    pub id: CustomerId,
    #[schema(example = "Delba de Oliveira")]
    pub name: String,
}

/// Customer row in the customers table, with invoice totals in cents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CustomerSummary {
    #[schema(value_type = String)]
    pub id: CustomerId,
    pub name: String,
    pub email: String,
    pub image_url: String,
    pub total_invoices: i64,
    pub total_pending: i64,
    pub total_paid: i64,
    pub formatted_total_pending: String,
    pub formatted_total_paid: String,
}
