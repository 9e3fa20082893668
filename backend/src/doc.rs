//! OpenAPI documentation for the dashboard REST API.
//!
//! The document backs Swagger UI in debug builds and is exported with
//! `cargo run --bin openapi-dump`.

use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::domain::{
    CardData, CustomerOption, CustomerSummary, Error, ErrorCode, InvoiceEditView, InvoiceListing,
    InvoicePage, InvoiceStatus, LatestInvoice, MonthlyRevenue, MutationOutcome, OverviewRegion,
    OverviewSnapshot, RawInvoiceForm, RegionData, RegionFrame, RegionState, SessionGrant,
};
use crate::inbound::http::auth::LoginRequest;
use crate::inbound::http::session_config::SESSION_COOKIE_NAME;

/// Adds the session cookie security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "SessionCookie",
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::with_description(
                SESSION_COOKIE_NAME,
                "Session cookie issued by POST /api/v1/login.",
            ))),
        );
    }
}

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Invoice dashboard API",
        description = "Session-authenticated invoice management, customer totals and the dashboard overview."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("SessionCookie" = [])),
    paths(
        crate::inbound::http::auth::login,
        crate::inbound::http::auth::logout,
        crate::inbound::http::invoices::list_invoices,
        crate::inbound::http::invoices::create_invoice,
        crate::inbound::http::invoices::get_invoice,
        crate::inbound::http::invoices::update_invoice,
        crate::inbound::http::invoices::delete_invoice,
        crate::inbound::http::customers::list_customers,
        crate::inbound::http::customers::customer_options,
        crate::inbound::http::dashboard::overview,
        crate::inbound::http::dashboard::overview_stream,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        Error,
        ErrorCode,
        LoginRequest,
        SessionGrant,
        RawInvoiceForm,
        MutationOutcome,
        InvoiceStatus,
        InvoiceListing,
        InvoicePage,
        InvoiceEditView,
        CustomerOption,
        CustomerSummary,
        CardData,
        MonthlyRevenue,
        LatestInvoice,
        OverviewRegion,
        RegionData,
        RegionState,
        RegionFrame,
        OverviewSnapshot,
    )),
    tags(
        (name = "auth", description = "Sign in and out"),
        (name = "invoices", description = "Invoice listing and mutations"),
        (name = "customers", description = "Customer totals and selector options"),
        (name = "dashboard", description = "Overview regions"),
        (name = "health", description = "Probes")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;
    use utoipa::openapi::path::HttpMethod;
    use utoipa::openapi::{RefOr, schema::Schema};

    fn schema<'a>(doc: &'a utoipa::openapi::OpenApi, name: &str) -> &'a RefOr<Schema> {
        doc.components
            .as_ref()
            .expect("components")
            .schemas
            .get(name)
            .unwrap_or_else(|| panic!("schema {name} registered"))
    }

    #[test]
    fn error_schema_exposes_code_and_message() {
        let doc = ApiDoc::openapi();
        let RefOr::T(Schema::Object(error)) = schema(&doc, "Error") else {
            panic!("Error should be an object schema");
        };
        assert!(error.properties.contains_key("code"));
        assert!(error.properties.contains_key("message"));
    }

    #[test]
    fn every_route_is_documented() {
        let doc = ApiDoc::openapi();
        for (path, method) in [
            ("/api/v1/login", HttpMethod::Post),
            ("/api/v1/logout", HttpMethod::Post),
            ("/api/v1/invoices", HttpMethod::Get),
            ("/api/v1/invoices", HttpMethod::Post),
            ("/api/v1/invoices/{id}", HttpMethod::Get),
            ("/api/v1/invoices/{id}", HttpMethod::Put),
            ("/api/v1/invoices/{id}", HttpMethod::Delete),
            ("/api/v1/customers", HttpMethod::Get),
            ("/api/v1/customers/options", HttpMethod::Get),
            ("/api/v1/dashboard/overview", HttpMethod::Get),
            ("/api/v1/dashboard/overview/stream", HttpMethod::Get),
        ] {
            let item = doc
                .paths
                .get_path_item(path)
                .unwrap_or_else(|| panic!("{path} documented"));
            let operation = match method {
                HttpMethod::Get => item.get.as_ref(),
                HttpMethod::Post => item.post.as_ref(),
                HttpMethod::Put => item.put.as_ref(),
                HttpMethod::Delete => item.delete.as_ref(),
                _ => None,
            };
            assert!(operation.is_some(), "{path} operation documented");
        }
    }

    #[test]
    fn session_cookie_scheme_uses_the_cookie_name() {
        let doc = ApiDoc::openapi();
        let json = serde_json::to_value(&doc).expect("serialise document");
        assert_eq!(
            json["components"]["securitySchemes"]["SessionCookie"]["name"],
            SESSION_COOKIE_NAME
        );
    }
}
