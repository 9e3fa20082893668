//! End-to-end invoice flow over HTTP against the seeded in-memory store.
//!
//! Covers sign-in, the invoice listing, and each mutation, checking that a
//! successful mutation evicts the cached listing.

use std::sync::Arc;

use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::cookie::{Cookie, Key};
use actix_web::http::{StatusCode, header};
use actix_web::{App, test, web};
use mockable::{Clock, DefaultClock};
use rstest::rstest;
use serde_json::{Value, json};

use dashboard::Trace;
use dashboard::domain::ports::{FIXTURE_LOGIN_EMAIL, FIXTURE_LOGIN_PASSWORD, FixtureLoginService};
use dashboard::domain::{
    CustomerQueryService, EditFormCache, InvoiceMutationService, InvoiceQueryService, ListingCache,
    OverviewService, DEFAULT_OVERVIEW_DEADLINE, RawInvoiceForm,
};
use dashboard::inbound::http::auth::{login, logout};
use dashboard::inbound::http::invoices::{
    create_invoice, delete_invoice, get_invoice, list_invoices, update_invoice,
};
use dashboard::inbound::http::session_config::SESSION_COOKIE_NAME;
use dashboard::inbound::http::state::HttpState;
use dashboard::outbound::cache::{InMemoryRouteCache, RouteInvalidationBus};
use dashboard::outbound::memory::InMemoryDashboardStore;

const LEE_ROBINSON: &str = "3958dc9e-742f-4377-85e9-fec4b6a6442a";

fn seeded_state() -> web::Data<HttpState> {
    let store = Arc::new(InMemoryDashboardStore::seeded());
    let bus = Arc::new(RouteInvalidationBus::new());
    let listings: ListingCache = Arc::new(InMemoryRouteCache::new(Arc::clone(&bus)));
    let edit_forms: EditFormCache = Arc::new(InMemoryRouteCache::new(Arc::clone(&bus)));
    let clock: Arc<dyn Clock> = Arc::new(DefaultClock);

    web::Data::new(HttpState {
        login: Arc::new(FixtureLoginService),
        invoices: Arc::new(InvoiceMutationService::new(Arc::clone(&store), bus, clock)),
        invoice_query: Arc::new(InvoiceQueryService::new(
            Arc::clone(&store),
            listings,
            edit_forms,
        )),
        customers: Arc::new(CustomerQueryService::new(Arc::clone(&store))),
        overview: Arc::new(OverviewService::new(store, DEFAULT_OVERVIEW_DEADLINE)),
    })
}

macro_rules! dashboard_app {
    () => {
        test::init_service(
            App::new().app_data(seeded_state()).wrap(Trace).service(
                web::scope("/api/v1")
                    .wrap(
                        SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
                            .cookie_name(SESSION_COOKIE_NAME.to_owned())
                            .cookie_secure(false)
                            .build(),
                    )
                    .service(login)
                    .service(logout)
                    .service(list_invoices)
                    .service(create_invoice)
                    .service(get_invoice)
                    .service(update_invoice)
                    .service(delete_invoice),
            ),
        )
        .await
    };
}

macro_rules! sign_in {
    ($app:expr) => {{
        let response = test::call_service(
            $app,
            test::TestRequest::post()
                .uri("/api/v1/login")
                .set_json(json!({
                    "email": FIXTURE_LOGIN_EMAIL,
                    "password": FIXTURE_LOGIN_PASSWORD,
                }))
                .to_request(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
        response
            .response()
            .cookies()
            .find(|cookie| cookie.name() == SESSION_COOKIE_NAME)
            .map(Cookie::into_owned)
            .expect("session cookie")
    }};
}

macro_rules! first_page {
    ($app:expr, $cookie:expr) => {{
        let response = test::call_service(
            $app,
            test::TestRequest::get()
                .uri("/api/v1/invoices")
                .cookie($cookie.clone())
                .to_request(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
        let page: Value = test::read_body_json(response).await;
        page
    }};
}

#[actix_web::test]
async fn invoice_routes_require_a_session() {
    let app = dashboard_app!();
    let response = test::call_service(
        &app,
        test::TestRequest::get().uri("/api/v1/invoices").to_request(),
    )
    .await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body: Value = test::read_body_json(response).await;
    assert_eq!(body["code"], "unauthorized");
}

#[rstest]
#[case("user@nextmail.com", "wrong-password")]
#[case("someone@else.com", "123456")]
#[case("not-an-email", "123456")]
#[actix_web::test]
async fn bad_credentials_are_rejected(#[case] email: &str, #[case] password: &str) {
    let app = dashboard_app!();
    let response = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/v1/login")
            .set_json(json!({ "email": email, "password": password }))
            .to_request(),
    )
    .await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body: Value = test::read_body_json(response).await;
    assert_eq!(body["message"], "Invalid credentials.");
}

#[actix_web::test]
async fn create_update_delete_round_trip() {
    let app = dashboard_app!();
    let cookie = sign_in!(&app);

    let before = first_page!(&app, cookie);
    assert_eq!(before["page"], 1);
    let seeded_first = before["invoices"][0]["id"].clone();

    let created = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/v1/invoices")
            .cookie(cookie.clone())
            .set_form(RawInvoiceForm::new(LEE_ROBINSON, "125.50", "pending"))
            .to_request(),
    )
    .await;
    assert_eq!(created.status(), StatusCode::SEE_OTHER);
    assert_eq!(
        created
            .headers()
            .get(header::LOCATION)
            .and_then(|value| value.to_str().ok()),
        Some("/invoices")
    );

    let after_create = first_page!(&app, cookie);
    let newest = &after_create["invoices"][0];
    assert_ne!(newest["id"], seeded_first);
    assert_eq!(newest["amount"], 12_550);
    assert_eq!(newest["status"], "pending");
    assert_eq!(newest["name"], "Lee Robinson");
    let id = newest["id"].as_str().expect("invoice id").to_owned();

    let updated = test::call_service(
        &app,
        test::TestRequest::put()
            .uri(&format!("/api/v1/invoices/{id}"))
            .cookie(cookie.clone())
            .set_form(RawInvoiceForm::new(LEE_ROBINSON, "99", "paid"))
            .to_request(),
    )
    .await;
    assert_eq!(updated.status(), StatusCode::SEE_OTHER);

    let edit = test::call_service(
        &app,
        test::TestRequest::get()
            .uri(&format!("/api/v1/invoices/{id}"))
            .cookie(cookie.clone())
            .to_request(),
    )
    .await;
    assert_eq!(edit.status(), StatusCode::OK);
    let view: Value = test::read_body_json(edit).await;
    assert_eq!(view["amount"], 9_900);
    assert_eq!(view["status"], "paid");

    let deleted = test::call_service(
        &app,
        test::TestRequest::delete()
            .uri(&format!("/api/v1/invoices/{id}"))
            .cookie(cookie.clone())
            .to_request(),
    )
    .await;
    assert_eq!(deleted.status(), StatusCode::OK);
    let outcome: Value = test::read_body_json(deleted).await;
    assert_eq!(outcome, json!({ "outcome": "completed" }));

    let after_delete = first_page!(&app, cookie);
    assert_eq!(after_delete["invoices"][0]["id"], seeded_first);

    let gone = test::call_service(
        &app,
        test::TestRequest::get()
            .uri(&format!("/api/v1/invoices/{id}"))
            .cookie(cookie)
            .to_request(),
    )
    .await;
    assert_eq!(gone.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn invalid_form_reports_field_errors_and_stores_nothing() {
    let app = dashboard_app!();
    let cookie = sign_in!(&app);
    let before = first_page!(&app, cookie);

    let response = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/v1/invoices")
            .cookie(cookie.clone())
            .set_form(RawInvoiceForm::new("", "-4", "overdue"))
            .to_request(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body: Value = test::read_body_json(response).await;
    assert_eq!(body["outcome"], "fieldErrors");
    for field in ["customerId", "amount", "status"] {
        assert!(body["errors"][field].is_array(), "missing errors for {field}");
    }

    let after = first_page!(&app, cookie);
    assert_eq!(before, after);
}

#[actix_web::test]
async fn logout_ends_the_session() {
    let app = dashboard_app!();
    let cookie = sign_in!(&app);

    let response = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/v1/logout")
            .cookie(cookie)
            .to_request(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    let cleared = response
        .response()
        .cookies()
        .find(|cookie| cookie.name() == SESSION_COOKIE_NAME)
        .map(Cookie::into_owned)
        .expect("cleared cookie");

    let listing = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/api/v1/invoices")
            .cookie(cleared)
            .to_request(),
    )
    .await;
    assert_eq!(listing.status(), StatusCode::UNAUTHORIZED);
}
