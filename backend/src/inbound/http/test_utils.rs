//! Test helpers for inbound HTTP components.

use std::sync::Arc;

use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::cookie::{Cookie, Key};
use actix_web::dev::ServiceResponse;
use actix_web::{HttpResponse, web};

use super::session::SessionContext;
use super::session_config::SESSION_COOKIE_NAME;
use super::state::HttpState;
use crate::domain::ports::{
    FIXTURE_LOGIN_EMAIL, FIXTURE_LOGIN_USER_ID, MockCustomerQuery, MockInvoiceCommand,
    MockInvoiceQuery, MockLoginService, MockOverviewQuery,
};
use crate::domain::{Error, SessionGrant, UserId};

/// Session middleware with a throwaway key and an insecure cookie, so plain
/// HTTP test requests carry it.
pub fn test_session_middleware() -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
        .cookie_name(SESSION_COOKIE_NAME.to_owned())
        .cookie_secure(false)
        .build()
}

/// The session cookie set on `response`.
pub fn session_cookie<B>(response: &ServiceResponse<B>) -> Cookie<'static> {
    response
        .response()
        .cookies()
        .find(|cookie| cookie.name() == SESSION_COOKIE_NAME)
        .map(Cookie::into_owned)
        .expect("session cookie set")
}

/// Mock port bundle; set expectations, then convert into handler state.
#[derive(Default)]
pub struct TestPorts {
    pub login: MockLoginService,
    pub invoices: MockInvoiceCommand,
    pub invoice_query: MockInvoiceQuery,
    pub customers: MockCustomerQuery,
    pub overview: MockOverviewQuery,
}

impl TestPorts {
    pub fn into_state(self) -> web::Data<HttpState> {
        web::Data::new(HttpState {
            login: Arc::new(self.login),
            invoices: Arc::new(self.invoices),
            invoice_query: Arc::new(self.invoice_query),
            customers: Arc::new(self.customers),
            overview: Arc::new(self.overview),
        })
    }
}

/// Test-only route that signs in the fixture user.
pub async fn sign_in(session: SessionContext) -> Result<HttpResponse, Error> {
    let grant = SessionGrant {
        user_id: UserId::new(FIXTURE_LOGIN_USER_ID)
            .map_err(|err| Error::internal(err.to_string()))?,
        name: "User".to_owned(),
        email: FIXTURE_LOGIN_EMAIL.to_owned(),
    };
    session.persist_grant(&grant)?;
    Ok(HttpResponse::NoContent().finish())
}

/// Path the [`sign_in`] route is mounted on by handler tests.
pub const SIGN_IN_PATH: &str = "/test/sign-in";

/// Call [`SIGN_IN_PATH`] on an initialised test service and return the
/// session cookie.
macro_rules! signed_in_cookie {
    ($app:expr) => {{
        let response = actix_web::test::call_service(
            $app,
            actix_web::test::TestRequest::post()
                .uri($crate::inbound::http::test_utils::SIGN_IN_PATH)
                .to_request(),
        )
        .await;
        $crate::inbound::http::test_utils::session_cookie(&response)
    }};
}
pub(crate) use signed_in_cookie;
