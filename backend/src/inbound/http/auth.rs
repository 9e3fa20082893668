//! Login and logout handlers.
//!
//! ```text
//! POST /api/v1/login {"email":"user@nextmail.com","password":"123456"}
//! POST /api/v1/logout
//! ```

use actix_web::{HttpResponse, post, web};
use serde::{Deserialize, Serialize};
use tracing::{debug, error};

use crate::domain::{AuthError, Error, INVALID_CREDENTIALS_MESSAGE, LoginCredentials, SessionGrant};
use crate::inbound::http::ApiResult;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

/// Login request body for `POST /api/v1/login`.
#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    #[schema(example = "user@nextmail.com")]
    pub email: String,
    #[schema(example = "123456")]
    pub password: String,
}

fn map_auth_error(err: AuthError) -> Error {
    match err {
        AuthError::InvalidCredentials => Error::unauthorized(INVALID_CREDENTIALS_MESSAGE),
        AuthError::Unexpected { message } => {
            error!(%message, "login failed unexpectedly");
            Error::internal(format!("authentication failed: {message}"))
        }
    }
}

/// Verify credentials and start a session.
///
/// Malformed credentials get the same answer as wrong ones.
#[utoipa::path(
    post,
    path = "/api/v1/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Signed in", body = SessionGrant,
            headers(("Set-Cookie" = String, description = "Session cookie"))),
        (status = 401, description = "Invalid credentials", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["auth"],
    operation_id = "login",
    security([])
)]
#[post("/login")]
pub async fn login(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<LoginRequest>,
) -> ApiResult<web::Json<SessionGrant>> {
    let LoginRequest { email, password } = payload.into_inner();
    let credentials = LoginCredentials::try_from_parts(&email, &password).map_err(|err| {
        debug!(reason = %err, "rejecting malformed credentials");
        Error::unauthorized(INVALID_CREDENTIALS_MESSAGE)
    })?;
    let grant = state
        .login
        .authenticate(&credentials)
        .await
        .map_err(map_auth_error)?;
    session.persist_grant(&grant)?;
    Ok(web::Json(grant))
}

/// End the current session.
#[utoipa::path(
    post,
    path = "/api/v1/logout",
    responses((status = 204, description = "Signed out")),
    tags = ["auth"],
    operation_id = "logout"
)]
#[post("/logout")]
pub async fn logout(session: SessionContext) -> HttpResponse {
    session.purge();
    HttpResponse::NoContent().finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::{FIXTURE_LOGIN_EMAIL, FIXTURE_LOGIN_USER_ID};
    use crate::domain::{ErrorCode, UserId};
    use crate::inbound::http::test_utils::{TestPorts, session_cookie, test_session_middleware};
    use actix_web::http::StatusCode;
    use actix_web::{App, test};
    use rstest::rstest;
    use serde_json::Value;

    fn grant() -> SessionGrant {
        SessionGrant {
            user_id: UserId::new(FIXTURE_LOGIN_USER_ID).expect("fixture id"),
            name: "User".to_owned(),
            email: FIXTURE_LOGIN_EMAIL.to_owned(),
        }
    }

    macro_rules! auth_app {
        ($ports:expr) => {
            test::init_service(
                App::new()
                    .app_data($ports.into_state())
                    .wrap(test_session_middleware())
                    .service(web::scope("/api/v1").service(login).service(logout)),
            )
            .await
        };
    }

    fn login_request(email: &str, password: &str) -> test::TestRequest {
        test::TestRequest::post()
            .uri("/api/v1/login")
            .set_json(LoginRequest {
                email: email.to_owned(),
                password: password.to_owned(),
            })
    }

    #[actix_web::test]
    async fn valid_credentials_set_the_session_cookie() {
        let mut ports = TestPorts::default();
        ports
            .login
            .expect_authenticate()
            .withf(|creds| creds.email() == FIXTURE_LOGIN_EMAIL && creds.password() == "123456")
            .times(1)
            .return_once(|_| Ok(grant()));
        let app = auth_app!(ports);

        let res = test::call_service(
            &app,
            login_request(" user@nextmail.com ", "123456").to_request(),
        )
        .await;

        assert_eq!(res.status(), StatusCode::OK);
        let cookie = session_cookie(&res);
        assert!(!cookie.value().is_empty());
        let body: Value = test::read_body_json(res).await;
        assert_eq!(body["userId"], FIXTURE_LOGIN_USER_ID);
        assert_eq!(body["email"], FIXTURE_LOGIN_EMAIL);
    }

    #[rstest]
    #[case("not-an-email", "123456")]
    #[case("user@nextmail.com", "123")]
    #[case("   ", "123456")]
    #[actix_web::test]
    async fn malformed_credentials_look_like_wrong_ones(
        #[case] email: &str,
        #[case] password: &str,
    ) {
        let mut ports = TestPorts::default();
        ports.login.expect_authenticate().never();
        let app = auth_app!(ports);

        let res = test::call_service(&app, login_request(email, password).to_request()).await;

        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
        let body: Value = test::read_body_json(res).await;
        assert_eq!(body["message"], INVALID_CREDENTIALS_MESSAGE);
    }

    #[actix_web::test]
    async fn rejected_credentials_are_unauthorised() {
        let mut ports = TestPorts::default();
        ports
            .login
            .expect_authenticate()
            .return_once(|_| Err(AuthError::InvalidCredentials));
        let app = auth_app!(ports);

        let res = test::call_service(
            &app,
            login_request(FIXTURE_LOGIN_EMAIL, "654321").to_request(),
        )
        .await;

        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
        let body: Value = test::read_body_json(res).await;
        assert_eq!(body["code"], "unauthorized");
    }

    #[actix_web::test]
    async fn unexpected_failures_are_redacted() {
        let mut ports = TestPorts::default();
        ports
            .login
            .expect_authenticate()
            .return_once(|_| Err(AuthError::unexpected("pool timed out")));
        let app = auth_app!(ports);

        let res = test::call_service(
            &app,
            login_request(FIXTURE_LOGIN_EMAIL, "123456").to_request(),
        )
        .await;

        assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body: Value = test::read_body_json(res).await;
        assert_eq!(body["message"], "Internal server error");
    }

    #[actix_web::test]
    async fn unexpected_auth_errors_map_to_internal() {
        let error = map_auth_error(AuthError::unexpected("hash corrupt"));
        assert_eq!(error.code(), ErrorCode::InternalError);
    }

    #[actix_web::test]
    async fn logout_clears_the_cookie() {
        let mut ports = TestPorts::default();
        ports
            .login
            .expect_authenticate()
            .return_once(|_| Ok(grant()));
        let app = auth_app!(ports);
        let res = test::call_service(
            &app,
            login_request(FIXTURE_LOGIN_EMAIL, "123456").to_request(),
        )
        .await;
        let cookie = session_cookie(&res);

        let res = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/api/v1/logout")
                .cookie(cookie)
                .to_request(),
        )
        .await;

        assert_eq!(res.status(), StatusCode::NO_CONTENT);
        assert_eq!(session_cookie(&res).value(), "");
    }
}
