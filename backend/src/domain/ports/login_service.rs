//! Driving port for login/authentication use-cases.
//!
//! In hexagonal terms this is a *driving* port: inbound adapters call it to
//! authenticate credentials without knowing which credential provider backs
//! it. The password implementation lives in the domain; the fixture below
//! serves database-less development runs and handler tests.

use async_trait::async_trait;

use crate::domain::{AuthError, LoginCredentials, SessionGrant, UserId};

/// Email accepted by [`FixtureLoginService`].
pub const FIXTURE_LOGIN_EMAIL: &str = "user@nextmail.com";
/// Password accepted by [`FixtureLoginService`].
pub const FIXTURE_LOGIN_PASSWORD: &str = "123456";
/// User id granted by [`FixtureLoginService`].
pub const FIXTURE_LOGIN_USER_ID: &str = "410544b2-4001-4271-9855-fec4b6a6442a";

/// Domain use-case port for authentication.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LoginService: Send + Sync {
    /// Verify credentials and return the grant to store in the session.
    async fn authenticate(&self, credentials: &LoginCredentials)
    -> Result<SessionGrant, AuthError>;
}

/// In-memory authenticator with a single well-known account.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureLoginService;

#[async_trait]
impl LoginService for FixtureLoginService {
    async fn authenticate(
        &self,
        credentials: &LoginCredentials,
    ) -> Result<SessionGrant, AuthError> {
        if credentials.email() != FIXTURE_LOGIN_EMAIL
            || credentials.password() != FIXTURE_LOGIN_PASSWORD
        {
            return Err(AuthError::InvalidCredentials);
        }
        let user_id = UserId::new(FIXTURE_LOGIN_USER_ID)
            .map_err(|err| AuthError::unexpected(format!("invalid fixture user id: {err}")))?;
        Ok(SessionGrant {
            user_id,
            name: "User".to_owned(),
            email: FIXTURE_LOGIN_EMAIL.to_owned(),
        })
    }
}
