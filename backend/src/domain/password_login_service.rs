//! Password login against stored accounts.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{error, info};
use zeroize::Zeroizing;

use crate::domain::ports::{AccountRepository, LoginService};
use crate::domain::{AuthError, LoginCredentials, SessionGrant};

/// Login service that checks credentials against account digests.
#[derive(Clone)]
pub struct PasswordLoginService<A> {
    accounts: Arc<A>,
}

impl<A> PasswordLoginService<A> {
    pub fn new(accounts: Arc<A>) -> Self {
        Self { accounts }
    }
}

#[async_trait]
impl<A> LoginService for PasswordLoginService<A>
where
    A: AccountRepository,
{
    async fn authenticate(
        &self,
        credentials: &LoginCredentials,
    ) -> Result<SessionGrant, AuthError> {
        let account = self
            .accounts
            .find_by_email(credentials.email())
            .await
            .map_err(|err| {
                error!(error = %err, "account lookup failed during login");
                AuthError::unexpected(err.to_string())
            })?
            .ok_or(AuthError::InvalidCredentials)?;

        // Argon2 verification blocks; run it off the async workers.
        let digest = account.password.clone();
        let candidate = Zeroizing::new(credentials.password().to_owned());
        let matches = tokio::task::spawn_blocking(move || digest.verify(candidate.as_str()))
            .await
            .map_err(|err| AuthError::unexpected(format!("password check aborted: {err}")))?
            .map_err(|err| {
                error!(error = %err, user_id = %account.id, "stored password digest is unusable");
                AuthError::unexpected(err.to_string())
            })?;

        if !matches {
            return Err(AuthError::InvalidCredentials);
        }
        info!(user_id = %account.id, "user signed in");
        Ok(SessionGrant {
            user_id: account.id,
            name: account.name,
            email: account.email,
        })
    }
}
