//! Port for account persistence used by password login.

use async_trait::async_trait;

use crate::domain::Account;

use super::define_port_error;

define_port_error! {
    /// Errors raised by account repository adapters.
    pub enum AccountRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "account repository connection failed: {message}",
        /// Query or insert failed during execution.
        Query { message: String } =>
            "account repository query failed: {message}",
        /// Another account already uses the email address.
        DuplicateEmail { email: String } =>
            "an account with email {email} already exists",
        /// A stored row could not be converted into an account.
        Corrupt { message: String } =>
            "stored account is invalid: {message}",
    }
}

/// Port for looking up and creating accounts.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AccountRepository: Send + Sync {
    /// Find the account registered with `email`, matched exactly.
    async fn find_by_email(&self, email: &str) -> Result<Option<Account>, AccountRepositoryError>;

    /// Persist a new account.
    async fn insert(&self, account: &Account) -> Result<(), AccountRepositoryError>;
}
