//! PostgreSQL-backed `AccountRepository` implementation using Diesel ORM.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{AccountRepository, AccountRepositoryError};
use crate::domain::{Account, PasswordDigest, UserId};

use super::diesel_basic_error_mapping::{
    is_unique_violation, map_basic_diesel_error, map_basic_pool_error,
};
use super::models::{AccountRow, NewAccountRow};
use super::pool::{DbPool, PoolError};
use super::schema::users;

/// Diesel-backed implementation of the account repository port.
#[derive(Clone)]
pub struct DieselAccountRepository {
    pool: DbPool,
}

impl DieselAccountRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> AccountRepositoryError {
    map_basic_pool_error(error, AccountRepositoryError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> AccountRepositoryError {
    map_basic_diesel_error(
        error,
        AccountRepositoryError::query,
        AccountRepositoryError::connection,
    )
}

fn row_to_account(row: AccountRow) -> Result<Account, AccountRepositoryError> {
    let password = PasswordDigest::from_phc(row.password)
        .map_err(|err| AccountRepositoryError::corrupt(err.to_string()))?;
    Ok(Account {
        id: UserId::from_uuid(row.id),
        name: row.name,
        email: row.email,
        password,
    })
}

#[async_trait]
impl AccountRepository for DieselAccountRepository {
    async fn find_by_email(&self, email: &str) -> Result<Option<Account>, AccountRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<AccountRow> = users::table
            .filter(users::email.eq(email))
            .select(AccountRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(row_to_account).transpose()
    }

    async fn insert(&self, account: &Account) -> Result<(), AccountRepositoryError> {
        let row = NewAccountRow {
            id: *account.id.as_uuid(),
            name: account.name.as_str(),
            email: account.email.as_str(),
            password: account.password.as_phc(),
        };
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        diesel::insert_into(users::table)
            .values(&row)
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(|err| {
                if is_unique_violation(&err) {
                    AccountRepositoryError::duplicate_email(account.email.as_str())
                } else {
                    map_diesel_error(err)
                }
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use uuid::Uuid;

    #[rstest]
    fn rows_with_unparseable_digests_are_corrupt() {
        let row = AccountRow {
            id: Uuid::new_v4(),
            name: "User".to_owned(),
            email: "user@nextmail.com".to_owned(),
            password: "plaintext".to_owned(),
        };
        let err = row_to_account(row).expect_err("digest must parse");
        assert!(matches!(err, AccountRepositoryError::Corrupt { .. }));
    }

    #[rstest]
    fn rows_with_phc_digests_decode() {
        let digest = PasswordDigest::hash("123456").expect("hash");
        let row = AccountRow {
            id: Uuid::new_v4(),
            name: "User".to_owned(),
            email: "user@nextmail.com".to_owned(),
            password: digest.as_phc().to_owned(),
        };
        let account = row_to_account(row).expect("decodes");
        assert!(account.password.verify("123456").expect("verify"));
    }
}
