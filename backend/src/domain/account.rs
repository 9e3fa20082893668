//! Account identity and stored password digests.

use std::fmt;

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Validation errors for account values.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AccountValidationError {
    #[error("user id must not be empty")]
    EmptyId,
    #[error("user id must be a valid UUID")]
    InvalidId,
    #[error("account name must not be empty")]
    EmptyName,
    #[error("password hash is not a valid PHC string: {message}")]
    MalformedDigest { message: String },
    #[error("password hashing failed: {message}")]
    Hashing { message: String },
}

/// Stable user identifier stored as a UUID.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct UserId(Uuid, String);

impl UserId {
    /// Validate and construct a [`UserId`] from borrowed input.
    pub fn new(id: impl AsRef<str>) -> Result<Self, AccountValidationError> {
        Self::from_owned(id.as_ref().to_owned())
    }

    /// Wrap an existing UUID.
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid, uuid.to_string())
    }

    /// Generate a new random [`UserId`].
    pub fn random() -> Self {
        Self::from_uuid(Uuid::new_v4())
    }

    fn from_owned(id: String) -> Result<Self, AccountValidationError> {
        if id.is_empty() {
            return Err(AccountValidationError::EmptyId);
        }
        if id.trim() != id {
            return Err(AccountValidationError::InvalidId);
        }

        let parsed = Uuid::parse_str(&id).map_err(|_| AccountValidationError::InvalidId)?;
        Ok(Self(parsed, id))
    }

    /// Access the underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl AsRef<str> for UserId {
    fn as_ref(&self) -> &str {
        self.1.as_str()
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl From<UserId> for String {
    fn from(value: UserId) -> Self {
        let UserId(_, raw) = value;
        raw
    }
}

impl TryFrom<String> for UserId {
    type Error = AccountValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_owned(value)
    }
}

/// Argon2 password hash in PHC string format.
///
/// The digest never exposes the original secret; verification re-derives the
/// hash with the embedded salt and parameters.
#[derive(Clone, PartialEq, Eq)]
pub struct PasswordDigest(String);

impl PasswordDigest {
    /// Hash a plaintext password with a fresh random salt.
    pub fn hash(password: &str) -> Result<Self, AccountValidationError> {
        let salt = SaltString::generate(&mut OsRng);
        Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| Self(hash.to_string()))
            .map_err(|error| AccountValidationError::Hashing {
                message: error.to_string(),
            })
    }

    /// Wrap a stored PHC string, checking that it parses.
    pub fn from_phc(phc: impl Into<String>) -> Result<Self, AccountValidationError> {
        let phc = phc.into();
        PasswordHash::new(&phc).map_err(|error| AccountValidationError::MalformedDigest {
            message: error.to_string(),
        })?;
        Ok(Self(phc))
    }

    /// Check a candidate password against the digest.
    pub fn verify(&self, candidate: &str) -> Result<bool, AccountValidationError> {
        let parsed =
            PasswordHash::new(&self.0).map_err(|error| AccountValidationError::MalformedDigest {
                message: error.to_string(),
            })?;
        Ok(Argon2::default()
            .verify_password(candidate.as_bytes(), &parsed)
            .is_ok())
    }

    /// PHC string for storage.
    pub fn as_phc(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Debug for PasswordDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PasswordDigest(..)")
    }
}

/// Stored account able to sign in to the dashboard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Account {
    pub id: UserId,
    pub name: String,
    pub email: String,
    pub password: PasswordDigest,
}

impl Account {
    /// Build a new account with a random identifier.
    pub fn try_new(
        name: &str,
        email: &str,
        password: PasswordDigest,
    ) -> Result<Self, AccountValidationError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(AccountValidationError::EmptyName);
        }
        Ok(Self {
            id: UserId::random(),
            name: name.to_owned(),
            email: email.trim().to_owned(),
            password,
        })
    }
}
