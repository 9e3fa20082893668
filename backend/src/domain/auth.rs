//! Authentication primitives: login credentials, grants and failures.
//!
//! Keep inbound payload parsing outside the domain by exposing constructors
//! that validate string inputs before a handler talks to a port or service.

use std::fmt;
use std::sync::OnceLock;

use regex::Regex;
use serde::Serialize;
use utoipa::ToSchema;
use zeroize::Zeroizing;

use super::UserId;

/// Minimum accepted password length, in characters.
pub const PASSWORD_MIN_LEN: usize = 6;

/// Message shown for any credential mismatch.
pub const INVALID_CREDENTIALS_MESSAGE: &str = "Invalid credentials.";
/// Message shown when authentication fails for reasons the user cannot fix.
pub const UNEXPECTED_AUTH_MESSAGE: &str = "Something went wrong.";

/// Domain error returned when login payload values are malformed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginValidationError {
    /// Email was missing or blank once trimmed.
    EmptyEmail,
    /// Email does not look like `local@domain.tld`.
    InvalidEmail,
    /// Password is shorter than [`PASSWORD_MIN_LEN`].
    PasswordTooShort { min: usize },
}

impl fmt::Display for LoginValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyEmail => write!(f, "email must not be empty"),
            Self::InvalidEmail => write!(f, "email must be a valid address"),
            Self::PasswordTooShort { min } => {
                write!(f, "password must be at least {min} characters")
            }
        }
    }
}

impl std::error::Error for LoginValidationError {}

static EMAIL_RE: OnceLock<Regex> = OnceLock::new();

fn email_regex() -> &'static Regex {
    EMAIL_RE.get_or_init(|| {
        let pattern = r"^[^@\s]+@[^@\s]+\.[^@\s]+$";
        Regex::new(pattern).unwrap_or_else(|error| panic!("email regex failed to compile: {error}"))
    })
}

/// Validated login credentials used by authentication services.
///
/// ## Invariants
/// - `email` is trimmed and matches `local@domain.tld`.
/// - `password` holds at least [`PASSWORD_MIN_LEN`] characters and keeps
///   caller-provided whitespace. It is wiped from memory on drop.
///
/// # Examples
/// ```
/// use dashboard::domain::LoginCredentials;
///
/// let creds = LoginCredentials::try_from_parts(" user@nextmail.com ", "123456").unwrap();
/// assert_eq!(creds.email(), "user@nextmail.com");
/// assert!(LoginCredentials::try_from_parts("user@nextmail.com", "123").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginCredentials {
    email: String,
    password: Zeroizing<String>,
}

impl LoginCredentials {
    /// Construct credentials from raw email/password inputs.
    pub fn try_from_parts(email: &str, password: &str) -> Result<Self, LoginValidationError> {
        let normalized = email.trim();
        if normalized.is_empty() {
            return Err(LoginValidationError::EmptyEmail);
        }
        if !email_regex().is_match(normalized) {
            return Err(LoginValidationError::InvalidEmail);
        }
        if password.chars().count() < PASSWORD_MIN_LEN {
            return Err(LoginValidationError::PasswordTooShort {
                min: PASSWORD_MIN_LEN,
            });
        }

        Ok(Self {
            email: normalized.to_owned(),
            password: Zeroizing::new(password.to_owned()),
        })
    }

    /// Email used for the account lookup.
    pub fn email(&self) -> &str {
        self.email.as_str()
    }

    /// Password string provided by the caller.
    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}

/// Marker of an authenticated user, stored in the session after login.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SessionGrant {
    #[schema(value_type = String, example = "410544b2-4001-4271-9855-fec4b6a6442a")]
    pub user_id: UserId,
    #[schema(example = "User")]
    pub name: String,
    #[schema(example = "user@nextmail.com")]
    pub email: String,
}

/// Authentication failure classes.
///
/// `InvalidCredentials` is safe to show to the user. `Unexpected` keeps its
/// detail for logs only; adapters present the generic message instead.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthError {
    #[error("invalid credentials")]
    InvalidCredentials,
    #[error("authentication failed unexpectedly: {message}")]
    Unexpected { message: String },
}

impl AuthError {
    /// Build an [`AuthError::Unexpected`] from any displayable cause.
    pub fn unexpected(message: impl Into<String>) -> Self {
        Self::Unexpected {
            message: message.into(),
        }
    }

    /// Message suitable for the person attempting to sign in.
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::InvalidCredentials => INVALID_CREDENTIALS_MESSAGE,
            Self::Unexpected { .. } => UNEXPECTED_AUTH_MESSAGE,
        }
    }
}
