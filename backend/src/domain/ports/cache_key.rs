//! Route identifiers and cache keys shared by route cache adapters.
use thiserror::Error;

use crate::domain::InvoiceId;

/// Logical path of a rendered view, used as the unit of invalidation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RoutePath(String);

impl RoutePath {
    /// Validate a route path: absolute and free of whitespace.
    pub fn new(value: impl Into<String>) -> Result<Self, RouteCacheKeyValidationError> {
        let raw = value.into();
        if raw.trim().is_empty() {
            return Err(RouteCacheKeyValidationError::Empty);
        }
        if raw.chars().any(char::is_whitespace) {
            return Err(RouteCacheKeyValidationError::ContainsWhitespace);
        }
        if !raw.starts_with('/') {
            return Err(RouteCacheKeyValidationError::NotAbsolute);
        }
        Ok(Self(raw))
    }

    /// The invoice listing route.
    pub fn invoices() -> Self {
        Self("/invoices".to_owned())
    }

    /// The edit form route of one invoice.
    ///
    /// Identifier characters outside the unreserved URL set are
    /// percent-encoded so any opaque id yields a valid path.
    pub fn invoice_edit(id: &InvoiceId) -> Self {
        Self(format!("/invoices/{}/edit", encode_segment(id.as_ref())))
    }

    /// Borrow the path as a string slice.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

fn encode_segment(raw: &str) -> String {
    let mut encoded = String::with_capacity(raw.len());
    for byte in raw.bytes() {
        if byte.is_ascii_alphanumeric() || matches!(byte, b'-' | b'_' | b'.' | b'~') {
            encoded.push(char::from(byte));
        } else {
            encoded.push_str(&format!("%{byte:02X}"));
        }
    }
    encoded
}

impl std::fmt::Display for RoutePath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl AsRef<str> for RoutePath {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

/// Cache key: a route plus the variant (search, page) rendered for it.
///
/// Invalidation works on the route, so every variant of a route goes stale
/// together.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RouteCacheKey {
    route: RoutePath,
    variant: String,
}

impl RouteCacheKey {
    /// Key for the single rendering of a route.
    pub fn route(route: RoutePath) -> Self {
        Self {
            route,
            variant: String::new(),
        }
    }

    /// Key for one variant of a route.
    pub fn variant(route: RoutePath, variant: impl Into<String>) -> Self {
        Self {
            route,
            variant: variant.into(),
        }
    }

    /// Route the key belongs to.
    pub fn route_path(&self) -> &RoutePath {
        &self.route
    }

    /// Variant discriminator, empty for single-rendering routes.
    pub fn variant_str(&self) -> &str {
        self.variant.as_str()
    }
}

impl std::fmt::Display for RouteCacheKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.variant.is_empty() {
            write!(f, "{}", self.route)
        } else {
            write!(f, "{}#{}", self.route, self.variant)
        }
    }
}

/// Validation errors returned when constructing [`RoutePath`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RouteCacheKeyValidationError {
    /// Path is empty after trimming whitespace.
    #[error("route path must not be empty")]
    Empty,
    /// Path contains whitespace.
    #[error("route path must not contain whitespace")]
    ContainsWhitespace,
    /// Path does not start with `/`.
    #[error("route path must start with '/'")]
    NotAbsolute,
}
