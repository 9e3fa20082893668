//! Correlation id carried by every request.
//!
//! The id lives in tokio task-local storage for the lifetime of one request,
//! so error constructors can stamp it without handlers passing it around.
//! Spawned tasks do not inherit it; wrap their futures in [`TraceId::scope`].

use std::fmt;
use std::future::Future;
use std::str::FromStr;

use uuid::Uuid;

/// Header carrying the trace identifier on requests and responses.
pub const TRACE_ID_HEADER: &str = "trace-id";

tokio::task_local! {
    static ACTIVE: TraceId;
}

/// Per-request trace identifier.
///
/// # Examples
/// ```
/// use dashboard::TraceId;
///
/// let id = TraceId::from_header("8a4f7c3e-1b2d-4e5f-9a6b-7c8d9e0f1a2b").expect("valid id");
/// assert_eq!(id.to_string(), "8a4f7c3e-1b2d-4e5f-9a6b-7c8d9e0f1a2b");
/// assert!(TraceId::current().is_none());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TraceId(Uuid);

impl TraceId {
    /// A fresh random identifier.
    #[must_use]
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    /// Accept a caller-supplied header value.
    ///
    /// Returns `None` for anything that is not a UUID, and for the nil UUID,
    /// which would merge unrelated requests in the logs.
    #[must_use]
    pub fn from_header(value: &str) -> Option<Self> {
        value.parse().ok().filter(|id: &Self| !id.0.is_nil())
    }

    /// The identifier of the request currently being served, if any.
    #[must_use]
    pub fn current() -> Option<Self> {
        ACTIVE.try_with(|id| *id).ok()
    }

    #[must_use]
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }

    /// Run `fut` with `trace_id` as the current identifier.
    pub async fn scope<F: Future>(trace_id: Self, fut: F) -> F::Output {
        ACTIVE.scope(trace_id, fut).await
    }
}

impl fmt::Display for TraceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for TraceId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s.trim()).map(Self)
    }
}
