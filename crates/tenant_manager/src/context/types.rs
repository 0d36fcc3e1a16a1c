//! Pure types for request-scoped context.

use uuid::Uuid;

/// Unique identifier for a request, used for tracing and logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RequestId(Uuid);

impl RequestId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn from_uuid(id: Uuid) -> Self {
        Self(id)
    }
}

impl Default for RequestId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for RequestId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Request-scoped context available to all handlers.
///
/// Lives for one request only; the caller token is never cached.
#[derive(Clone)]
pub struct RequestContext {
    /// Unique request identifier for tracing.
    pub request_id: RequestId,
    /// Bearer token from the `Authorization` header, if any.
    pub bearer_token: Option<String>,
}

impl RequestContext {
    pub fn bearer_token(&self) -> Option<&str> {
        self.bearer_token.as_deref()
    }
}

impl std::fmt::Debug for RequestContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RequestContext")
            .field("request_id", &self.request_id)
            .field("bearer_token", &self.bearer_token.as_ref().map(|_| "** redacted **"))
            .finish()
    }
}
