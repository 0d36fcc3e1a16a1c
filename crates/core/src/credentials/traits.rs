use async_trait::async_trait;

use super::{CredentialError, Credentials};

/// Result type for credential resolution.
pub type Result<T> = std::result::Result<T, CredentialError>;

/// Turns a caller's identity proof into scoped storage credentials.
#[async_trait]
pub trait CredentialResolver: Send + Sync {
    /// Resolves credentials scoped to the caller behind `token`.
    ///
    /// `token` is the raw bearer token of the inbound request, if any.
    async fn resolve_from_request(&self, token: Option<&str>) -> Result<Credentials>;

    /// Resolves elevated, request-independent credentials.
    async fn resolve_system_credentials(&self) -> Result<Credentials>;
}
