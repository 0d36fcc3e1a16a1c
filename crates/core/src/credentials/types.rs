use std::fmt;

use chrono::{DateTime, Utc};

use crate::storage::StoreError;

/// Which rows of the shared table a credential set may touch.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CredentialScope {
    /// Request-independent, elevated access to every row.
    System,
    /// Access limited to the rows partitioned under one tenant id.
    Tenant(String),
}

impl CredentialScope {
    /// Returns true if this scope may read or write the given tenant's row.
    pub fn permits(&self, tenant_id: &str) -> bool {
        match self {
            CredentialScope::System => true,
            CredentialScope::Tenant(scoped) => scoped == tenant_id,
        }
    }
}

impl fmt::Display for CredentialScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CredentialScope::System => write!(f, "system"),
            CredentialScope::Tenant(id) => write!(f, "tenant:{id}"),
        }
    }
}

/// Temporary storage credentials plus the scope they were issued for.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    access_key_id: String,
    secret_access_key: String,
    session_token: Option<String>,
    expires_at: Option<DateTime<Utc>>,
    scope: CredentialScope,
}

impl Credentials {
    pub fn new(
        access_key_id: impl Into<String>,
        secret_access_key: impl Into<String>,
        session_token: Option<String>,
        expires_at: Option<DateTime<Utc>>,
        scope: CredentialScope,
    ) -> Self {
        Self {
            access_key_id: access_key_id.into(),
            secret_access_key: secret_access_key.into(),
            session_token,
            expires_at,
            scope,
        }
    }

    /// Same key material, narrowed (or widened) to another scope.
    pub fn with_scope(mut self, scope: CredentialScope) -> Self {
        self.scope = scope;
        self
    }

    pub fn access_key_id(&self) -> &str {
        &self.access_key_id
    }

    pub fn secret_access_key(&self) -> &str {
        &self.secret_access_key
    }

    pub fn session_token(&self) -> Option<&str> {
        self.session_token.as_deref()
    }

    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.expires_at
    }

    pub fn scope(&self) -> &CredentialScope {
        &self.scope
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.is_some_and(|expiry| expiry <= now)
    }

    /// Checks that these credentials may touch `tenant_id`'s row at `now`.
    ///
    /// Mirrors the store's own authorization: expired or out-of-scope
    /// credentials fail with [`StoreError::Forbidden`].
    pub fn authorize(&self, tenant_id: &str, now: DateTime<Utc>) -> Result<(), StoreError> {
        if self.is_expired(now) {
            return Err(StoreError::Forbidden(
                "the security token included in the request is expired".to_string(),
            ));
        }
        if !self.scope.permits(tenant_id) {
            return Err(StoreError::Forbidden(format!(
                "credentials scoped to {} are not authorized for tenant {tenant_id}",
                self.scope
            )));
        }
        Ok(())
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("access_key_id", &self.access_key_id)
            .field("secret_access_key", &"** redacted **")
            .field(
                "session_token",
                &self.session_token.as_ref().map(|_| "** redacted **"),
            )
            .field("expires_at", &self.expires_at)
            .field("scope", &self.scope)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn tenant_credentials(tenant_id: &str) -> Credentials {
        Credentials::new(
            "AKIDEXAMPLE",
            "secret",
            Some("token".to_string()),
            None,
            CredentialScope::Tenant(tenant_id.to_string()),
        )
    }

    #[test]
    fn test_system_scope_permits_any_tenant() {
        assert!(CredentialScope::System.permits("t1"));
        assert!(CredentialScope::System.permits("t2"));
    }

    #[test]
    fn test_tenant_scope_permits_only_itself() {
        let scope = CredentialScope::Tenant("t1".to_string());
        assert!(scope.permits("t1"));
        assert!(!scope.permits("t2"));
    }

    #[test]
    fn test_authorize_other_tenant_is_forbidden() {
        let result = tenant_credentials("t1").authorize("t2", Utc::now());
        assert!(matches!(result, Err(StoreError::Forbidden(_))));
    }

    #[test]
    fn test_authorize_own_tenant() {
        assert!(tenant_credentials("t1").authorize("t1", Utc::now()).is_ok());
    }

    #[test]
    fn test_expired_credentials_are_forbidden() {
        let now = Utc::now();
        let credentials = Credentials::new(
            "AKIDEXAMPLE",
            "secret",
            None,
            Some(now - Duration::minutes(1)),
            CredentialScope::System,
        );

        assert!(credentials.is_expired(now));
        assert!(matches!(
            credentials.authorize("t1", now),
            Err(StoreError::Forbidden(_))
        ));
    }

    #[test]
    fn test_with_scope_keeps_key_material() {
        let narrowed = tenant_credentials("t1").with_scope(CredentialScope::System);
        assert_eq!(narrowed.access_key_id(), "AKIDEXAMPLE");
        assert_eq!(narrowed.session_token(), Some("token"));
        assert_eq!(narrowed.scope(), &CredentialScope::System);
    }

    #[test]
    fn test_debug_redacts_secrets() {
        let rendered = format!("{:?}", tenant_credentials("t1"));
        assert!(rendered.contains("AKIDEXAMPLE"));
        assert!(!rendered.contains("secret\""));
        assert!(!rendered.contains("\"token\""));
    }

    #[test]
    fn test_scope_display() {
        assert_eq!(CredentialScope::System.to_string(), "system");
        assert_eq!(
            CredentialScope::Tenant("t1".to_string()).to_string(),
            "tenant:t1"
        );
    }
}
