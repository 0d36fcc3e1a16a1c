//! Bearer-token credential resolver.
//!
//! Verifies the caller's HS256 JWT and scopes freshly fetched key material
//! from its claims: a token carrying the system role sees the whole table,
//! any other token is confined to the tenant named by the tenant claim.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use jsonwebtoken::{decode, errors::ErrorKind, Algorithm, DecodingKey, Validation};
use serde::Deserialize;
use serde_json::Value;

use tenant_manager_core::credentials::{
    CredentialError, CredentialResolver, CredentialScope, Credentials, Result,
};

use super::CredentialSource;

/// Claims read from a caller token. Expiry is checked by the validator.
#[derive(Debug, Deserialize)]
struct TokenClaims {
    #[serde(default)]
    sub: Option<String>,
    #[serde(flatten)]
    claims: HashMap<String, Value>,
}

impl TokenClaims {
    fn string(&self, name: &str) -> Option<&str> {
        self.claims
            .get(name)
            .and_then(Value::as_str)
            .filter(|value| !value.trim().is_empty())
    }
}

/// Claim name and value that mark a system administrator.
#[derive(Debug, Clone)]
struct SystemRole {
    claim: String,
    value: String,
}

/// Resolves scoped credentials from `Authorization: Bearer <jwt>`.
pub struct JwtCredentialResolver {
    decoding_key: DecodingKey,
    validation: Validation,
    tenant_claim: String,
    system_role: Option<SystemRole>,
    source: Arc<dyn CredentialSource>,
}

impl JwtCredentialResolver {
    pub fn new(
        secret: &[u8],
        tenant_claim: impl Into<String>,
        source: Arc<dyn CredentialSource>,
    ) -> Self {
        Self {
            decoding_key: DecodingKey::from_secret(secret),
            validation: Validation::new(Algorithm::HS256),
            tenant_claim: tenant_claim.into(),
            system_role: None,
            source,
        }
    }

    /// Also require the `iss` claim to match.
    pub fn with_issuer(mut self, issuer: &str) -> Self {
        self.validation.set_issuer(&[issuer]);
        self
    }

    /// Grants system scope to tokens whose `claim` equals `value`.
    pub fn with_system_role(mut self, claim: impl Into<String>, value: impl Into<String>) -> Self {
        self.system_role = Some(SystemRole {
            claim: claim.into(),
            value: value.into(),
        });
        self
    }

    /// Verifies a token and returns the scope its claims grant.
    fn scope_from_token(&self, token: &str) -> Result<CredentialScope> {
        let data = decode::<TokenClaims>(token, &self.decoding_key, &self.validation).map_err(
            |e| match e.kind() {
                ErrorKind::ExpiredSignature => CredentialError::Expired,
                _ => CredentialError::InvalidToken(e.to_string()),
            },
        )?;
        let claims = data.claims;
        let subject = claims.sub.as_deref().unwrap_or("-");

        if let Some(role) = &self.system_role {
            if claims.string(&role.claim) == Some(role.value.as_str()) {
                tracing::debug!(subject, role = %role.value, "System token verified");
                return Ok(CredentialScope::System);
            }
        }

        let tenant_id = claims
            .string(&self.tenant_claim)
            .ok_or_else(|| CredentialError::MissingClaim(self.tenant_claim.clone()))?;

        tracing::debug!(subject, tenant_id = %tenant_id, "Caller token verified");

        Ok(CredentialScope::Tenant(tenant_id.to_string()))
    }

    async fn fetch_unexpired(&self) -> Result<Credentials> {
        let credentials = self.source.fetch().await?;
        if credentials.is_expired(Utc::now()) {
            return Err(CredentialError::Expired);
        }
        Ok(credentials)
    }
}

#[async_trait]
impl CredentialResolver for JwtCredentialResolver {
    async fn resolve_from_request(&self, token: Option<&str>) -> Result<Credentials> {
        let token = token.ok_or(CredentialError::MissingToken)?;
        let scope = self.scope_from_token(token)?;

        let credentials = self.fetch_unexpired().await?;
        Ok(credentials.with_scope(scope))
    }

    async fn resolve_system_credentials(&self) -> Result<Credentials> {
        let credentials = self.fetch_unexpired().await?;
        Ok(credentials.with_scope(CredentialScope::System))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::credentials::StaticCredentialSource;
    use jsonwebtoken::{encode, EncodingKey, Header};
    use serde_json::json;

    const SECRET: &[u8] = b"test-secret";

    fn resolver() -> JwtCredentialResolver {
        JwtCredentialResolver::new(
            SECRET,
            "custom:tenant_id",
            Arc::new(StaticCredentialSource::local()),
        )
        .with_system_role("custom:role", "SystemAdmin")
    }

    fn token(claims: Value, secret: &[u8]) -> String {
        encode(&Header::default(), &claims, &EncodingKey::from_secret(secret)).unwrap()
    }

    fn valid_claims(tenant_id: &str) -> Value {
        json!({
            "sub": "user-1",
            "custom:tenant_id": tenant_id,
            "iss": "tenant-manager-tests",
            "exp": Utc::now().timestamp() + 3600,
        })
    }

    #[tokio::test]
    async fn test_resolves_tenant_scope_from_claim() {
        let token = token(valid_claims("t1"), SECRET);

        let credentials = resolver()
            .resolve_from_request(Some(&token))
            .await
            .unwrap();

        assert_eq!(
            credentials.scope(),
            &CredentialScope::Tenant("t1".to_string())
        );
    }

    #[tokio::test]
    async fn test_missing_token() {
        let result = resolver().resolve_from_request(None).await;
        assert_eq!(result, Err(CredentialError::MissingToken));
    }

    #[tokio::test]
    async fn test_wrong_signature_is_invalid() {
        let token = token(valid_claims("t1"), b"another-secret");
        let result = resolver().resolve_from_request(Some(&token)).await;
        assert!(matches!(result, Err(CredentialError::InvalidToken(_))));
    }

    #[tokio::test]
    async fn test_expired_token() {
        let mut claims = valid_claims("t1");
        claims["exp"] = json!(Utc::now().timestamp() - 3600);
        let token = token(claims, SECRET);

        let result = resolver().resolve_from_request(Some(&token)).await;

        assert_eq!(result, Err(CredentialError::Expired));
    }

    #[tokio::test]
    async fn test_missing_tenant_claim() {
        let token = token(
            json!({"sub": "user-1", "exp": Utc::now().timestamp() + 3600}),
            SECRET,
        );

        let result = resolver().resolve_from_request(Some(&token)).await;

        assert_eq!(
            result,
            Err(CredentialError::MissingClaim("custom:tenant_id".to_string()))
        );
    }

    #[tokio::test]
    async fn test_issuer_mismatch_is_invalid() {
        let token = token(valid_claims("t1"), SECRET);
        let resolver = resolver().with_issuer("someone-else");

        let result = resolver.resolve_from_request(Some(&token)).await;

        assert!(matches!(result, Err(CredentialError::InvalidToken(_))));
    }

    #[tokio::test]
    async fn test_system_credentials_need_no_token() {
        let credentials = resolver().resolve_system_credentials().await.unwrap();
        assert_eq!(credentials.scope(), &CredentialScope::System);
    }

    #[tokio::test]
    async fn test_system_role_claim_grants_system_scope() {
        let token = token(
            json!({
                "sub": "admin-1",
                "custom:role": "SystemAdmin",
                "exp": Utc::now().timestamp() + 3600,
            }),
            SECRET,
        );

        let credentials = resolver()
            .resolve_from_request(Some(&token))
            .await
            .unwrap();

        assert_eq!(credentials.scope(), &CredentialScope::System);
    }

    #[tokio::test]
    async fn test_system_role_wins_over_tenant_claim() {
        let mut claims = valid_claims("system");
        claims["custom:role"] = json!("SystemAdmin");
        let token = token(claims, SECRET);

        let credentials = resolver()
            .resolve_from_request(Some(&token))
            .await
            .unwrap();

        assert_eq!(credentials.scope(), &CredentialScope::System);
    }

    #[tokio::test]
    async fn test_other_role_stays_tenant_scoped() {
        let mut claims = valid_claims("t1");
        claims["custom:role"] = json!("TenantAdmin");
        let token = token(claims, SECRET);

        let credentials = resolver()
            .resolve_from_request(Some(&token))
            .await
            .unwrap();

        assert_eq!(
            credentials.scope(),
            &CredentialScope::Tenant("t1".to_string())
        );
    }

    #[tokio::test]
    async fn test_role_claim_ignored_without_system_role() {
        let token = token(
            json!({"custom:role": "SystemAdmin", "exp": Utc::now().timestamp() + 3600}),
            SECRET,
        );
        let resolver = JwtCredentialResolver::new(
            SECRET,
            "custom:tenant_id",
            Arc::new(StaticCredentialSource::local()),
        );

        let result = resolver.resolve_from_request(Some(&token)).await;

        assert_eq!(
            result,
            Err(CredentialError::MissingClaim("custom:tenant_id".to_string()))
        );
    }
}
