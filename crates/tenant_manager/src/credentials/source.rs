//! Where storage key material comes from.
//!
//! A source hands out raw key material with system scope; resolvers narrow it
//! to the caller's tenant.

use async_trait::async_trait;

#[cfg(feature = "dynamodb")]
use tenant_manager_core::credentials::CredentialError;
use tenant_manager_core::credentials::{CredentialScope, Credentials, Result};

/// Supplies storage key material on demand.
#[async_trait]
pub trait CredentialSource: Send + Sync {
    /// Fetches fresh key material. Called once per resolution.
    async fn fetch(&self) -> Result<Credentials>;
}

/// Fixed key material, for the memory backend, local endpoints and tests.
#[derive(Debug, Clone)]
pub struct StaticCredentialSource {
    credentials: Credentials,
}

impl StaticCredentialSource {
    pub fn new(access_key_id: impl Into<String>, secret_access_key: impl Into<String>) -> Self {
        Self {
            credentials: Credentials::new(
                access_key_id,
                secret_access_key,
                None,
                None,
                CredentialScope::System,
            ),
        }
    }

    /// Key material for the in-process store, which never checks keys.
    pub fn local() -> Self {
        Self::new("local", "local")
    }
}

#[async_trait]
impl CredentialSource for StaticCredentialSource {
    async fn fetch(&self) -> Result<Credentials> {
        Ok(self.credentials.clone())
    }
}

/// Key material from the AWS default provider chain.
///
/// The chain caches and refreshes temporary credentials itself; every fetch
/// asks it again so expired keys are never handed out.
#[cfg(feature = "dynamodb")]
#[derive(Debug, Clone)]
pub struct AwsCredentialSource {
    provider: aws_credential_types::provider::SharedCredentialsProvider,
}

#[cfg(feature = "dynamodb")]
impl AwsCredentialSource {
    /// Loads the default provider chain for `region`.
    pub async fn from_env(region: &str) -> Result<Self> {
        let sdk_config = aws_config::defaults(aws_config::BehaviorVersion::latest())
            .region(aws_config::Region::new(region.to_string()))
            .load()
            .await;

        let provider = sdk_config.credentials_provider().ok_or_else(|| {
            CredentialError::Provider("no AWS credentials provider configured".to_string())
        })?;

        Ok(Self { provider })
    }
}

#[cfg(feature = "dynamodb")]
#[async_trait]
impl CredentialSource for AwsCredentialSource {
    async fn fetch(&self) -> Result<Credentials> {
        use aws_credential_types::provider::ProvideCredentials;

        let credentials = self
            .provider
            .provide_credentials()
            .await
            .map_err(|e| CredentialError::Provider(e.to_string()))?;

        Ok(Credentials::new(
            credentials.access_key_id(),
            credentials.secret_access_key(),
            credentials.session_token().map(str::to_string),
            credentials.expiry().map(chrono::DateTime::<chrono::Utc>::from),
            CredentialScope::System,
        ))
    }
}
