//! Application state shared by every request handler.
//!
//! Holds only immutable configuration, the tenant table schema and stateless
//! handles for credential resolution and table construction. Nothing
//! request-specific (credentials, records, table handles) is stored here.

use std::sync::Arc;

use tenant_manager_core::{
    credentials::{CredentialResolver, Credentials},
    storage::{KeyedTable, StoreSettings, TableConnector, TableSchema},
    tenant::tenant_table_schema,
};

use crate::{
    config::{Config, ConfigError, StoreBackend},
    credentials::{CredentialSource, JwtCredentialResolver, StaticCredentialSource},
    handlers::{ApiError, ApiErrorKind, Operation},
    storage::InMemoryStore,
};

/// Shared application state.
///
/// Cloned for each request handler; every field is cheap to clone.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    /// Tenant table declaration, built once at startup.
    pub schema: Arc<TableSchema>,
    pub resolver: Arc<dyn CredentialResolver>,
    pub connector: Arc<dyn TableConnector>,
    settings: Arc<StoreSettings>,
}

impl AppState {
    /// Creates an AppState from already-built collaborators.
    pub fn build(
        config: Config,
        resolver: Arc<dyn CredentialResolver>,
        connector: Arc<dyn TableConnector>,
    ) -> Self {
        let schema = tenant_table_schema(config.table_name.clone());
        let settings = config.store_settings();

        Self {
            config: Arc::new(config),
            schema: Arc::new(schema),
            resolver,
            connector,
            settings: Arc::new(settings),
        }
    }

    /// Creates AppState for the configured store backend.
    pub async fn new(config: &Config) -> Result<Self, anyhow::Error> {
        match config.store {
            StoreBackend::Memory => {
                tracing::warn!("Using the in-memory tenant store; data is lost on shutdown");
                Self::with_memory_store(config.clone(), InMemoryStore::new())
            }
            #[cfg(feature = "dynamodb")]
            StoreBackend::Dynamodb => {
                use crate::credentials::AwsCredentialSource;
                use crate::storage::DynamoDbConnector;

                let source = Arc::new(AwsCredentialSource::from_env(&config.region).await?);
                let resolver = jwt_resolver(config, source)?;

                tracing::info!(
                    table = %config.table_name,
                    region = %config.region,
                    "Using DynamoDB tenant store"
                );

                Ok(Self::build(
                    config.clone(),
                    Arc::new(resolver),
                    Arc::new(DynamoDbConnector),
                ))
            }
            #[cfg(not(feature = "dynamodb"))]
            StoreBackend::Dynamodb => {
                anyhow::bail!("the dynamodb store requires building with the `dynamodb` feature")
            }
        }
    }

    /// Creates AppState backed by `store`, with fixed local key material.
    pub fn with_memory_store(config: Config, store: InMemoryStore) -> Result<Self, anyhow::Error> {
        let resolver = jwt_resolver(&config, Arc::new(StaticCredentialSource::local()))?;
        Ok(Self::build(config, Arc::new(resolver), Arc::new(store)))
    }

    /// Builds a table handle bound to `credentials` for a single request.
    pub fn table(&self, credentials: Credentials) -> Box<dyn KeyedTable> {
        self.connector
            .connect(&self.schema, credentials, &self.settings)
    }

    /// Wraps a failure of `operation` into the configured error response.
    pub fn reject(&self, operation: Operation, err: impl Into<ApiErrorKind>) -> ApiError {
        ApiError::new(operation, err).detailed(self.config.detailed_errors)
    }
}

fn jwt_resolver(
    config: &Config,
    source: Arc<dyn CredentialSource>,
) -> Result<JwtCredentialResolver, ConfigError> {
    let secret = config
        .token_secret
        .as_deref()
        .filter(|secret| !secret.is_empty())
        .ok_or(ConfigError::Empty("token secret"))?;

    let mut resolver = JwtCredentialResolver::new(secret.as_bytes(), &config.tenant_claim, source);
    if let Some((claim, value)) = config.system_role() {
        resolver = resolver.with_system_role(claim, value);
    }

    Ok(match config.token_issuer.as_deref() {
        Some(issuer) => resolver.with_issuer(issuer),
        None => resolver,
    })
}
