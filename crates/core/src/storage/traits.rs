use async_trait::async_trait;

use crate::credentials::Credentials;

use super::{DeleteParams, Item, Key, Result, ScanParams, TableSchema, UpdateParams};

/// Store location settings bound when a table handle is constructed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StoreSettings {
    pub region: String,
    /// Custom endpoint (local DynamoDB, LocalStack).
    pub endpoint_url: Option<String>,
}

/// Keyed access to one declared table under one credential set.
///
/// Handles are built per request by a [`TableConnector`] and dropped when the
/// request finishes. Every operation runs with the credentials bound at
/// construction.
#[async_trait]
pub trait KeyedTable: Send + Sync {
    /// The schema this handle was built for.
    fn schema(&self) -> &TableSchema;

    /// Gets one record. An absent record is `Ok(None)`, not an error.
    async fn get_item(&self, key: &Key) -> Result<Option<Item>>;

    /// Returns the first page of records visible under the bound credentials.
    async fn scan(&self, params: &ScanParams) -> Result<Vec<Item>>;

    /// Creates or fully overwrites a record.
    async fn put_item(&self, item: Item) -> Result<()>;

    /// Applies attribute assignments and returns attributes per `return_values`.
    async fn update_item(&self, params: &UpdateParams) -> Result<Item>;

    /// Removes a record. Removing an absent record succeeds.
    async fn delete_item(&self, params: &DeleteParams) -> Result<()>;
}

/// Factory for credential-bound table handles.
pub trait TableConnector: Send + Sync {
    /// Builds a handle for `schema` that uses exactly `credentials`.
    fn connect(
        &self,
        schema: &TableSchema,
        credentials: Credentials,
        settings: &StoreSettings,
    ) -> Box<dyn KeyedTable>;
}
