//! In-memory table implementation.

use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use serde_json::Value;
use tokio::sync::RwLock;

use tenant_manager_core::credentials::Credentials;
use tenant_manager_core::storage::{
    render_update_expression, DeleteParams, Item, Key, KeyedTable, Result, ReturnValues,
    ScanParams, StoreError, StoreSettings, TableConnector, TableSchema, UpdateParams,
};

type Rows = BTreeMap<String, Item>;

/// Process-local store shared by every handle it hands out.
///
/// Data is not persisted and is lost when the last clone is dropped.
#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    tables: Arc<RwLock<HashMap<String, Rows>>>,
    failure: Arc<RwLock<Option<StoreError>>>,
    connections: Arc<AtomicUsize>,
}

impl InMemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every subsequent operation fail with `failure` (or succeed again with `None`).
    #[cfg_attr(not(test), allow(dead_code))]
    pub async fn set_failure(&self, failure: Option<StoreError>) {
        *self.failure.write().await = failure;
    }

    /// Number of table handles built so far.
    #[cfg_attr(not(test), allow(dead_code))]
    pub fn connections(&self) -> usize {
        self.connections.load(Ordering::SeqCst)
    }

    /// Copy of one table's rows, bypassing credential checks.
    #[cfg_attr(not(test), allow(dead_code))]
    pub async fn snapshot(&self, table_name: &str) -> Vec<Item> {
        let tables = self.tables.read().await;
        tables
            .get(table_name)
            .map(|rows| rows.values().cloned().collect())
            .unwrap_or_default()
    }
}

impl TableConnector for InMemoryStore {
    fn connect(
        &self,
        schema: &TableSchema,
        credentials: Credentials,
        _settings: &StoreSettings,
    ) -> Box<dyn KeyedTable> {
        self.connections.fetch_add(1, Ordering::SeqCst);
        Box::new(InMemoryTable {
            schema: schema.clone(),
            credentials,
            tables: Arc::clone(&self.tables),
            failure: Arc::clone(&self.failure),
        })
    }
}

/// One table of an [`InMemoryStore`], bound to one credential set.
pub struct InMemoryTable {
    schema: TableSchema,
    credentials: Credentials,
    tables: Arc<RwLock<HashMap<String, Rows>>>,
    failure: Arc<RwLock<Option<StoreError>>>,
}

impl InMemoryTable {
    async fn injected_failure(&self) -> Result<()> {
        match self.failure.read().await.clone() {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }

    fn authorize(&self, key: &Key) -> Result<()> {
        self.schema.validate_key(key)?;
        self.credentials.authorize(&key.value, Utc::now())
    }
}

#[async_trait]
impl KeyedTable for InMemoryTable {
    fn schema(&self) -> &TableSchema {
        &self.schema
    }

    async fn get_item(&self, key: &Key) -> Result<Option<Item>> {
        self.injected_failure().await?;
        self.authorize(key)?;

        let tables = self.tables.read().await;
        Ok(tables
            .get(&self.schema.table_name)
            .and_then(|rows| rows.get(&key.value))
            .cloned())
    }

    async fn scan(&self, params: &ScanParams) -> Result<Vec<Item>> {
        self.injected_failure().await?;
        if self.credentials.is_expired(Utc::now()) {
            return Err(StoreError::Forbidden(
                "the security token included in the request is expired".to_string(),
            ));
        }

        let limit = params
            .limit
            .and_then(|limit| usize::try_from(limit).ok())
            .unwrap_or(usize::MAX);
        let scope = self.credentials.scope();

        let tables = self.tables.read().await;
        Ok(tables
            .get(&self.schema.table_name)
            .map(|rows| {
                rows.iter()
                    .filter(|(tenant_id, _)| scope.permits(tenant_id))
                    .map(|(_, item)| item.clone())
                    .take(limit)
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn put_item(&self, item: Item) -> Result<()> {
        self.injected_failure().await?;
        let key = self.schema.key_of(&item)?;
        self.authorize(&key)?;

        let mut tables = self.tables.write().await;
        tables
            .entry(self.schema.table_name.clone())
            .or_default()
            .insert(key.value, item);
        Ok(())
    }

    async fn update_item(&self, params: &UpdateParams) -> Result<Item> {
        self.injected_failure().await?;
        render_update_expression(params, &self.schema)?;
        self.authorize(&params.key)?;

        let mut tables = self.tables.write().await;
        let row = tables
            .entry(self.schema.table_name.clone())
            .or_default()
            .entry(params.key.value.clone())
            .or_insert_with(|| {
                let mut item = Item::new();
                item.insert(
                    params.key.attribute.clone(),
                    Value::String(params.key.value.clone()),
                );
                item
            });

        for (attribute, value) in &params.assignments {
            row.insert(attribute.clone(), value.clone());
        }

        Ok(match params.return_values {
            ReturnValues::None => Item::new(),
            ReturnValues::UpdatedNew => params.assignments.iter().cloned().collect(),
            ReturnValues::AllNew => row.clone(),
        })
    }

    async fn delete_item(&self, params: &DeleteParams) -> Result<()> {
        self.injected_failure().await?;
        self.authorize(&params.key)?;

        let mut tables = self.tables.write().await;
        if let Some(rows) = tables.get_mut(&self.schema.table_name) {
            rows.remove(&params.key.value);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use serde_json::json;
    use tenant_manager_core::credentials::CredentialScope;

    fn schema() -> TableSchema {
        TableSchema::new("TenantBootstrap", "tenant_id")
    }

    fn credentials(scope: CredentialScope) -> Credentials {
        Credentials::new("local", "local", None, None, scope)
    }

    fn system_table(store: &InMemoryStore) -> Box<dyn KeyedTable> {
        store.connect(
            &schema(),
            credentials(CredentialScope::System),
            &StoreSettings::default(),
        )
    }

    fn tenant_table(store: &InMemoryStore, tenant_id: &str) -> Box<dyn KeyedTable> {
        store.connect(
            &schema(),
            credentials(CredentialScope::Tenant(tenant_id.to_string())),
            &StoreSettings::default(),
        )
    }

    fn tenant(id: &str) -> Item {
        json!({"tenant_id": id, "companyName": format!("{id} Inc"), "tier": "basic"})
            .as_object()
            .unwrap()
            .clone()
    }

    #[tokio::test]
    async fn test_put_then_get() {
        let store = InMemoryStore::new();
        let table = system_table(&store);

        table.put_item(tenant("t1")).await.unwrap();
        let fetched = table.get_item(&schema().key("t1")).await.unwrap();

        assert_eq!(fetched, Some(tenant("t1")));
    }

    #[tokio::test]
    async fn test_get_absent_is_none() {
        let store = InMemoryStore::new();
        let fetched = system_table(&store)
            .get_item(&schema().key("missing"))
            .await
            .unwrap();
        assert!(fetched.is_none());
    }

    #[tokio::test]
    async fn test_put_overwrites() {
        let store = InMemoryStore::new();
        let table = system_table(&store);

        table.put_item(tenant("t1")).await.unwrap();
        let replacement = json!({"tenant_id": "t1"}).as_object().unwrap().clone();
        table.put_item(replacement.clone()).await.unwrap();

        let fetched = table.get_item(&schema().key("t1")).await.unwrap();
        assert_eq!(fetched, Some(replacement));
    }

    #[tokio::test]
    async fn test_put_without_key_is_validation_error() {
        let store = InMemoryStore::new();
        let item = json!({"companyName": "Acme"}).as_object().unwrap().clone();

        let result = system_table(&store).put_item(item).await;

        assert!(matches!(result, Err(StoreError::Validation(_))));
    }

    #[tokio::test]
    async fn test_scan_filters_by_scope() {
        let store = InMemoryStore::new();
        let system = system_table(&store);
        for id in ["t1", "t2", "t3"] {
            system.put_item(tenant(id)).await.unwrap();
        }

        assert_eq!(system.scan(&ScanParams::default()).await.unwrap().len(), 3);

        let visible = tenant_table(&store, "t2")
            .scan(&ScanParams::default())
            .await
            .unwrap();
        assert_eq!(visible, vec![tenant("t2")]);
    }

    #[tokio::test]
    async fn test_scan_limit() {
        let store = InMemoryStore::new();
        let system = system_table(&store);
        for id in ["t1", "t2", "t3"] {
            system.put_item(tenant(id)).await.unwrap();
        }

        let page = system
            .scan(&ScanParams::default().with_limit(2))
            .await
            .unwrap();

        assert_eq!(page.len(), 2);
    }

    #[tokio::test]
    async fn test_tenant_scope_cannot_touch_other_rows() {
        let store = InMemoryStore::new();
        system_table(&store).put_item(tenant("t2")).await.unwrap();
        let table = tenant_table(&store, "t1");

        let key = schema().key("t2");
        assert!(matches!(
            table.get_item(&key).await,
            Err(StoreError::Forbidden(_))
        ));
        assert!(matches!(
            table
                .update_item(&UpdateParams::new(key.clone()).set("tier", "gold"))
                .await,
            Err(StoreError::Forbidden(_))
        ));
        assert!(matches!(
            table.delete_item(&DeleteParams::new(key)).await,
            Err(StoreError::Forbidden(_))
        ));

        assert_eq!(store.snapshot("TenantBootstrap").await, vec![tenant("t2")]);
    }

    #[tokio::test]
    async fn test_update_returns_updated_attributes_only() {
        let store = InMemoryStore::new();
        let table = system_table(&store);
        table.put_item(tenant("t1")).await.unwrap();

        let updated = table
            .update_item(
                &UpdateParams::new(schema().key("t1"))
                    .set("tier", "gold")
                    .set("status", "active"),
            )
            .await
            .unwrap();

        assert_eq!(
            Value::Object(updated),
            json!({"tier": "gold", "status": "active"})
        );
        let stored = table.get_item(&schema().key("t1")).await.unwrap().unwrap();
        assert_eq!(stored["companyName"], json!("t1 Inc"));
        assert_eq!(stored["tier"], json!("gold"));
    }

    #[tokio::test]
    async fn test_update_all_new_and_upsert() {
        let store = InMemoryStore::new();
        let table = system_table(&store);

        let updated = table
            .update_item(
                &UpdateParams::new(schema().key("t9"))
                    .set("tier", "gold")
                    .return_values(ReturnValues::AllNew),
            )
            .await
            .unwrap();

        assert_eq!(
            Value::Object(updated),
            json!({"tenant_id": "t9", "tier": "gold"})
        );
    }

    #[tokio::test]
    async fn test_update_rejects_key_assignment() {
        let store = InMemoryStore::new();
        let result = system_table(&store)
            .update_item(&UpdateParams::new(schema().key("t1")).set("tenant_id", "t2"))
            .await;
        assert!(matches!(result, Err(StoreError::Validation(_))));
    }

    #[tokio::test]
    async fn test_delete_is_idempotent() {
        let store = InMemoryStore::new();
        let table = system_table(&store);
        table.put_item(tenant("t1")).await.unwrap();

        let params = DeleteParams::new(schema().key("t1"));
        table.delete_item(&params).await.unwrap();
        table.delete_item(&params).await.unwrap();

        assert!(store.snapshot("TenantBootstrap").await.is_empty());
    }

    #[tokio::test]
    async fn test_expired_credentials_are_forbidden() {
        let store = InMemoryStore::new();
        let expired = Credentials::new(
            "local",
            "local",
            None,
            Some(Utc::now() - Duration::minutes(5)),
            CredentialScope::System,
        );
        let table = store.connect(&schema(), expired, &StoreSettings::default());

        assert!(matches!(
            table.scan(&ScanParams::default()).await,
            Err(StoreError::Forbidden(_))
        ));
        assert!(matches!(
            table.get_item(&schema().key("t1")).await,
            Err(StoreError::Forbidden(_))
        ));
    }

    #[tokio::test]
    async fn test_injected_failure() {
        let store = InMemoryStore::new();
        let table = system_table(&store);
        store
            .set_failure(Some(StoreError::BackendUnavailable("throttled".into())))
            .await;

        assert_eq!(
            table.scan(&ScanParams::default()).await,
            Err(StoreError::BackendUnavailable("throttled".into()))
        );

        store.set_failure(None).await;
        assert!(table.scan(&ScanParams::default()).await.is_ok());
    }

    #[tokio::test]
    async fn test_each_connect_is_counted() {
        let store = InMemoryStore::new();
        system_table(&store);
        tenant_table(&store, "t1");
        assert_eq!(store.connections(), 2);
    }
}
