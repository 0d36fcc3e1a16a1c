//! Credential-bound DynamoDB table handles.
//!
//! Every handle owns its own `Client` built from the request's credentials.
//! Nothing here reads the process-wide default credential chain.

use std::collections::HashMap;
use std::time::SystemTime;

use async_trait::async_trait;
use aws_sdk_dynamodb::config::{BehaviorVersion, Region};
use aws_sdk_dynamodb::operation::put_item::builders::PutItemFluentBuilder;
use aws_sdk_dynamodb::operation::scan::builders::ScanFluentBuilder;
use aws_sdk_dynamodb::operation::update_item::builders::UpdateItemFluentBuilder;
use aws_sdk_dynamodb::types::{AttributeValue, ReturnValue};
use aws_sdk_dynamodb::Client;
use chrono::Utc;

use tenant_manager_core::credentials::{CredentialScope, Credentials};
use tenant_manager_core::storage::conversions::{
    attributes_to_item, item_to_attributes, json_to_attribute,
};
use tenant_manager_core::storage::{
    render_update_expression, DeleteParams, Item, Key, KeyedTable, Result, ReturnValues,
    ScanParams, StoreError, StoreSettings, TableConnector, TableSchema, UpdateParams,
};

use super::error::{
    map_delete_item_error, map_get_item_error, map_put_item_error, map_scan_error,
    map_update_item_error,
};

/// Name reported to the SDK as the origin of request credentials.
const CREDENTIALS_PROVIDER_NAME: &str = "tenant-manager";

/// Builds a [`DynamoDbTable`] per request.
#[derive(Debug, Clone, Copy, Default)]
pub struct DynamoDbConnector;

impl TableConnector for DynamoDbConnector {
    fn connect(
        &self,
        schema: &TableSchema,
        credentials: Credentials,
        settings: &StoreSettings,
    ) -> Box<dyn KeyedTable> {
        Box::new(DynamoDbTable::new(schema.clone(), credentials, settings))
    }
}

/// DynamoDB access to one table under one credential set.
pub struct DynamoDbTable {
    client: Client,
    schema: TableSchema,
    credentials: Credentials,
}

impl DynamoDbTable {
    /// Creates a handle whose client signs every call with `credentials`.
    pub fn new(schema: TableSchema, credentials: Credentials, settings: &StoreSettings) -> Self {
        let sdk_credentials = aws_sdk_dynamodb::config::Credentials::new(
            credentials.access_key_id(),
            credentials.secret_access_key(),
            credentials.session_token().map(str::to_string),
            credentials.expires_at().map(SystemTime::from),
            CREDENTIALS_PROVIDER_NAME,
        );

        let mut builder = aws_sdk_dynamodb::config::Builder::new()
            .behavior_version(BehaviorVersion::latest())
            .region(Region::new(settings.region.clone()))
            .credentials_provider(sdk_credentials);

        if let Some(endpoint) = &settings.endpoint_url {
            tracing::debug!(endpoint = %endpoint, "Using custom DynamoDB endpoint");
            builder = builder.endpoint_url(endpoint);
        }

        Self {
            client: Client::from_conf(builder.build()),
            schema,
            credentials,
        }
    }

    /// Get the table name.
    pub fn table_name(&self) -> &str {
        &self.schema.table_name
    }

    fn authorize(&self, key: &Key) -> Result<()> {
        self.schema.validate_key(key)?;
        self.credentials.authorize(&key.value, Utc::now())
    }

    fn key_attributes(key: &Key) -> HashMap<String, AttributeValue> {
        HashMap::from([(key.attribute.clone(), AttributeValue::S(key.value.clone()))])
    }

    fn scan_request(&self, params: &ScanParams) -> ScanFluentBuilder {
        let request = self
            .client
            .scan()
            .table_name(self.table_name())
            .set_limit(params.limit);

        // Tenant credentials only see their own partition.
        match self.credentials.scope() {
            CredentialScope::Tenant(tenant_id) => request
                .filter_expression("#pk = :scope")
                .expression_attribute_names("#pk", &self.schema.partition_key.name)
                .expression_attribute_values(":scope", AttributeValue::S(tenant_id.clone())),
            CredentialScope::System => request,
        }
    }

    fn put_request(&self, item: &Item) -> Result<PutItemFluentBuilder> {
        let key = self.schema.key_of(item)?;
        self.authorize(&key)?;

        Ok(self
            .client
            .put_item()
            .table_name(self.table_name())
            .set_item(Some(item_to_attributes(item)))
            .return_values(ReturnValue::None))
    }

    fn update_request(&self, params: &UpdateParams) -> Result<UpdateItemFluentBuilder> {
        let rendered = render_update_expression(params, &self.schema)?;
        self.authorize(&params.key)?;

        let names = (!rendered.names.is_empty()).then(|| rendered.names.into_iter().collect());
        let values = rendered
            .values
            .iter()
            .map(|(placeholder, value)| (placeholder.clone(), json_to_attribute(value)))
            .collect();

        Ok(self
            .client
            .update_item()
            .table_name(self.table_name())
            .set_key(Some(Self::key_attributes(&params.key)))
            .update_expression(rendered.expression)
            .set_expression_attribute_names(names)
            .set_expression_attribute_values(Some(values))
            .return_values(return_value(params.return_values)))
    }
}

fn return_value(return_values: ReturnValues) -> ReturnValue {
    match return_values {
        ReturnValues::None => ReturnValue::None,
        ReturnValues::UpdatedNew => ReturnValue::UpdatedNew,
        ReturnValues::AllNew => ReturnValue::AllNew,
    }
}

#[async_trait]
impl KeyedTable for DynamoDbTable {
    fn schema(&self) -> &TableSchema {
        &self.schema
    }

    async fn get_item(&self, key: &Key) -> Result<Option<Item>> {
        self.authorize(key)?;

        let result = self
            .client
            .get_item()
            .table_name(self.table_name())
            .set_key(Some(Self::key_attributes(key)))
            .send()
            .await
            .map_err(map_get_item_error)?;

        result.item.as_ref().map(attributes_to_item).transpose()
    }

    async fn scan(&self, params: &ScanParams) -> Result<Vec<Item>> {
        if self.credentials.is_expired(Utc::now()) {
            return Err(StoreError::Forbidden(
                "the security token included in the request is expired".to_string(),
            ));
        }

        let result = self
            .scan_request(params)
            .send()
            .await
            .map_err(map_scan_error)?;

        result
            .items
            .unwrap_or_default()
            .iter()
            .map(attributes_to_item)
            .collect()
    }

    async fn put_item(&self, item: Item) -> Result<()> {
        self.put_request(&item)?
            .send()
            .await
            .map_err(map_put_item_error)?;

        Ok(())
    }

    async fn update_item(&self, params: &UpdateParams) -> Result<Item> {
        let result = self
            .update_request(params)?
            .send()
            .await
            .map_err(map_update_item_error)?;

        Ok(result
            .attributes
            .as_ref()
            .map(attributes_to_item)
            .transpose()?
            .unwrap_or_default())
    }

    async fn delete_item(&self, params: &DeleteParams) -> Result<()> {
        self.authorize(&params.key)?;

        self.client
            .delete_item()
            .table_name(self.table_name())
            .set_key(Some(Self::key_attributes(&params.key)))
            .send()
            .await
            .map_err(map_delete_item_error)?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // These tests never reach the network: every case fails or is inspected
    // before a request is sent.

    fn schema() -> TableSchema {
        TableSchema::new("TenantBootstrap", "tenant_id")
    }

    fn settings() -> StoreSettings {
        StoreSettings {
            region: "eu-west-1".to_string(),
            endpoint_url: Some("http://localhost:8000".to_string()),
        }
    }

    fn tenant_table(tenant_id: &str) -> Box<dyn KeyedTable> {
        DynamoDbConnector.connect(
            &schema(),
            Credentials::new(
                "AKIDEXAMPLE",
                "secret",
                Some("session".to_string()),
                None,
                CredentialScope::Tenant(tenant_id.to_string()),
            ),
            &settings(),
        )
    }

    #[test]
    fn test_client_is_built_from_request_settings() {
        let table = DynamoDbTable::new(
            schema(),
            Credentials::new("AKIDEXAMPLE", "secret", None, None, CredentialScope::System),
            &settings(),
        );

        let config = table.client.config();
        assert_eq!(
            config.region().map(|r| r.to_string()),
            Some("eu-west-1".to_string())
        );
        assert_eq!(table.table_name(), "TenantBootstrap");
    }

    #[test]
    fn test_return_value_mapping() {
        assert_eq!(return_value(ReturnValues::None), ReturnValue::None);
        assert_eq!(
            return_value(ReturnValues::UpdatedNew),
            ReturnValue::UpdatedNew
        );
        assert_eq!(return_value(ReturnValues::AllNew), ReturnValue::AllNew);
    }

    #[tokio::test]
    async fn test_other_tenant_is_rejected_before_request() {
        let table = tenant_table("t1");
        let key = schema().key("t2");

        assert!(matches!(
            table.get_item(&key).await,
            Err(StoreError::Forbidden(_))
        ));
        assert!(matches!(
            table.delete_item(&DeleteParams::new(key)).await,
            Err(StoreError::Forbidden(_))
        ));
    }

    #[tokio::test]
    async fn test_invalid_update_is_rejected_before_request() {
        let table = tenant_table("t1");
        let params = UpdateParams::new(schema().key("t1"));

        assert!(matches!(
            table.update_item(&params).await,
            Err(StoreError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn test_put_without_key_is_rejected_before_request() {
        let table = tenant_table("t1");
        let mut item = Item::new();
        item.insert("companyName".to_string(), "Acme".into());

        assert!(matches!(
            table.put_item(item).await,
            Err(StoreError::Validation(_))
        ));
    }

    fn table_with_scope(scope: CredentialScope) -> DynamoDbTable {
        DynamoDbTable::new(
            schema(),
            Credentials::new("AKIDEXAMPLE", "secret", None, None, scope),
            &settings(),
        )
    }

    #[test]
    fn test_tenant_scan_filters_on_partition_key() {
        let table = table_with_scope(CredentialScope::Tenant("t1".to_string()));

        let request = table.scan_request(&ScanParams::default().with_limit(10));

        assert_eq!(request.get_table_name().as_deref(), Some("TenantBootstrap"));
        assert_eq!(request.get_limit(), &Some(10));
        assert_eq!(
            request.get_filter_expression().as_deref(),
            Some("#pk = :scope")
        );
        assert_eq!(
            request.get_expression_attribute_names(),
            &Some(HashMap::from([(
                "#pk".to_string(),
                "tenant_id".to_string()
            )]))
        );
        assert_eq!(
            request.get_expression_attribute_values(),
            &Some(HashMap::from([(
                ":scope".to_string(),
                AttributeValue::S("t1".to_string())
            )]))
        );
    }

    #[test]
    fn test_system_scan_has_no_filter() {
        let table = table_with_scope(CredentialScope::System);

        let request = table.scan_request(&ScanParams::default());

        assert_eq!(request.get_filter_expression(), &None);
        assert_eq!(request.get_expression_attribute_names(), &None);
        assert_eq!(request.get_expression_attribute_values(), &None);
        assert_eq!(request.get_limit(), &None);
    }

    #[test]
    fn test_put_request_returns_nothing() {
        let table = table_with_scope(CredentialScope::Tenant("t1".to_string()));
        let mut item = Item::new();
        item.insert("tenant_id".to_string(), "t1".into());
        item.insert("tier".to_string(), "gold".into());

        let request = table.put_request(&item).unwrap();

        assert_eq!(request.get_return_values(), &Some(ReturnValue::None));
        let attributes = request.get_item().as_ref().unwrap();
        assert_eq!(
            attributes.get("tenant_id"),
            Some(&AttributeValue::S("t1".to_string()))
        );
        assert_eq!(
            attributes.get("tier"),
            Some(&AttributeValue::S("gold".to_string()))
        );
    }

    #[test]
    fn test_update_request_wires_names_and_values() {
        let table = table_with_scope(CredentialScope::Tenant("t1".to_string()));
        let params = UpdateParams::new(schema().key("t1"))
            .set("tier", "platinum")
            .set("status", "suspended")
            .return_values(ReturnValues::UpdatedNew);

        let request = table.update_request(&params).unwrap();

        assert_eq!(
            request.get_update_expression().as_deref(),
            Some("SET tier = :v0, #status = :v1")
        );
        assert_eq!(
            request.get_key(),
            &Some(HashMap::from([(
                "tenant_id".to_string(),
                AttributeValue::S("t1".to_string())
            )]))
        );
        assert_eq!(
            request.get_expression_attribute_names(),
            &Some(HashMap::from([(
                "#status".to_string(),
                "status".to_string()
            )]))
        );
        assert_eq!(
            request.get_expression_attribute_values(),
            &Some(HashMap::from([
                (":v0".to_string(), AttributeValue::S("platinum".to_string())),
                (":v1".to_string(), AttributeValue::S("suspended".to_string())),
            ]))
        );
        assert_eq!(request.get_return_values(), &Some(ReturnValue::UpdatedNew));
    }

    #[test]
    fn test_update_without_reserved_names_omits_name_map() {
        let table = table_with_scope(CredentialScope::Tenant("t1".to_string()));
        let params = UpdateParams::new(schema().key("t1")).set("tier", "gold");

        let request = table.update_request(&params).unwrap();

        assert_eq!(request.get_expression_attribute_names(), &None);
    }
}
