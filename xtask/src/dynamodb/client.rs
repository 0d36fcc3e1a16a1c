//! AWS SDK client setup (Imperative Shell).

use super::error::{DynamodbError, Result};
use super::planning::{TableState, TableStatus};
use aws_sdk_dynamodb::types::{BillingMode, KeyType};
use aws_sdk_dynamodb::Client;
use tenant_manager_core::storage::ProvisionedThroughput;

/// AWS client configuration.
#[derive(Debug, Clone)]
pub struct AwsConfig {
    /// Custom endpoint URL (for local DynamoDB).
    pub endpoint_url: Option<String>,
    /// AWS region.
    pub region: String,
}

impl Default for AwsConfig {
    fn default() -> Self {
        Self {
            endpoint_url: std::env::var("AWS_ENDPOINT_URL").ok(),
            region: std::env::var("AWS_REGION").unwrap_or_else(|_| "us-east-1".to_string()),
        }
    }
}

impl AwsConfig {
    /// Returns a display string for the target environment.
    pub fn target_display(&self) -> String {
        match &self.endpoint_url {
            Some(url) => format!("Local DynamoDB ({})", url),
            None => format!("AWS DynamoDB (region: {})", self.region),
        }
    }
}

/// Creates a DynamoDB client with the given configuration.
pub async fn create_client(config: &AwsConfig) -> Client {
    let mut sdk_config_loader = aws_config::defaults(aws_config::BehaviorVersion::latest())
        .region(aws_config::Region::new(config.region.clone()));

    if let Some(endpoint) = &config.endpoint_url {
        sdk_config_loader = sdk_config_loader.endpoint_url(endpoint);
    }

    let sdk_config = sdk_config_loader.load().await;
    Client::new(&sdk_config)
}

/// Fetches current table state, returns None if table doesn't exist.
pub async fn get_table_state(client: &Client, table_name: &str) -> Result<Option<TableState>> {
    let response = match client.describe_table().table_name(table_name).send().await {
        Ok(response) => response,
        Err(err) => {
            let err = err.into_service_error();
            if err.is_resource_not_found_exception() {
                return Ok(None);
            }
            return Err(DynamodbError::AwsSdk(err.to_string()));
        }
    };

    let table = response.table().ok_or_else(|| {
        DynamodbError::AwsSdk(format!("no description returned for table '{table_name}'"))
    })?;

    let partition_key = table
        .key_schema()
        .iter()
        .find(|element| element.key_type() == &KeyType::Hash)
        .map(|element| element.attribute_name().to_string())
        .unwrap_or_default();

    let status = match table.table_status() {
        Some(aws_sdk_dynamodb::types::TableStatus::Active) => TableStatus::Active,
        Some(aws_sdk_dynamodb::types::TableStatus::Creating) => TableStatus::Creating,
        Some(aws_sdk_dynamodb::types::TableStatus::Updating) => TableStatus::Updating,
        Some(aws_sdk_dynamodb::types::TableStatus::Deleting) => TableStatus::Deleting,
        _ => TableStatus::Active,
    };

    let on_demand = matches!(
        table.billing_mode_summary().and_then(|s| s.billing_mode()),
        Some(BillingMode::PayPerRequest)
    );

    let throughput = if on_demand {
        None
    } else {
        table.provisioned_throughput().map(|t| ProvisionedThroughput {
            read_capacity_units: t.read_capacity_units().unwrap_or_default(),
            write_capacity_units: t.write_capacity_units().unwrap_or_default(),
        })
    };

    Ok(Some(TableState {
        status,
        partition_key,
        throughput,
    }))
}
