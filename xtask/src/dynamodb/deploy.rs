//! Table deployment operations (Imperative Shell).

use super::client;
use super::error::{DynamodbError, Result};
use super::planning::{DeployPlan, DestroyPlan, TableStatus};
use aws_sdk_dynamodb::types::{
    AttributeDefinition, BillingMode, KeySchemaElement, KeyType, ScalarAttributeType,
};
use aws_sdk_dynamodb::Client;
use std::time::Duration;
use tenant_manager_core::storage::{AttributeType, ProvisionedThroughput, TableSchema};

/// Execute a deploy plan.
pub async fn execute_deploy_plan(client: &Client, plan: &DeployPlan) -> Result<()> {
    match plan {
        DeployPlan::CreateTable { schema } => {
            create_table(client, schema).await?;
            wait_for_table_active(client, &schema.table_name).await?;
        }
        DeployPlan::UpdateThroughput {
            table_name,
            desired,
            ..
        } => {
            update_throughput(client, table_name, *desired).await?;
            wait_for_table_active(client, table_name).await?;
        }
        DeployPlan::KeyMismatch {
            table_name,
            expected,
            actual,
        } => {
            return Err(DynamodbError::KeyMismatch {
                table_name: table_name.clone(),
                expected: expected.clone(),
                actual: actual.clone(),
            });
        }
        DeployPlan::NoChanges { .. } => {}
    }
    Ok(())
}

/// Execute a destroy plan.
pub async fn execute_destroy_plan(client: &Client, plan: &DestroyPlan) -> Result<()> {
    match plan {
        DestroyPlan::DeleteTable { table_name } => {
            delete_table(client, table_name).await?;
        }
        DestroyPlan::AlreadyGone { .. } => {}
    }
    Ok(())
}

async fn create_table(client: &Client, schema: &TableSchema) -> Result<()> {
    let key = &schema.partition_key;

    let key_schema = KeySchemaElement::builder()
        .attribute_name(&key.name)
        .key_type(KeyType::Hash)
        .build()
        .map_err(|e| DynamodbError::AwsSdk(e.to_string()))?;

    let attribute_definition = AttributeDefinition::builder()
        .attribute_name(&key.name)
        .attribute_type(to_scalar_type(key.attribute_type))
        .build()
        .map_err(|e| DynamodbError::AwsSdk(e.to_string()))?;

    client
        .create_table()
        .table_name(&schema.table_name)
        .key_schema(key_schema)
        .attribute_definitions(attribute_definition)
        .billing_mode(BillingMode::Provisioned)
        .provisioned_throughput(to_sdk_throughput(schema.throughput)?)
        .send()
        .await
        .map_err(|e| DynamodbError::AwsSdk(e.into_service_error().to_string()))?;
    Ok(())
}

async fn update_throughput(
    client: &Client,
    table_name: &str,
    throughput: ProvisionedThroughput,
) -> Result<()> {
    client
        .update_table()
        .table_name(table_name)
        .billing_mode(BillingMode::Provisioned)
        .provisioned_throughput(to_sdk_throughput(throughput)?)
        .send()
        .await
        .map_err(|e| DynamodbError::AwsSdk(e.into_service_error().to_string()))?;
    Ok(())
}

async fn delete_table(client: &Client, table_name: &str) -> Result<()> {
    client
        .delete_table()
        .table_name(table_name)
        .send()
        .await
        .map_err(|e| DynamodbError::AwsSdk(e.into_service_error().to_string()))?;
    Ok(())
}

async fn wait_for_table_active(client: &Client, table_name: &str) -> Result<()> {
    let max_attempts = 60;
    let delay = Duration::from_secs(2);

    for _ in 0..max_attempts {
        if let Some(state) = client::get_table_state(client, table_name).await? {
            if state.status == TableStatus::Active {
                return Ok(());
            }
        }
        tokio::time::sleep(delay).await;
    }

    Err(DynamodbError::TableActivationTimeout)
}

fn to_sdk_throughput(
    throughput: ProvisionedThroughput,
) -> Result<aws_sdk_dynamodb::types::ProvisionedThroughput> {
    aws_sdk_dynamodb::types::ProvisionedThroughput::builder()
        .read_capacity_units(throughput.read_capacity_units)
        .write_capacity_units(throughput.write_capacity_units)
        .build()
        .map_err(|e| DynamodbError::AwsSdk(e.to_string()))
}

fn to_scalar_type(attr_type: AttributeType) -> ScalarAttributeType {
    match attr_type {
        AttributeType::String => ScalarAttributeType::S,
    }
}
