//! Pure functions that turn request input into store parameters.

use serde_json::Value;

use crate::storage::{DeleteParams, Item, Key, ProvisionedThroughput, TableSchema};

use super::{validate_tenant_id, TenantError, TENANT_ID};

/// The tenant table declaration: `tenant_id` string partition key,
/// 5 read / 5 write capacity units.
pub fn tenant_table_schema(table_name: impl Into<String>) -> TableSchema {
    TableSchema::new(table_name, TENANT_ID).with_throughput(ProvisionedThroughput {
        read_capacity_units: 5,
        write_capacity_units: 5,
    })
}

/// Builds the key for a tenant id taken from a path or body.
pub fn tenant_key(schema: &TableSchema, tenant_id: &str) -> Result<Key, TenantError> {
    validate_tenant_id(tenant_id)?;
    Ok(schema.key(tenant_id))
}

/// Builds the delete parameters for a tenant id.
pub fn tenant_delete_params(
    schema: &TableSchema,
    tenant_id: &str,
) -> Result<DeleteParams, TenantError> {
    tenant_key(schema, tenant_id).map(DeleteParams::new)
}

/// Validates a create body and returns it verbatim as the item to store.
///
/// The body must be a JSON object with a non-empty string `tenant_id`;
/// every other attribute is stored as supplied.
pub fn new_tenant_item(body: Value) -> Result<Item, TenantError> {
    let Value::Object(item) = body else {
        return Err(TenantError::NotAnObject);
    };

    match item.get(TENANT_ID) {
        Some(Value::String(id)) => validate_tenant_id(id)?,
        Some(_) => {
            return Err(TenantError::InvalidRecord(
                "tenant_id must be a string".to_string(),
            ))
        }
        None => return Err(TenantError::MissingTenantId),
    }

    Ok(item)
}
