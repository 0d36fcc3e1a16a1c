use serde::Deserialize;

use crate::storage::{ReturnValues, TableSchema, UpdateParams};

use super::{validate_tenant_id, TenantError, MUTABLE_ATTRIBUTES};

/// Request body for `PUT /tenant`.
///
/// Only the attributes present in the body are written; absent ones keep
/// their stored value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTenantRequest {
    #[serde(default, alias = "tenant_id")]
    pub id: Option<String>,
    #[serde(default)]
    pub company_name: Option<String>,
    #[serde(default)]
    pub account_name: Option<String>,
    #[serde(default)]
    pub owner_name: Option<String>,
    #[serde(default)]
    pub tier: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
}

impl UpdateTenantRequest {
    /// Builds the keyed update for this request.
    ///
    /// Fails if the id is missing or no mutable attribute is present.
    pub fn into_update_params(self, schema: &TableSchema) -> Result<UpdateParams, TenantError> {
        let id = self.id.ok_or(TenantError::MissingTenantId)?;
        validate_tenant_id(&id)?;

        // Same order as MUTABLE_ATTRIBUTES
        let values = [
            self.company_name,
            self.account_name,
            self.owner_name,
            self.tier,
            self.status,
        ];

        let params = MUTABLE_ATTRIBUTES
            .into_iter()
            .zip(values)
            .filter_map(|(attribute, value)| value.map(|v| (attribute, v)))
            .fold(UpdateParams::new(schema.key(id)), |params, (attribute, value)| {
                params.set(attribute, value)
            })
            .return_values(ReturnValues::UpdatedNew);

        if params.assignments.is_empty() {
            return Err(TenantError::EmptyUpdate);
        }

        Ok(params)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tenant::tenant_table_schema;
    use serde_json::json;

    #[test]
    fn test_full_body_sets_all_five_attributes() {
        let request: UpdateTenantRequest = serde_json::from_value(json!({
            "id": "t1",
            "companyName": "Acme",
            "accountName": "acme-prod",
            "ownerName": "Jo",
            "tier": "platinum",
            "status": "active"
        }))
        .unwrap();

        let params = request
            .into_update_params(&tenant_table_schema("TenantBootstrap"))
            .unwrap();

        assert_eq!(params.key.attribute, "tenant_id");
        assert_eq!(params.key.value, "t1");
        let names: Vec<&str> = params.assignments.iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(
            names,
            vec!["companyName", "accountName", "ownerName", "tier", "status"]
        );
        assert_eq!(params.return_values, ReturnValues::UpdatedNew);
    }

    #[test]
    fn test_absent_fields_are_not_assigned() {
        let request: UpdateTenantRequest =
            serde_json::from_value(json!({"id": "t1", "tier": "platinum"})).unwrap();

        let params = request
            .into_update_params(&tenant_table_schema("TenantBootstrap"))
            .unwrap();

        assert_eq!(params.assignments, vec![("tier".to_string(), json!("platinum"))]);
    }

    #[test]
    fn test_tenant_id_alias_is_accepted() {
        let request: UpdateTenantRequest =
            serde_json::from_value(json!({"tenant_id": "t1", "status": "inactive"})).unwrap();
        assert_eq!(request.id.as_deref(), Some("t1"));
    }

    #[test]
    fn test_missing_id_is_rejected() {
        let request = UpdateTenantRequest {
            tier: Some("gold".to_string()),
            ..Default::default()
        };
        let result = request.into_update_params(&tenant_table_schema("TenantBootstrap"));
        assert_eq!(result, Err(TenantError::MissingTenantId));
    }

    #[test]
    fn test_update_without_attributes_is_rejected() {
        let request = UpdateTenantRequest {
            id: Some("t1".to_string()),
            ..Default::default()
        };
        let result = request.into_update_params(&tenant_table_schema("TenantBootstrap"));
        assert_eq!(result, Err(TenantError::EmptyUpdate));
    }
}
