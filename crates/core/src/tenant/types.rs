use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::storage::Item;

use super::TenantError;

/// Partition key attribute of the tenant table.
pub const TENANT_ID: &str = "tenant_id";
pub const COMPANY_NAME: &str = "companyName";
pub const ACCOUNT_NAME: &str = "accountName";
pub const OWNER_NAME: &str = "ownerName";
pub const TIER: &str = "tier";
pub const STATUS: &str = "status";

/// The attributes an update may change. `tenant_id` is never among them.
pub const MUTABLE_ATTRIBUTES: [&str; 5] = [COMPANY_NAME, ACCOUNT_NAME, OWNER_NAME, TIER, STATUS];

/// One customer organization in the multi-tenant system.
///
/// Attributes other than the six known ones are kept in `extra` so a record
/// survives a round trip unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tenant {
    #[serde(rename = "tenant_id")]
    pub tenant_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub account_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tier: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Tenant {
    /// Creates a tenant with only its id set.
    pub fn new(tenant_id: impl Into<String>) -> Self {
        Self {
            tenant_id: tenant_id.into(),
            company_name: None,
            account_name: None,
            owner_name: None,
            tier: None,
            status: None,
            extra: Map::new(),
        }
    }

    pub fn with_company_name(mut self, company_name: impl Into<String>) -> Self {
        self.company_name = Some(company_name.into());
        self
    }

    pub fn with_account_name(mut self, account_name: impl Into<String>) -> Self {
        self.account_name = Some(account_name.into());
        self
    }

    pub fn with_owner_name(mut self, owner_name: impl Into<String>) -> Self {
        self.owner_name = Some(owner_name.into());
        self
    }

    pub fn with_tier(mut self, tier: impl Into<String>) -> Self {
        self.tier = Some(tier.into());
        self
    }

    pub fn with_status(mut self, status: impl Into<String>) -> Self {
        self.status = Some(status.into());
        self
    }

    /// Converts the tenant into a storable item.
    pub fn into_item(self) -> Item {
        match serde_json::to_value(self) {
            Ok(Value::Object(map)) => map,
            // A struct with string fields always serializes to an object.
            _ => Map::new(),
        }
    }
}

/// Checks that a tenant id is usable as a partition key value.
pub fn validate_tenant_id(tenant_id: &str) -> Result<(), TenantError> {
    if tenant_id.trim().is_empty() {
        return Err(TenantError::MissingTenantId);
    }
    Ok(())
}
