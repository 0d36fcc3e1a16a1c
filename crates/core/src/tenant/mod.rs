mod error;
mod operations;
mod requests;
mod types;

pub use error::TenantError;
pub use operations::{new_tenant_item, tenant_delete_params, tenant_key, tenant_table_schema};
pub use requests::UpdateTenantRequest;
pub use types::{
    validate_tenant_id, Tenant, ACCOUNT_NAME, COMPANY_NAME, MUTABLE_ATTRIBUTES, OWNER_NAME,
    STATUS, TENANT_ID, TIER,
};
