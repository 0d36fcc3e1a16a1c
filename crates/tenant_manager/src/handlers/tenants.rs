//! Tenant CRUD handlers.
//!
//! Every handler resolves credentials first, then builds a table handle bound
//! to exactly those credentials for the one store call it makes. Create uses
//! system credentials; everything else runs under the caller's.

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    Json,
};
use serde_json::{json, Value};

use tenant_manager_core::{
    storage::{ScanParams, StoreError},
    tenant::{new_tenant_item, tenant_delete_params, tenant_key, UpdateTenantRequest},
};

use crate::{
    context::RequestContext,
    handlers::{ApiError, Operation},
    state::AppState,
};

fn success() -> Json<Value> {
    Json(json!({ "status": "success" }))
}

fn body_error(rejection: JsonRejection) -> StoreError {
    StoreError::Validation(rejection.body_text())
}

fn path_error(rejection: PathRejection) -> StoreError {
    StoreError::Validation(rejection.body_text())
}

/// Get a tenant by id (GET /tenant/{id}).
///
/// An absent tenant is `200 {}`.
pub async fn get_tenant(
    State(state): State<AppState>,
    ctx: RequestContext,
    id: Result<Path<String>, PathRejection>,
) -> Result<Json<Value>, ApiError> {
    let op = Operation::GetTenant;
    let Path(id) = id.map_err(|rejection| state.reject(op, path_error(rejection)))?;
    tracing::debug!(tenant_id = %id, request_id = %ctx.request_id, "Fetching tenant");

    let credentials = state
        .resolver
        .resolve_from_request(ctx.bearer_token())
        .await
        .map_err(|e| state.reject(op, e))?;
    let key = tenant_key(&state.schema, &id).map_err(|e| state.reject(op, e))?;

    let item = state
        .table(credentials)
        .get_item(&key)
        .await
        .map_err(|e| state.reject(op, e))?;

    tracing::debug!(tenant_id = %id, found = item.is_some(), "Tenant retrieved");

    Ok(Json(Value::Object(item.unwrap_or_default())))
}

/// List every tenant visible to the caller (GET /tenants).
pub async fn list_tenants(
    State(state): State<AppState>,
    ctx: RequestContext,
) -> Result<Json<Value>, ApiError> {
    let op = Operation::ListTenants;
    tracing::debug!(request_id = %ctx.request_id, "Getting all tenants");

    let credentials = state
        .resolver
        .resolve_from_request(ctx.bearer_token())
        .await
        .map_err(|e| state.reject(op, e))?;

    let items = state
        .table(credentials)
        .scan(&ScanParams::default())
        .await
        .map_err(|e| state.reject(op, e))?;

    tracing::debug!(count = items.len(), "Tenants retrieved");

    Ok(Json(Value::Array(
        items.into_iter().map(Value::Object).collect(),
    )))
}

/// Create (or overwrite) a tenant (POST /tenant).
///
/// The body is stored as supplied once it carries a valid `tenant_id`.
pub async fn create_tenant(
    State(state): State<AppState>,
    ctx: RequestContext,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Json<Value>, ApiError> {
    let op = Operation::CreateTenant;
    tracing::debug!(request_id = %ctx.request_id, "Creating Tenant");

    let Json(body) = body.map_err(|e| state.reject(op, body_error(e)))?;
    let item = new_tenant_item(body).map_err(|e| state.reject(op, e))?;

    let credentials = state
        .resolver
        .resolve_system_credentials()
        .await
        .map_err(|e| state.reject(op, e))?;

    let table = state.table(credentials);
    let key = table.schema().key_of(&item).map_err(|e| state.reject(op, e))?;
    table.put_item(item).await.map_err(|e| state.reject(op, e))?;

    tracing::info!(tenant_id = %key.value, "Created tenant");

    Ok(success())
}

/// Update the mutable attributes of a tenant (PUT /tenant).
///
/// Only attributes present in the body are written. Responds with the
/// updated attributes.
pub async fn update_tenant(
    State(state): State<AppState>,
    ctx: RequestContext,
    body: Result<Json<UpdateTenantRequest>, JsonRejection>,
) -> Result<Json<Value>, ApiError> {
    let op = Operation::UpdateTenant;

    let Json(request) = body.map_err(|e| state.reject(op, body_error(e)))?;
    tracing::debug!(
        tenant_id = request.id.as_deref().unwrap_or("-"),
        request_id = %ctx.request_id,
        "Updating tenant"
    );

    let credentials = state
        .resolver
        .resolve_from_request(ctx.bearer_token())
        .await
        .map_err(|e| state.reject(op, e))?;
    let params = request
        .into_update_params(&state.schema)
        .map_err(|e| state.reject(op, e))?;

    let attributes = state
        .table(credentials)
        .update_item(&params)
        .await
        .map_err(|e| state.reject(op, e))?;

    tracing::info!(tenant_id = %params.key.value, "Updated tenant");

    Ok(Json(Value::Object(attributes)))
}

/// Delete a tenant (DELETE /tenant/{id}). Deleting an absent tenant succeeds.
pub async fn delete_tenant(
    State(state): State<AppState>,
    ctx: RequestContext,
    id: Result<Path<String>, PathRejection>,
) -> Result<Json<Value>, ApiError> {
    let op = Operation::DeleteTenant;
    let Path(id) = id.map_err(|rejection| state.reject(op, path_error(rejection)))?;
    tracing::debug!(tenant_id = %id, request_id = %ctx.request_id, "Deleting Tenant");

    let credentials = state
        .resolver
        .resolve_from_request(ctx.bearer_token())
        .await
        .map_err(|e| state.reject(op, e))?;
    let params = tenant_delete_params(&state.schema, &id).map_err(|e| state.reject(op, e))?;

    state
        .table(credentials)
        .delete_item(&params)
        .await
        .map_err(|e| state.reject(op, e))?;

    tracing::info!(tenant_id = %id, "Deleted tenant");

    Ok(success())
}
