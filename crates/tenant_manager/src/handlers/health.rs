//! Health check endpoint.

use axum::{extract::State, Json};
use serde::Serialize;

use crate::state::AppState;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthStatus {
    pub service: String,
    pub is_alive: bool,
}

/// GET /tenant/health - Liveness check.
///
/// Unauthenticated and never touches the store.
#[axum::debug_handler]
pub async fn health(State(state): State<AppState>) -> Json<HealthStatus> {
    Json(HealthStatus {
        service: state.config.service_name.clone(),
        is_alive: true,
    })
}
