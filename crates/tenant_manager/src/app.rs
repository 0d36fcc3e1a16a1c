use axum::{
    http::{header, HeaderName, Method},
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::{
    handlers::{
        health::health,
        tenants::{create_tenant, delete_tenant, get_tenant, list_tenants, update_tenant},
    },
    state::AppState,
};

/// Create the application router with all routes and middleware.
pub fn create_app(state: AppState) -> Router {
    // Any origin; headers used by API gateway style clients
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::OPTIONS,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
        ])
        .allow_headers([
            header::CONTENT_TYPE,
            header::ORIGIN,
            header::AUTHORIZATION,
            HeaderName::from_static("x-amz-date"),
            HeaderName::from_static("x-api-key"),
            HeaderName::from_static("x-amz-security-token"),
            HeaderName::from_static("x-requested-with"),
        ]);

    Router::new()
        .route("/tenant/health", get(health))
        .route("/tenant", post(create_tenant).put(update_tenant))
        .route("/tenant/{id}", get(get_tenant).delete(delete_tenant))
        .route("/tenants", get(list_tenants))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
