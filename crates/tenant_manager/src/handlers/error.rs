use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use tenant_manager_core::{
    credentials::CredentialError,
    storage::{store_error_to_status_code, StoreError, FLATTENED_ERROR_STATUS},
    tenant::TenantError,
};

/// The tenant endpoint a failure happened in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    GetTenant,
    ListTenants,
    CreateTenant,
    UpdateTenant,
    DeleteTenant,
}

impl Operation {
    /// Generic message returned to the caller. Never carries failure details.
    pub fn error_message(self) -> &'static str {
        match self {
            Operation::GetTenant => "Error getting tenant",
            Operation::ListTenants => "Error retrieving tenants",
            Operation::CreateTenant => "Error creating tenant",
            Operation::UpdateTenant => "Error updating tenant",
            Operation::DeleteTenant => "Error deleting tenant",
        }
    }
}

/// What went wrong while serving a tenant request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiErrorKind {
    Credentials(CredentialError),
    Store(StoreError),
}

impl std::fmt::Display for ApiErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ApiErrorKind::Credentials(err) => write!(f, "{err}"),
            ApiErrorKind::Store(err) => write!(f, "{err}"),
        }
    }
}

impl From<CredentialError> for ApiErrorKind {
    fn from(err: CredentialError) -> Self {
        ApiErrorKind::Credentials(err)
    }
}

impl From<StoreError> for ApiErrorKind {
    fn from(err: StoreError) -> Self {
        ApiErrorKind::Store(err)
    }
}

impl From<TenantError> for ApiErrorKind {
    fn from(err: TenantError) -> Self {
        ApiErrorKind::Store(err.into())
    }
}

/// Error response for the tenant endpoints.
///
/// Always answers `{"Error": "<generic message>"}`. The status is a flat 400
/// unless `detailed` is set, in which case it reflects the failure class.
#[derive(Debug)]
pub struct ApiError {
    pub operation: Operation,
    pub kind: ApiErrorKind,
    pub detailed: bool,
}

impl ApiError {
    pub fn new(operation: Operation, kind: impl Into<ApiErrorKind>) -> Self {
        Self {
            operation,
            kind: kind.into(),
            detailed: false,
        }
    }

    pub fn detailed(mut self, detailed: bool) -> Self {
        self.detailed = detailed;
        self
    }

    pub fn status_code(&self) -> StatusCode {
        let code = if !self.detailed {
            FLATTENED_ERROR_STATUS
        } else {
            match &self.kind {
                ApiErrorKind::Store(err) => store_error_to_status_code(err),
                ApiErrorKind::Credentials(CredentialError::Provider(_)) => 503,
                ApiErrorKind::Credentials(_) => 401,
            }
        };

        StatusCode::from_u16(code).unwrap_or(StatusCode::BAD_REQUEST)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        tracing::error!(
            operation = ?self.operation,
            status = %status,
            error = %self.kind,
            "{}",
            self.operation.error_message()
        );

        (
            status,
            Json(json!({ "Error": self.operation.error_message() })),
        )
            .into_response()
    }
}
