use thiserror::Error;

use crate::storage::StoreError;

/// Errors raised while turning request input into store parameters.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TenantError {
    #[error("tenant id is required")]
    MissingTenantId,

    #[error("tenant record must be a JSON object")]
    NotAnObject,

    #[error("update does not set any tenant attribute")]
    EmptyUpdate,

    #[error("invalid tenant record: {0}")]
    InvalidRecord(String),
}

impl From<TenantError> for StoreError {
    fn from(err: TenantError) -> Self {
        StoreError::Validation(err.to_string())
    }
}
