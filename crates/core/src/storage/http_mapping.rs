//! Pure functions for mapping store errors to HTTP status codes.
//!
//! The public contract of the tenant endpoints reports every failure as
//! `400 Bad Request`. The detailed mapping is available for deployments that
//! opt into exposing failure classes.

use super::StoreError;

/// Status code used for every failure when error details are not exposed.
pub const FLATTENED_ERROR_STATUS: u16 = 400;

/// Maps a [`StoreError`] to its detailed HTTP status code.
///
/// - `NotFound` -> 404 (Not Found)
/// - `Forbidden` -> 403 (Forbidden)
/// - `BackendUnavailable` -> 503 (Service Unavailable)
/// - `Validation` -> 400 (Bad Request)
///
/// # Examples
///
/// ```
/// use tenant_manager_core::storage::{StoreError, store_error_to_status_code};
///
/// let error = StoreError::Forbidden("outside scope".to_string());
/// assert_eq!(store_error_to_status_code(&error), 403);
/// ```
pub fn store_error_to_status_code(error: &StoreError) -> u16 {
    match error {
        StoreError::NotFound(_) => 404,
        StoreError::Forbidden(_) => 403,
        StoreError::BackendUnavailable(_) => 503,
        StoreError::Validation(_) => 400,
    }
}
