//! DynamoDB error mapping.
//!
//! Maps AWS SDK errors to `StoreError` from `tenant_manager_core::storage`.
//! Modeled exceptions are matched per operation; everything else (IAM denials,
//! expired tokens, dispatch failures) is classified by its error code.

use std::fmt::Debug;

use aws_sdk_dynamodb::error::{DisplayErrorContext, ProvideErrorMetadata, SdkError};
use aws_sdk_dynamodb::operation::delete_item::DeleteItemError;
use aws_sdk_dynamodb::operation::get_item::GetItemError;
use aws_sdk_dynamodb::operation::put_item::PutItemError;
use aws_sdk_dynamodb::operation::scan::ScanError;
use aws_sdk_dynamodb::operation::update_item::UpdateItemError;
use tenant_manager_core::storage::StoreError;

/// Classify an error code returned by DynamoDB or STS.
pub fn classify_error_code(code: Option<&str>, message: String) -> StoreError {
    match code {
        Some(
            "AccessDeniedException"
            | "UnrecognizedClientException"
            | "ExpiredTokenException"
            | "InvalidSignatureException"
            | "MissingAuthenticationTokenException",
        ) => StoreError::Forbidden(message),
        Some("ValidationException" | "SerializationException") => StoreError::Validation(message),
        Some("ConditionalCheckFailedException") => StoreError::Validation(message),
        Some("ResourceNotFoundException") => StoreError::NotFound(message),
        _ => StoreError::BackendUnavailable(message),
    }
}

fn classify<E>(err: &E, operation: &str) -> StoreError
where
    E: ProvideErrorMetadata + std::error::Error,
{
    let message = match ProvideErrorMetadata::message(err) {
        Some(message) => format!("{} failed: {}", operation, message),
        None => format!("{} failed: {}", operation, DisplayErrorContext(err)),
    };
    classify_error_code(ProvideErrorMetadata::code(err), message)
}

/// Map a GetItem SDK error to StoreError.
pub fn map_get_item_error<R: Debug + Send + Sync + 'static>(
    err: SdkError<GetItemError, R>,
) -> StoreError {
    match err.into_service_error() {
        GetItemError::ResourceNotFoundException(_) => {
            StoreError::NotFound("Table not found".to_string())
        }
        GetItemError::ProvisionedThroughputExceededException(_) => {
            StoreError::BackendUnavailable("Throughput exceeded, please retry".to_string())
        }
        GetItemError::RequestLimitExceeded(_) => {
            StoreError::BackendUnavailable("Request limit exceeded, please retry".to_string())
        }
        GetItemError::InternalServerError(_) => {
            StoreError::BackendUnavailable("DynamoDB internal server error".to_string())
        }
        err => classify(&err, "GetItem"),
    }
}

/// Map a Scan SDK error to StoreError.
pub fn map_scan_error<R: Debug + Send + Sync + 'static>(err: SdkError<ScanError, R>) -> StoreError {
    match err.into_service_error() {
        ScanError::ResourceNotFoundException(_) => {
            StoreError::NotFound("Table not found".to_string())
        }
        ScanError::ProvisionedThroughputExceededException(_) => {
            StoreError::BackendUnavailable("Throughput exceeded, please retry".to_string())
        }
        ScanError::RequestLimitExceeded(_) => {
            StoreError::BackendUnavailable("Request limit exceeded, please retry".to_string())
        }
        ScanError::InternalServerError(_) => {
            StoreError::BackendUnavailable("DynamoDB internal server error".to_string())
        }
        err => classify(&err, "Scan"),
    }
}

/// Map a PutItem SDK error to StoreError.
pub fn map_put_item_error<R: Debug + Send + Sync + 'static>(
    err: SdkError<PutItemError, R>,
) -> StoreError {
    match err.into_service_error() {
        PutItemError::ConditionalCheckFailedException(_) => {
            StoreError::Validation("Conditional check failed".to_string())
        }
        PutItemError::ResourceNotFoundException(_) => {
            StoreError::NotFound("Table not found".to_string())
        }
        PutItemError::ProvisionedThroughputExceededException(_) => {
            StoreError::BackendUnavailable("Throughput exceeded, please retry".to_string())
        }
        PutItemError::RequestLimitExceeded(_) => {
            StoreError::BackendUnavailable("Request limit exceeded, please retry".to_string())
        }
        PutItemError::ItemCollectionSizeLimitExceededException(_) => {
            StoreError::Validation("Item collection size limit exceeded".to_string())
        }
        PutItemError::TransactionConflictException(_) => {
            StoreError::BackendUnavailable("Transaction conflict, please retry".to_string())
        }
        PutItemError::InternalServerError(_) => {
            StoreError::BackendUnavailable("DynamoDB internal server error".to_string())
        }
        err => classify(&err, "PutItem"),
    }
}

/// Map an UpdateItem SDK error to StoreError.
pub fn map_update_item_error<R: Debug + Send + Sync + 'static>(
    err: SdkError<UpdateItemError, R>,
) -> StoreError {
    match err.into_service_error() {
        UpdateItemError::ConditionalCheckFailedException(_) => {
            StoreError::Validation("Conditional check failed".to_string())
        }
        UpdateItemError::ResourceNotFoundException(_) => {
            StoreError::NotFound("Table not found".to_string())
        }
        UpdateItemError::ProvisionedThroughputExceededException(_) => {
            StoreError::BackendUnavailable("Throughput exceeded, please retry".to_string())
        }
        UpdateItemError::RequestLimitExceeded(_) => {
            StoreError::BackendUnavailable("Request limit exceeded, please retry".to_string())
        }
        UpdateItemError::ItemCollectionSizeLimitExceededException(_) => {
            StoreError::Validation("Item collection size limit exceeded".to_string())
        }
        UpdateItemError::TransactionConflictException(_) => {
            StoreError::BackendUnavailable("Transaction conflict, please retry".to_string())
        }
        UpdateItemError::InternalServerError(_) => {
            StoreError::BackendUnavailable("DynamoDB internal server error".to_string())
        }
        err => classify(&err, "UpdateItem"),
    }
}

/// Map a DeleteItem SDK error to StoreError.
pub fn map_delete_item_error<R: Debug + Send + Sync + 'static>(
    err: SdkError<DeleteItemError, R>,
) -> StoreError {
    match err.into_service_error() {
        DeleteItemError::ConditionalCheckFailedException(_) => {
            StoreError::Validation("Conditional check failed".to_string())
        }
        DeleteItemError::ResourceNotFoundException(_) => {
            StoreError::NotFound("Table not found".to_string())
        }
        DeleteItemError::ProvisionedThroughputExceededException(_) => {
            StoreError::BackendUnavailable("Throughput exceeded, please retry".to_string())
        }
        DeleteItemError::RequestLimitExceeded(_) => {
            StoreError::BackendUnavailable("Request limit exceeded, please retry".to_string())
        }
        DeleteItemError::TransactionConflictException(_) => {
            StoreError::BackendUnavailable("Transaction conflict, please retry".to_string())
        }
        DeleteItemError::InternalServerError(_) => {
            StoreError::BackendUnavailable("DynamoDB internal server error".to_string())
        }
        err => classify(&err, "DeleteItem"),
    }
}
