//! DynamoDB storage backend implementation.
//!
//! Table handles are built per request from the caller's credentials using
//! `aws-sdk-dynamodb`.

mod error;
mod table;

pub use table::DynamoDbConnector;
