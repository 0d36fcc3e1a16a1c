//! Storage backend implementations.
//!
//! Concrete [`TableConnector`](tenant_manager_core::storage::TableConnector)
//! implementations for the traits defined in `tenant_manager_core::storage`.
//! The backend is picked at startup from `TENANT_STORE`.
//!
//! # Feature Flags
//!
//! - `dynamodb` (default): AWS DynamoDB backend using `aws-sdk-dynamodb`
//!
//! The in-memory backend is always compiled in.

pub mod inmemory;

#[cfg(feature = "dynamodb")]
pub mod dynamodb;

pub use inmemory::InMemoryStore;

#[cfg(feature = "dynamodb")]
pub use dynamodb::DynamoDbConnector;
