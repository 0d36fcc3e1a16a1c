//! In-memory storage backend.
//!
//! Records live in `BTreeMap`s wrapped in `Arc<RwLock<_>>`, one map per table
//! name. Table handles enforce credential scope the same way the DynamoDB
//! backend's IAM policy does, so isolation can be exercised without AWS.
//!
//! # Example
//!
//! ```rust,ignore
//! use tenant_manager::storage::inmemory::InMemoryStore;
//!
//! let store = InMemoryStore::new();
//! let table = store.connect(&schema, credentials, &settings);
//! ```

mod store;

pub use store::InMemoryStore;
