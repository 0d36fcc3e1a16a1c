pub mod error;
pub mod health;
pub mod tenants;

pub use error::{ApiError, ApiErrorKind, Operation};
