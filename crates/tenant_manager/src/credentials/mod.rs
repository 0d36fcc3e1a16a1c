//! Credential resolution for inbound requests.

mod jwt;
mod source;

pub use jwt::JwtCredentialResolver;
#[cfg(feature = "dynamodb")]
pub use source::AwsCredentialSource;
pub use source::{CredentialSource, StaticCredentialSource};
