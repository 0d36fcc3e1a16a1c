mod error;
mod traits;
mod types;

pub use error::CredentialError;
pub use traits::{CredentialResolver, Result};
pub use types::{CredentialScope, Credentials};
