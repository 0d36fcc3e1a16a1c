use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CredentialError {
    #[error("missing bearer token")]
    MissingToken,

    #[error("invalid token: {0}")]
    InvalidToken(String),

    #[error("token expired")]
    Expired,

    #[error("missing required claim: {0}")]
    MissingClaim(String),

    #[error("credential provider error: {0}")]
    Provider(String),
}
