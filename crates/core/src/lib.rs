//! Core domain for the tenant manager.
//!
//! Pure types and traits: the tenant record, credential-scoped storage
//! access, and the error taxonomy. No I/O lives here; the server crate and
//! xtask provide the concrete stores and credential resolvers.

pub mod credentials;
pub mod storage;
pub mod tenant;
