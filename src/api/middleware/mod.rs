//! API middleware.

mod auth;

pub use auth::{require_auth, resolve_identity, CurrentAccount};
