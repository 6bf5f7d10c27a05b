//! Application state - Dependency injection container.

use std::sync::Arc;

use crate::services::AuthService;

/// Application state shared across handlers and middleware.
///
/// Handlers depend on the `AuthService` trait rather than its concrete
/// implementation so tests can swap in doubles.
#[derive(Clone)]
pub struct AppState {
    /// Authentication and account lifecycle service
    pub auth_service: Arc<dyn AuthService>,
}

impl AppState {
    /// Create new application state with injected services.
    pub fn new(auth_service: Arc<dyn AuthService>) -> Self {
        Self { auth_service }
    }
}
