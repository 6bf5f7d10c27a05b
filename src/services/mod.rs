//! Application services layer - Use cases and business logic.
//!
//! Services orchestrate domain logic and infrastructure to fulfill
//! application use cases. They depend on abstractions (traits) for
//! dependency inversion.

mod auth_service;
mod notifier;
mod token_service;

// Service traits and implementations
pub use auth_service::{AuthService, Authenticator};
pub use notifier::{Notifier, QueueNotifier};
pub use token_service::{Claims, Clock, SystemClock, TokenResponse, TokenService};
