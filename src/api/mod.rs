//! API layer - HTTP surface of the service
//!
//! Request handlers, the bearer-token middleware pair, custom
//! extractors, route composition, OpenAPI docs, and shared state.

pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod openapi;
pub mod routes;
pub mod state;

pub use openapi::ApiDoc;
pub use routes::create_router;
pub use state::AppState;
