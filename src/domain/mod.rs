//! Domain layer - Core business entities and logic
//!
//! This module contains the core domain models that represent
//! business concepts independent of infrastructure concerns.

pub mod account;
pub mod password;

pub use account::{Account, AccountResponse, NewAccount};
pub use password::Password;
