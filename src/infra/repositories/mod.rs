//! Data access over the accounts store.

mod account_repository;
pub(crate) mod entities;

pub use account_repository::{AccountRepository, AccountStore};

// Export mock for tests (both unit and integration)
#[cfg(any(test, feature = "test-utils"))]
pub use account_repository::MockAccountRepository;
