//! Account domain entity and related types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// Account domain entity
///
/// Lifecycle is two states: pending (created by registration, activation
/// code assigned) and active (code consumed). The flag never reverts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    pub id: Uuid,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub full_name: String,
    pub profile_image_url: Option<String>,
    /// Single-use activation secret; present only while the account is pending
    #[serde(skip_serializing)]
    pub activation_code: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Account {
    /// Create a new pending account awaiting activation
    pub fn new(
        id: Uuid,
        email: String,
        password_hash: String,
        full_name: String,
        profile_image_url: Option<String>,
        activation_code: String,
    ) -> Self {
        let now = Utc::now();
        Self {
            id,
            email,
            password_hash,
            full_name,
            profile_image_url,
            activation_code: Some(activation_code),
            is_active: false,
            created_at: now,
            updated_at: now,
        }
    }

    /// Check if the account is still awaiting activation
    pub fn is_pending(&self) -> bool {
        !self.is_active
    }

    /// Transition to active, consuming the activation code
    pub fn activate(&mut self) {
        self.is_active = true;
        self.activation_code = None;
        self.updated_at = Utc::now();
    }
}

/// Data required to persist a new account
#[derive(Debug, Clone)]
pub struct NewAccount {
    pub email: String,
    pub password_hash: String,
    pub full_name: String,
    pub profile_image_url: Option<String>,
    pub activation_code: String,
}

/// Account response (safe to return to client)
///
/// Never carries the password hash, the activation code, or the
/// activation flag.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AccountResponse {
    /// Unique account identifier
    #[schema(example = "550e8400-e29b-41d4-a716-446655440000")]
    pub id: Uuid,
    /// Account email address
    #[schema(example = "user@example.com")]
    pub email: String,
    /// Account holder's display name
    #[schema(example = "John Doe")]
    pub full_name: String,
    /// Optional avatar URL
    #[schema(example = "https://example.com/avatar.png")]
    pub profile_image_url: Option<String>,
    /// Account creation timestamp
    pub created_at: DateTime<Utc>,
    /// Last mutation timestamp
    pub updated_at: DateTime<Utc>,
}

impl From<Account> for AccountResponse {
    fn from(account: Account) -> Self {
        Self {
            id: account.id,
            email: account.email,
            full_name: account.full_name,
            profile_image_url: account.profile_image_url,
            created_at: account.created_at,
            updated_at: account.updated_at,
        }
    }
}
