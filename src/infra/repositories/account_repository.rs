//! Account repository: lookups plus the activation compare-and-swap.

use async_trait::async_trait;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set, SqlErr,
};
use uuid::Uuid;

use super::entities::account::{self, ActiveModel, Entity as AccountEntity};
use crate::domain::{Account, NewAccount};
use crate::errors::{AppError, AppResult};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Account repository trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait AccountRepository: Send + Sync {
    /// Find account by ID
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Account>>;

    /// Find account by email address (exact match as stored)
    async fn find_by_email(&self, email: &str) -> AppResult<Option<Account>>;

    /// Persist a new pending account
    async fn create(&self, account: NewAccount) -> AppResult<Account>;

    /// Consume an activation code and flip the account to active.
    ///
    /// Returns false when no pending account carries the code. The flag
    /// flip and the code invalidation are a single conditional update, so
    /// of two concurrent calls with the same code exactly one returns true.
    async fn activate(&self, code: &str) -> AppResult<bool>;
}

/// Concrete implementation of AccountRepository backed by Postgres
pub struct AccountStore {
    db: DatabaseConnection,
}

impl AccountStore {
    /// Create new repository instance
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl AccountRepository for AccountStore {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Account>> {
        let result = AccountEntity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(result.map(Account::from))
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<Account>> {
        let result = AccountEntity::find()
            .filter(account::Column::Email.eq(email))
            .one(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(result.map(Account::from))
    }

    async fn create(&self, new_account: NewAccount) -> AppResult<Account> {
        let now = chrono::Utc::now();
        let active_model = ActiveModel {
            id: Set(Uuid::new_v4()),
            email: Set(new_account.email),
            password_hash: Set(new_account.password_hash),
            full_name: Set(new_account.full_name),
            profile_image_url: Set(new_account.profile_image_url),
            activation_code: Set(Some(new_account.activation_code)),
            is_active: Set(false),
            created_at: Set(now),
            updated_at: Set(now),
        };

        // The unique index on email closes the window two concurrent
        // registrations of the same address would otherwise slip through.
        let model = active_model
            .insert(&self.db)
            .await
            .map_err(|e| match e.sql_err() {
                Some(SqlErr::UniqueConstraintViolation(_)) => AppError::DuplicateEmail,
                _ => AppError::from(e),
            })?;

        Ok(Account::from(model))
    }

    async fn activate(&self, code: &str) -> AppResult<bool> {
        let result = AccountEntity::update_many()
            .col_expr(account::Column::IsActive, Expr::value(true))
            .col_expr(
                account::Column::ActivationCode,
                Expr::value(Option::<String>::None),
            )
            .col_expr(account::Column::UpdatedAt, Expr::value(chrono::Utc::now()))
            .filter(account::Column::ActivationCode.eq(code))
            .exec(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(result.rows_affected > 0)
    }
}
