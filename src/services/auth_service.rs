//! Authentication and account lifecycle service.
//!
//! Owns the two-phase account state machine (pending until the emailed
//! activation code is consumed, active afterwards) and the login path
//! that gates token issuance on it.

use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

use crate::config::ACTIVATION_EMAIL_SUBJECT;
use crate::domain::{Account, NewAccount, Password};
use crate::errors::{AppError, AppResult};
use crate::infra::AccountRepository;
use crate::services::notifier::Notifier;
use crate::services::token_service::{TokenResponse, TokenService};

/// Argon2id digest no password hashes to; keeps lookup misses and
/// password mismatches on the same code path timing-wise.
const DUMMY_PASSWORD_HASH: &str =
    "$argon2id$v=19$m=19456,t=2,p=1$c2FsdHNhbHRzYWx0c2FsdA$UGxhY2Vob2xkZXJQbGFjZWhvbGRlclBsYWNl";

/// Authentication service trait for dependency injection.
#[async_trait]
pub trait AuthService: Send + Sync {
    /// Register a new pending account and queue its activation email
    async fn register(
        &self,
        email: String,
        password: String,
        full_name: String,
        profile_image_url: Option<String>,
    ) -> AppResult<Account>;

    /// Consume an activation code, transitioning its account to active
    async fn activate(&self, code: &str) -> AppResult<()>;

    /// Whether the account behind this email is active (false for unknown emails)
    async fn is_active(&self, email: &str) -> AppResult<bool>;

    /// Verify credentials and return a bearer token plus the account
    async fn login(&self, email: String, password: String)
        -> AppResult<(TokenResponse, Account)>;

    /// Resolve a bearer token into the account it belongs to
    async fn authenticate(&self, token: &str) -> AppResult<Account>;
}

/// Concrete implementation of AuthService.
pub struct Authenticator {
    accounts: Arc<dyn AccountRepository>,
    notifier: Arc<dyn Notifier>,
    tokens: TokenService,
    activation_base_url: String,
}

impl Authenticator {
    pub fn new(
        accounts: Arc<dyn AccountRepository>,
        notifier: Arc<dyn Notifier>,
        tokens: TokenService,
        activation_base_url: impl Into<String>,
    ) -> Self {
        Self {
            accounts,
            notifier,
            tokens,
            activation_base_url: activation_base_url.into(),
        }
    }

    /// Lowercase and trim an email once at the boundary so storage,
    /// uniqueness checks, and lookups all agree on the same form.
    fn normalize_email(email: &str) -> String {
        email.trim().to_lowercase()
    }

    fn activation_link(&self, code: &str) -> String {
        format!(
            "{}/activate?code={}",
            self.activation_base_url.trim_end_matches('/'),
            code
        )
    }
}

#[async_trait]
impl AuthService for Authenticator {
    async fn register(
        &self,
        email: String,
        password: String,
        full_name: String,
        profile_image_url: Option<String>,
    ) -> AppResult<Account> {
        let email = Self::normalize_email(&email);

        // Fast-path duplicate check; the unique index on email closes the
        // race between two concurrent registrations.
        if self.accounts.find_by_email(&email).await?.is_some() {
            return Err(AppError::DuplicateEmail);
        }

        let password_hash = Password::new(&password)?.into_string();
        let activation_code = Uuid::new_v4().to_string();

        let account = self
            .accounts
            .create(NewAccount {
                email,
                password_hash,
                full_name,
                profile_image_url,
                activation_code: activation_code.clone(),
            })
            .await?;

        let body = format!(
            "Click here to activate your account: {}",
            self.activation_link(&activation_code)
        );
        if let Err(e) = self
            .notifier
            .send(&account.email, ACTIVATION_EMAIL_SUBJECT, &body)
            .await
        {
            // Delivery is best-effort: the account stays pending and the
            // registration itself must not fail.
            tracing::warn!(error = %e, account_id = %account.id, "Failed to queue activation email");
        }

        tracing::info!(account_id = %account.id, "Registered pending account");
        Ok(account)
    }

    async fn activate(&self, code: &str) -> AppResult<()> {
        if self.accounts.activate(code).await? {
            tracing::info!("Account activated");
            Ok(())
        } else {
            // Used and never-issued codes are indistinguishable here
            Err(AppError::ActivationCodeNotFound)
        }
    }

    async fn is_active(&self, email: &str) -> AppResult<bool> {
        let email = Self::normalize_email(email);
        Ok(self
            .accounts
            .find_by_email(&email)
            .await?
            .map(|account| account.is_active)
            .unwrap_or(false))
    }

    async fn login(
        &self,
        email: String,
        password: String,
    ) -> AppResult<(TokenResponse, Account)> {
        let email = Self::normalize_email(&email);
        let account = self.accounts.find_by_email(&email).await?;

        // Activation is checked before the hash comparison is paid for;
        // the outcome reveals nothing about password correctness.
        if matches!(&account, Some(a) if !a.is_active) {
            return Err(AppError::AccountInactive);
        }

        // SECURITY: verify against a dummy hash when the account is
        // unknown so response timing cannot enumerate registered emails.
        let password_hash = account
            .as_ref()
            .map(|a| a.password_hash.clone())
            .unwrap_or_else(|| DUMMY_PASSWORD_HASH.to_string());

        let password_valid = Password::from_hash(password_hash).verify(&password);

        match account {
            Some(account) if password_valid => {
                let token = self.tokens.issue(account.id)?;
                tracing::info!(account_id = %account.id, "Login succeeded");
                Ok((token, account))
            }
            _ => Err(AppError::InvalidCredentials),
        }
    }

    async fn authenticate(&self, token: &str) -> AppResult<Account> {
        let claims = self.tokens.validate(token)?;

        // A valid signature is not enough: the subject must still exist.
        self.accounts
            .find_by_id(claims.sub)
            .await?
            .ok_or(AppError::Unauthenticated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::MockAccountRepository;
    use crate::services::token_service::SystemClock;
    use std::sync::Mutex;

    const TEST_SECRET: &[u8] = b"test-secret-key-minimum-32-chars!";
    const TEST_BASE_URL: &str = "http://localhost:3000";

    struct NullNotifier;

    #[async_trait]
    impl Notifier for NullNotifier {
        async fn send(&self, _to: &str, _subject: &str, _body: &str) -> AppResult<()> {
            Ok(())
        }
    }

    struct FailingNotifier;

    #[async_trait]
    impl Notifier for FailingNotifier {
        async fn send(&self, _to: &str, _subject: &str, _body: &str) -> AppResult<()> {
            Err(AppError::internal("queue unavailable"))
        }
    }

    #[derive(Default)]
    struct RecordingNotifier {
        sent: Mutex<Vec<(String, String, String)>>,
    }

    #[async_trait]
    impl Notifier for RecordingNotifier {
        async fn send(&self, to: &str, subject: &str, body: &str) -> AppResult<()> {
            self.sent
                .lock()
                .unwrap()
                .push((to.to_string(), subject.to_string(), body.to_string()));
            Ok(())
        }
    }

    fn authenticator(repo: MockAccountRepository, notifier: Arc<dyn Notifier>) -> Authenticator {
        Authenticator::new(
            Arc::new(repo),
            notifier,
            TokenService::new(TEST_SECRET, 24, Arc::new(SystemClock)),
            TEST_BASE_URL,
        )
    }

    fn stored_account(email: &str, password: &str, active: bool) -> Account {
        let mut account = Account::new(
            Uuid::new_v4(),
            email.to_string(),
            Password::new(password).unwrap().into_string(),
            "Test User".to_string(),
            None,
            Uuid::new_v4().to_string(),
        );
        if active {
            account.activate();
        }
        account
    }

    #[tokio::test]
    async fn register_rejects_duplicate_email_without_creating() {
        let mut repo = MockAccountRepository::new();
        repo.expect_find_by_email()
            .withf(|email| email == "taken@example.com")
            .returning(|email| Ok(Some(stored_account(email, "Password123", false))));
        repo.expect_create().times(0);

        let service = authenticator(repo, Arc::new(NullNotifier));
        let result = service
            .register(
                "taken@example.com".to_string(),
                "Password123".to_string(),
                "Someone".to_string(),
                None,
            )
            .await;

        assert!(matches!(result, Err(AppError::DuplicateEmail)));
    }

    #[tokio::test]
    async fn register_normalizes_email_and_stores_hash() {
        let mut repo = MockAccountRepository::new();
        repo.expect_find_by_email()
            .withf(|email| email == "user@example.com")
            .returning(|_| Ok(None));
        repo.expect_create()
            .withf(|new_account: &NewAccount| {
                new_account.email == "user@example.com"
                    && new_account.password_hash.starts_with("$argon2id$")
                    && !new_account.activation_code.is_empty()
            })
            .returning(|new_account| {
                Ok(Account::new(
                    Uuid::new_v4(),
                    new_account.email.clone(),
                    new_account.password_hash.clone(),
                    new_account.full_name.clone(),
                    new_account.profile_image_url.clone(),
                    new_account.activation_code.clone(),
                ))
            });

        let service = authenticator(repo, Arc::new(NullNotifier));
        let account = service
            .register(
                "  User@Example.COM ".to_string(),
                "Password123".to_string(),
                "Someone".to_string(),
                None,
            )
            .await
            .unwrap();

        assert_eq!(account.email, "user@example.com");
        assert!(account.is_pending());
    }

    #[tokio::test]
    async fn register_emails_the_activation_link() {
        let mut repo = MockAccountRepository::new();
        repo.expect_find_by_email().returning(|_| Ok(None));
        repo.expect_create().returning(|new_account| {
            Ok(Account::new(
                Uuid::new_v4(),
                new_account.email.clone(),
                new_account.password_hash.clone(),
                new_account.full_name.clone(),
                new_account.profile_image_url.clone(),
                new_account.activation_code.clone(),
            ))
        });

        let notifier = Arc::new(RecordingNotifier::default());
        let service = authenticator(repo, notifier.clone());
        let account = service
            .register(
                "user@example.com".to_string(),
                "Password123".to_string(),
                "Someone".to_string(),
                None,
            )
            .await
            .unwrap();

        let sent = notifier.sent.lock().unwrap();
        assert_eq!(sent.len(), 1);
        let (to, subject, body) = &sent[0];
        assert_eq!(to, "user@example.com");
        assert_eq!(subject, ACTIVATION_EMAIL_SUBJECT);
        let code = account.activation_code.as_deref().unwrap();
        assert!(body.contains(&format!("{}/activate?code={}", TEST_BASE_URL, code)));
    }

    #[tokio::test]
    async fn register_survives_notifier_failure() {
        let mut repo = MockAccountRepository::new();
        repo.expect_find_by_email().returning(|_| Ok(None));
        repo.expect_create().returning(|new_account| {
            Ok(Account::new(
                Uuid::new_v4(),
                new_account.email.clone(),
                new_account.password_hash.clone(),
                new_account.full_name.clone(),
                new_account.profile_image_url.clone(),
                new_account.activation_code.clone(),
            ))
        });

        let service = authenticator(repo, Arc::new(FailingNotifier));
        let result = service
            .register(
                "user@example.com".to_string(),
                "Password123".to_string(),
                "Someone".to_string(),
                None,
            )
            .await;

        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn activate_maps_consumed_or_unknown_code_to_not_found() {
        let mut repo = MockAccountRepository::new();
        repo.expect_activate()
            .withf(|code| code == "spent-code")
            .returning(|_| Ok(false));

        let service = authenticator(repo, Arc::new(NullNotifier));
        assert!(matches!(
            service.activate("spent-code").await,
            Err(AppError::ActivationCodeNotFound)
        ));
    }

    #[tokio::test]
    async fn activate_succeeds_when_store_reports_a_flip() {
        let mut repo = MockAccountRepository::new();
        repo.expect_activate()
            .withf(|code| code == "fresh-code")
            .returning(|_| Ok(true));

        let service = authenticator(repo, Arc::new(NullNotifier));
        assert!(service.activate("fresh-code").await.is_ok());
    }

    #[tokio::test]
    async fn login_rejects_inactive_account_before_checking_password() {
        let mut repo = MockAccountRepository::new();
        repo.expect_find_by_email()
            .returning(|email| Ok(Some(stored_account(email, "Password123", false))));

        let service = authenticator(repo, Arc::new(NullNotifier));
        // Even the correct password yields the inactive outcome
        let result = service
            .login("user@example.com".to_string(), "Password123".to_string())
            .await;

        assert!(matches!(result, Err(AppError::AccountInactive)));
    }

    #[tokio::test]
    async fn login_unknown_email_is_invalid_credentials() {
        let mut repo = MockAccountRepository::new();
        repo.expect_find_by_email().returning(|_| Ok(None));

        let service = authenticator(repo, Arc::new(NullNotifier));
        let result = service
            .login("ghost@example.com".to_string(), "Password123".to_string())
            .await;

        assert!(matches!(result, Err(AppError::InvalidCredentials)));
    }

    #[test]
    fn dummy_hash_parses_as_a_real_digest() {
        use argon2::password_hash::PasswordHash;

        // The unknown-email path only costs the same as a real
        // verification if this digest survives PHC parsing.
        let parsed = PasswordHash::new(DUMMY_PASSWORD_HASH).unwrap();
        assert_eq!(parsed.algorithm.as_str(), "argon2id");
        assert!(!Password::from_hash(DUMMY_PASSWORD_HASH.to_string()).verify("Password123"));
    }

    #[tokio::test]
    async fn login_wrong_password_is_invalid_credentials() {
        let mut repo = MockAccountRepository::new();
        repo.expect_find_by_email()
            .returning(|email| Ok(Some(stored_account(email, "Password123", true))));

        let service = authenticator(repo, Arc::new(NullNotifier));
        let result = service
            .login("user@example.com".to_string(), "WrongPassword1".to_string())
            .await;

        assert!(matches!(result, Err(AppError::InvalidCredentials)));
    }

    #[tokio::test]
    async fn login_issues_token_that_authenticates_back_to_the_account() {
        let account = stored_account("user@example.com", "Password123", true);
        let account_id = account.id;

        let mut repo = MockAccountRepository::new();
        {
            let account = account.clone();
            repo.expect_find_by_email()
                .returning(move |_| Ok(Some(account.clone())));
        }
        repo.expect_find_by_id()
            .withf(move |id| *id == account_id)
            .returning(move |_| Ok(Some(account.clone())));

        let service = authenticator(repo, Arc::new(NullNotifier));
        let (token, logged_in) = service
            .login("user@example.com".to_string(), "Password123".to_string())
            .await
            .unwrap();
        assert_eq!(logged_in.id, account_id);

        let resolved = service.authenticate(&token.access_token).await.unwrap();
        assert_eq!(resolved.id, account_id);
    }

    #[tokio::test]
    async fn authenticate_rejects_token_for_vanished_account() {
        let mut repo = MockAccountRepository::new();
        repo.expect_find_by_id().returning(|_| Ok(None));

        let service = authenticator(repo, Arc::new(NullNotifier));
        let token = TokenService::new(TEST_SECRET, 24, Arc::new(SystemClock))
            .issue(Uuid::new_v4())
            .unwrap();

        assert!(matches!(
            service.authenticate(&token.access_token).await,
            Err(AppError::Unauthenticated)
        ));
    }

    #[tokio::test]
    async fn authenticate_rejects_garbage_token_without_touching_the_store() {
        let mut repo = MockAccountRepository::new();
        repo.expect_find_by_id().times(0);

        let service = authenticator(repo, Arc::new(NullNotifier));
        assert!(matches!(
            service.authenticate("not-a-token").await,
            Err(AppError::InvalidOrExpiredToken)
        ));
    }

    #[tokio::test]
    async fn is_active_is_false_for_unknown_email() {
        let mut repo = MockAccountRepository::new();
        repo.expect_find_by_email().returning(|_| Ok(None));

        let service = authenticator(repo, Arc::new(NullNotifier));
        assert!(!service.is_active("ghost@example.com").await.unwrap());
    }

    #[tokio::test]
    async fn is_active_reflects_activation_state() {
        let mut repo = MockAccountRepository::new();
        repo.expect_find_by_email()
            .returning(|email| Ok(Some(stored_account(email, "Password123", true))));

        let service = authenticator(repo, Arc::new(NullNotifier));
        assert!(service.is_active("user@example.com").await.unwrap());
    }
}
