//! Token issuance and validation.
//!
//! Bearer tokens are HS256-signed JWTs carrying a fixed claim schema.
//! Issuer and validator share one process-wide secret loaded at startup;
//! rotating the secret invalidates every outstanding token. Tokens are
//! never stored server-side: validity is signature plus expiry.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::config::{Config, SECONDS_PER_HOUR, TOKEN_SCHEMA_VERSION, TOKEN_TYPE_BEARER};
use crate::errors::{AppError, AppResult};

/// Time source for issued-at and expiry decisions.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall-clock time source used outside tests.
#[derive(Debug, Clone, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// JWT claims payload
///
/// Fixed, versioned schema: deserialization rejects tokens missing or
/// mistyping any field, and `ver` must match the process's schema version.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,
    pub iat: i64,
    pub exp: i64,
    pub ver: u8,
}

/// Token response returned after successful authentication
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct TokenResponse {
    /// JWT access token
    #[schema(example = "eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9...")]
    pub access_token: String,
    /// Token type (always "Bearer")
    #[schema(example = "Bearer")]
    pub token_type: String,
    /// Token expiration time in seconds
    #[schema(example = 86400)]
    pub expires_in: i64,
}

/// Issues and validates bearer tokens.
///
/// Pure computation over immutable configuration; shared freely across
/// request handlers without locking.
pub struct TokenService {
    secret: Vec<u8>,
    ttl_hours: i64,
    clock: Arc<dyn Clock>,
}

impl TokenService {
    pub fn new(secret: &[u8], ttl_hours: i64, clock: Arc<dyn Clock>) -> Self {
        Self {
            secret: secret.to_vec(),
            ttl_hours,
            clock,
        }
    }

    pub fn from_config(config: &Config, clock: Arc<dyn Clock>) -> Self {
        Self::new(
            config.jwt_secret_bytes(),
            config.jwt_expiration_hours,
            clock,
        )
    }

    /// Issue a token whose subject is the given account id.
    pub fn issue(&self, account_id: Uuid) -> AppResult<TokenResponse> {
        let now = self.clock.now();
        let expires_at = now + Duration::hours(self.ttl_hours);

        let claims = Claims {
            sub: account_id,
            iat: now.timestamp(),
            exp: expires_at.timestamp(),
            ver: TOKEN_SCHEMA_VERSION,
        };

        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(&self.secret),
        )
        .map_err(|e| AppError::internal(format!("Token signing failed: {}", e)))?;

        Ok(TokenResponse {
            access_token: token,
            token_type: TOKEN_TYPE_BEARER.to_string(),
            expires_in: self.ttl_hours * SECONDS_PER_HOUR,
        })
    }

    /// Validate a token and return its claims.
    ///
    /// Bad signatures, malformed payloads, schema mismatches, and elapsed
    /// expiry all collapse into the same `InvalidOrExpiredToken` value so
    /// callers cannot distinguish why a token was rejected.
    pub fn validate(&self, token: &str) -> AppResult<Claims> {
        // Expiry is checked below against the injected clock rather than
        // the library's wall clock.
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.required_spec_claims.clear();

        let token_data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(&self.secret),
            &validation,
        )
        .map_err(|_| AppError::InvalidOrExpiredToken)?;

        let claims = token_data.claims;
        if claims.ver != TOKEN_SCHEMA_VERSION {
            return Err(AppError::InvalidOrExpiredToken);
        }
        if claims.exp <= self.clock.now().timestamp() {
            return Err(AppError::InvalidOrExpiredToken);
        }

        Ok(claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    const TEST_SECRET: &[u8] = b"test-secret-key-minimum-32-chars!";

    struct FixedClock {
        at: DateTime<Utc>,
    }

    impl Clock for FixedClock {
        fn now(&self) -> DateTime<Utc> {
            self.at
        }
    }

    fn fixed(at: DateTime<Utc>) -> Arc<dyn Clock> {
        Arc::new(FixedClock { at })
    }

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap()
    }

    fn service_at(at: DateTime<Utc>) -> TokenService {
        TokenService::new(TEST_SECRET, 24, fixed(at))
    }

    /// Replace one character of a token segment to simulate tampering.
    fn flip_char(token: &str, index: usize) -> String {
        let mut chars: Vec<char> = token.chars().collect();
        chars[index] = if chars[index] == 'A' { 'B' } else { 'A' };
        chars.into_iter().collect()
    }

    #[test]
    fn validate_returns_subject_after_issue() {
        let service = service_at(t0());
        let account_id = Uuid::new_v4();

        let token = service.issue(account_id).unwrap();
        let claims = service.validate(&token.access_token).unwrap();

        assert_eq!(claims.sub, account_id);
        assert_eq!(claims.iat, t0().timestamp());
        assert_eq!(claims.exp, (t0() + Duration::hours(24)).timestamp());
        assert_eq!(claims.ver, TOKEN_SCHEMA_VERSION);
    }

    #[test]
    fn token_response_shape() {
        let service = service_at(t0());
        let token = service.issue(Uuid::new_v4()).unwrap();

        assert_eq!(token.token_type, "Bearer");
        assert_eq!(token.expires_in, 24 * 3600);
        // Compact JWS form: header.payload.signature
        assert_eq!(token.access_token.split('.').count(), 3);
    }

    #[test]
    fn expired_token_is_rejected() {
        let issuer = service_at(t0());
        let token = issuer.issue(Uuid::new_v4()).unwrap();

        let later = TokenService::new(TEST_SECRET, 24, fixed(t0() + Duration::hours(25)));
        assert!(matches!(
            later.validate(&token.access_token),
            Err(AppError::InvalidOrExpiredToken)
        ));
    }

    #[test]
    fn expiry_boundary_is_inclusive() {
        let issuer = service_at(t0());
        let token = issuer.issue(Uuid::new_v4()).unwrap();

        // Exactly at expiry the token is already invalid
        let at_expiry = TokenService::new(TEST_SECRET, 24, fixed(t0() + Duration::hours(24)));
        assert!(at_expiry.validate(&token.access_token).is_err());

        // One second before expiry it still validates
        let just_before = TokenService::new(
            TEST_SECRET,
            24,
            fixed(t0() + Duration::hours(24) - Duration::seconds(1)),
        );
        assert!(just_before.validate(&token.access_token).is_ok());
    }

    #[test]
    fn tampered_payload_is_rejected() {
        let service = service_at(t0());
        let token = service.issue(Uuid::new_v4()).unwrap().access_token;

        // Flip a character inside the payload segment
        let header_len = token.split('.').next().unwrap().len();
        let tampered = flip_char(&token, header_len + 2);
        assert_ne!(token, tampered);
        assert!(service.validate(&tampered).is_err());
    }

    #[test]
    fn tampered_signature_is_rejected() {
        let service = service_at(t0());
        let token = service.issue(Uuid::new_v4()).unwrap().access_token;

        let tampered = flip_char(&token, token.len() - 2);
        assert_ne!(token, tampered);
        assert!(service.validate(&tampered).is_err());
    }

    #[test]
    fn token_signed_with_other_secret_is_rejected() {
        let issuer = TokenService::new(b"another-secret-key-of-32-chars!!!", 24, fixed(t0()));
        let token = issuer.issue(Uuid::new_v4()).unwrap();

        let validator = service_at(t0());
        assert!(validator.validate(&token.access_token).is_err());
    }

    #[test]
    fn wrong_schema_version_is_rejected() {
        let claims = Claims {
            sub: Uuid::new_v4(),
            iat: t0().timestamp(),
            exp: (t0() + Duration::hours(24)).timestamp(),
            ver: TOKEN_SCHEMA_VERSION + 1,
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(TEST_SECRET),
        )
        .unwrap();

        let service = service_at(t0());
        assert!(matches!(
            service.validate(&token),
            Err(AppError::InvalidOrExpiredToken)
        ));
    }

    #[test]
    fn token_missing_claims_is_rejected() {
        // Well-signed but carrying a different claim shape
        #[derive(Serialize)]
        struct Sparse {
            sub: Uuid,
        }
        let token = encode(
            &Header::default(),
            &Sparse {
                sub: Uuid::new_v4(),
            },
            &EncodingKey::from_secret(TEST_SECRET),
        )
        .unwrap();

        let service = service_at(t0());
        assert!(service.validate(&token).is_err());
    }

    #[test]
    fn malformed_tokens_are_rejected_without_panic() {
        let service = service_at(t0());
        for garbage in ["", "not-a-token", "a.b.c", "🦀🦀🦀"] {
            assert!(matches!(
                service.validate(garbage),
                Err(AppError::InvalidOrExpiredToken)
            ));
        }
    }
}
