//! Authentication handlers.

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::Json,
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::api::extractors::ValidatedJson;
use crate::api::AppState;
use crate::domain::AccountResponse;
use crate::errors::AppResult;
use crate::services::TokenResponse;
use crate::types::MessageResponse;

/// Account registration request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct RegisterRequest {
    /// Account email address
    #[validate(email(message = "Invalid email format"))]
    #[schema(example = "user@example.com")]
    pub email: String,
    /// Account password (minimum 8 characters)
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    #[schema(example = "SecurePass123!", min_length = 8)]
    pub password: String,
    /// Account holder's display name
    #[validate(length(min = 1, message = "Full name is required"))]
    #[schema(example = "John Doe")]
    pub full_name: String,
    /// Optional avatar URL
    #[schema(example = "https://example.com/avatar.png")]
    pub profile_image_url: Option<String>,
}

/// Login request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct LoginRequest {
    /// Account email address
    #[validate(email(message = "Invalid email format"))]
    #[schema(example = "user@example.com")]
    pub email: String,
    /// Account password
    #[schema(example = "SecurePass123!")]
    pub password: String,
}

/// Login response carrying the bearer token and the account it belongs to
#[derive(Debug, Serialize, ToSchema)]
pub struct LoginResponse {
    /// JWT access token
    #[schema(example = "eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9...")]
    pub access_token: String,
    /// Token type (always "Bearer")
    #[schema(example = "Bearer")]
    pub token_type: String,
    /// Token expiration time in seconds
    #[schema(example = 86400)]
    pub expires_in: i64,
    /// Public view of the authenticated account
    pub account: AccountResponse,
}

/// Activation query parameters
#[derive(Debug, Deserialize)]
pub struct ActivateParams {
    /// Single-use code from the emailed activation link
    pub code: String,
}

/// Create authentication routes
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/activate", get(activate))
        .route("/login", post(login))
}

/// Register a new account
#[utoipa::path(
    post,
    path = "/register",
    tag = "Authentication",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Account registered, activation email queued", body = AccountResponse),
        (status = 400, description = "Validation error"),
        (status = 409, description = "Email already registered")
    )
)]
pub async fn register(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<RegisterRequest>,
) -> AppResult<(StatusCode, Json<AccountResponse>)> {
    let account = state
        .auth_service
        .register(
            payload.email,
            payload.password,
            payload.full_name,
            payload.profile_image_url,
        )
        .await?;

    Ok((StatusCode::CREATED, Json(AccountResponse::from(account))))
}

/// Activate a pending account
#[utoipa::path(
    get,
    path = "/activate",
    tag = "Authentication",
    params(
        ("code" = String, Query, description = "Single-use activation code")
    ),
    responses(
        (status = 200, description = "Account activated", body = MessageResponse),
        (status = 404, description = "Unknown or already used activation code")
    )
)]
pub async fn activate(
    State(state): State<AppState>,
    Query(params): Query<ActivateParams>,
) -> AppResult<Json<MessageResponse>> {
    state.auth_service.activate(&params.code).await?;

    Ok(Json(MessageResponse::new("Account activated successfully.")))
}

/// Login and get a bearer token
#[utoipa::path(
    post,
    path = "/login",
    tag = "Authentication",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = LoginResponse),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Invalid credentials"),
        (status = 403, description = "Account not activated")
    )
)]
pub async fn login(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<LoginRequest>,
) -> AppResult<Json<LoginResponse>> {
    let (token, account) = state
        .auth_service
        .login(payload.email, payload.password)
        .await?;

    let TokenResponse {
        access_token,
        token_type,
        expires_in,
    } = token;

    Ok(Json(LoginResponse {
        access_token,
        token_type,
        expires_in,
        account: AccountResponse::from(account),
    }))
}
