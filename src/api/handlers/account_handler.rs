//! Account handlers.

use axum::{response::Json, routing::get, Router};

use crate::api::middleware::CurrentAccount;
use crate::api::AppState;
use crate::domain::AccountResponse;

/// Create account routes (mounted behind the authentication middleware)
pub fn account_routes() -> Router<AppState> {
    Router::new().route("/profile", get(profile))
}

/// Get the authenticated account's profile
#[utoipa::path(
    get,
    path = "/profile",
    tag = "Account",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Authenticated account profile", body = AccountResponse),
        (status = 401, description = "Missing or invalid token")
    )
)]
pub async fn profile(current: CurrentAccount) -> Json<AccountResponse> {
    Json(AccountResponse::from(current.account))
}
