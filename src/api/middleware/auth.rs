//! Bearer token authentication middleware.

use axum::{
    async_trait,
    extract::{FromRequestParts, Request, State},
    http::header::AUTHORIZATION,
    http::request::Parts,
    http::HeaderMap,
    middleware::Next,
    response::Response,
};
use uuid::Uuid;

use crate::api::AppState;
use crate::config::BEARER_TOKEN_PREFIX;
use crate::domain::Account;
use crate::errors::AppError;

/// Authenticated account resolved from the bearer token
#[derive(Clone, Debug)]
pub struct CurrentAccount {
    pub account: Account,
}

impl CurrentAccount {
    pub fn id(&self) -> Uuid {
        self.account.id
    }
}

/// Identity resolution middleware.
///
/// Extracts the bearer token from the Authorization header and, when it
/// verifies, injects the resolved CurrentAccount into request extensions.
/// A missing or unverifiable token leaves the request unauthenticated
/// instead of rejecting it; route policy decides what that means. A token
/// that verifies but whose account no longer exists is rejected here.
pub async fn resolve_identity(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = bearer_token(request.headers()).map(str::to_owned);

    if let Some(token) = token {
        match state.auth_service.authenticate(&token).await {
            Ok(account) => {
                request.extensions_mut().insert(CurrentAccount { account });
            }
            Err(AppError::InvalidOrExpiredToken) => {
                tracing::debug!("Bearer token failed verification, proceeding unauthenticated");
            }
            Err(e) => return Err(e),
        }
    }

    Ok(next.run(request).await)
}

/// Deny-by-default middleware for protected routes.
///
/// Rejects any request that reached this point without a resolved
/// identity in its extensions.
pub async fn require_auth(request: Request, next: Next) -> Result<Response, AppError> {
    if request.extensions().get::<CurrentAccount>().is_none() {
        return Err(AppError::Unauthenticated);
    }

    Ok(next.run(request).await)
}

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix(BEARER_TOKEN_PREFIX))
}

#[async_trait]
impl<S> FromRequestParts<S> for CurrentAccount
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<CurrentAccount>()
            .cloned()
            .ok_or(AppError::Unauthenticated)
    }
}
