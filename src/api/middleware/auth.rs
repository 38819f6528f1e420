//! JWT authentication middleware.

use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
};
use uuid::Uuid;

use crate::api::AppState;
use crate::config::BEARER_TOKEN_PREFIX;
use crate::errors::AppError;

/// Authenticated caller extracted from the JWT and re-checked against
/// the user store on every request.
#[derive(Clone, Debug)]
pub struct CurrentUser {
    pub id: Uuid,
    pub email: String,
    pub role_ids: Vec<Uuid>,
}

/// Extracts and validates the bearer token from the Authorization
/// header, confirms the account still exists and is active, then
/// injects the CurrentUser into the request extensions.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let auth_header = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .ok_or(AppError::Unauthorized)?;

    let token = auth_header
        .strip_prefix(BEARER_TOKEN_PREFIX)
        .ok_or(AppError::Unauthorized)?;

    let claims = state.auth_service.verify_token(token)?;

    // Tokens issued before a deactivation or deletion must stop working,
    // so the account is re-resolved here rather than trusted from claims.
    let user = state
        .user_service
        .get(claims.sub)
        .await
        .map_err(|_| AppError::Unauthorized)?;

    if !user.is_active {
        return Err(AppError::Unauthorized);
    }

    let current_user = CurrentUser {
        id: user.id,
        email: user.email,
        role_ids: user.role_ids,
    };

    request.extensions_mut().insert(current_user);

    Ok(next.run(request).await)
}
