use axum::{
    extract::{Request, State},
    http::{HeaderMap, header},
    middleware::Next,
    response::Response,
};
use tracing::debug;

use crate::auth::AppState;
use crate::error::ApiError;

/// The authenticated caller, inserted into request extensions.
#[derive(Debug, Clone)]
pub struct Session {
    pub user_id: String,
}

/// Accepts `Authorization: Bearer <identifier>` where the identifier belongs
/// to a known user. The token is not signed; knowing an identifier is enough.
pub async fn require_auth(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = bearer_token(req.headers()).ok_or(ApiError::Unauthorized)?;

    let user = state.store.user(token)?.ok_or_else(|| {
        debug!("Rejected unknown bearer token");
        ApiError::Unauthorized
    })?;

    req.extensions_mut().insert(Session {
        user_id: user.identifier,
    });
    Ok(next.run(req).await)
}

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }
    let token = token.trim();
    (!token.is_empty()).then_some(token)
}
