use axum::{Extension, Json, extract::State, response::IntoResponse};
use axum_extra::extract::WithRejection;
use tracing::info;

use murmur_types::api::{AckResponse, SetPhotoRequest, SetUsernameRequest};

use crate::auth::AppState;
use crate::error::ApiError;
use crate::middleware::Session;
use crate::validation;

/// POST /user/username: a name held by another user is rejected with 400.
pub async fn set_username(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    WithRejection(Json(req), _): WithRejection<Json<SetUsernameRequest>, ApiError>,
) -> Result<impl IntoResponse, ApiError> {
    validation::username(&req.name)?;

    state.store.rename(&session.user_id, &req.name)?;
    info!("User {} is now '{}'", session.user_id, req.name);

    Ok(Json(AckResponse::ok()))
}

pub async fn set_photo(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    WithRejection(Json(req), _): WithRejection<Json<SetPhotoRequest>, ApiError>,
) -> Result<impl IntoResponse, ApiError> {
    validation::required(&req.media_url)?;

    state.store.set_user_photo(&session.user_id, &req.media_url)?;

    Ok(Json(AckResponse::ok()))
}
