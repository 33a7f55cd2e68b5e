use axum::{
    Extension, Json,
    extract::{Path, State},
    response::IntoResponse,
};
use axum_extra::extract::WithRejection;

use murmur_types::api::{AckResponse, AddMemberRequest, SetGroupNameRequest, SetPhotoRequest};

use crate::auth::AppState;
use crate::error::ApiError;
use crate::middleware::Session;
use crate::validation;

// Every group operation except leave creates the conversation on first use,
// seeded with the caller.

pub async fn add_member(
    State(state): State<AppState>,
    Path(conversation_id): Path<String>,
    Extension(session): Extension<Session>,
    WithRejection(Json(req), _): WithRejection<Json<AddMemberRequest>, ApiError>,
) -> Result<impl IntoResponse, ApiError> {
    validation::required(&req.id)?;

    state
        .store
        .add_participant(&conversation_id, &session.user_id, &req.id)?;

    Ok(Json(AckResponse::ok()))
}

pub async fn leave_group(
    State(state): State<AppState>,
    Path(conversation_id): Path<String>,
    Extension(session): Extension<Session>,
) -> Result<impl IntoResponse, ApiError> {
    if !state
        .store
        .remove_participant(&conversation_id, &session.user_id)?
    {
        return Err(ApiError::NotFound("conversation"));
    }

    Ok(Json(AckResponse::ok()))
}

pub async fn set_group_name(
    State(state): State<AppState>,
    Path(conversation_id): Path<String>,
    Extension(session): Extension<Session>,
    WithRejection(Json(req), _): WithRejection<Json<SetGroupNameRequest>, ApiError>,
) -> Result<impl IntoResponse, ApiError> {
    validation::group_name(&req.name)?;

    state
        .store
        .set_conversation_name(&conversation_id, &session.user_id, &req.name)?;

    Ok(Json(AckResponse::ok()))
}

pub async fn set_group_photo(
    State(state): State<AppState>,
    Path(conversation_id): Path<String>,
    Extension(session): Extension<Session>,
    WithRejection(Json(req), _): WithRejection<Json<SetPhotoRequest>, ApiError>,
) -> Result<impl IntoResponse, ApiError> {
    validation::required(&req.media_url)?;

    state
        .store
        .set_conversation_photo(&conversation_id, &session.user_id, &req.media_url)?;

    Ok(Json(AckResponse::ok()))
}
