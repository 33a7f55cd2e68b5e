use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use axum_extra::extract::WithRejection;
use tracing::info;

use murmur_types::api::{ForwardMessageRequest, SendMessageRequest};
use murmur_types::models::DEFAULT_MESSAGE_TYPE;

use crate::auth::AppState;
use crate::error::ApiError;
use crate::middleware::Session;
use crate::validation;

/// Sending into an unknown conversation creates it with the sender as its
/// only participant.
pub async fn send_message(
    State(state): State<AppState>,
    Path(conversation_id): Path<String>,
    Extension(session): Extension<Session>,
    WithRejection(Json(req), _): WithRejection<Json<SendMessageRequest>, ApiError>,
) -> Result<impl IntoResponse, ApiError> {
    validation::required(&req.content)?;

    let kind = req
        .kind
        .as_deref()
        .filter(|k| !k.is_empty())
        .unwrap_or(DEFAULT_MESSAGE_TYPE);

    let message = state
        .store
        .send_message(&conversation_id, &session.user_id, &req.content, kind)?;

    Ok((StatusCode::CREATED, Json(message)))
}

pub async fn forward_message(
    State(state): State<AppState>,
    Path(message_id): Path<String>,
    Extension(session): Extension<Session>,
    WithRejection(Json(req), _): WithRejection<Json<ForwardMessageRequest>, ApiError>,
) -> Result<impl IntoResponse, ApiError> {
    validation::required(&req.conversation_id)?;

    let message = state
        .store
        .forward_message(&message_id, &req.conversation_id, &session.user_id)?;
    info!(
        "User {} forwarded {} into {} as {}",
        session.user_id, message_id, req.conversation_id, message.id
    );

    Ok(Json(message))
}

/// No ownership check: any authenticated user may delete any message.
pub async fn delete_message(
    State(state): State<AppState>,
    Path(message_id): Path<String>,
    Extension(session): Extension<Session>,
) -> Result<impl IntoResponse, ApiError> {
    state.store.delete_message(&message_id)?;
    info!("User {} deleted message {}", session.user_id, message_id);

    Ok(StatusCode::NO_CONTENT)
}
