use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use axum_extra::extract::WithRejection;

use murmur_types::api::{AddReactionRequest, AddReactionResponse};

use crate::auth::AppState;
use crate::error::ApiError;
use crate::middleware::Session;
use crate::validation;

pub async fn add_reaction(
    State(state): State<AppState>,
    Path(message_id): Path<String>,
    Extension(_session): Extension<Session>,
    WithRejection(Json(req), _): WithRejection<Json<AddReactionRequest>, ApiError>,
) -> Result<impl IntoResponse, ApiError> {
    validation::required(&req.reaction)?;

    let reaction = state.store.add_reaction(&message_id, &req.reaction)?;

    Ok(Json(AddReactionResponse {
        reaction_id: reaction.id,
    }))
}

pub async fn remove_reaction(
    State(state): State<AppState>,
    Path((message_id, reaction_id)): Path<(String, String)>,
    Extension(_session): Extension<Session>,
) -> Result<impl IntoResponse, ApiError> {
    state.store.remove_reaction(&message_id, &reaction_id)?;
    Ok(StatusCode::NO_CONTENT)
}
