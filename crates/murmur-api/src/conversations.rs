use axum::{
    Extension, Json,
    extract::{Path, State},
    response::IntoResponse,
};

use murmur_types::api::{ConversationResponse, ConversationsResponse};

use crate::auth::AppState;
use crate::error::ApiError;
use crate::middleware::Session;

/// GET /conversations: summaries only, no message bodies.
pub async fn list_conversations(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
) -> Result<impl IntoResponse, ApiError> {
    let conversations = state.store.conversations_for(&session.user_id)?;
    Ok(Json(ConversationsResponse { conversations }))
}

/// GET /conversations/{conversation_id}: 404 both when the conversation
/// does not exist and when the caller is not in it.
pub async fn get_conversation(
    State(state): State<AppState>,
    Path(conversation_id): Path<String>,
    Extension(session): Extension<Session>,
) -> Result<impl IntoResponse, ApiError> {
    let conversation = state.store.conversation(&conversation_id, &session.user_id)?;
    Ok(Json(ConversationResponse { conversation }))
}
