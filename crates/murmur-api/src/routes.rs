use axum::{
    Json, Router,
    extract::DefaultBodyLimit,
    middleware,
    routing::{delete, get, post},
};

use murmur_types::api::HealthResponse;

use crate::auth::{self, AppState};
use crate::middleware::require_auth;
use crate::{conversations, groups, messages, reactions, users};

/// Request bodies are small JSON documents; anything larger is refused.
const MAX_BODY_BYTES: usize = 64 * 1024;

/// All HTTP routes. CORS and request tracing are layered on by the binary.
pub fn router(state: AppState) -> Router {
    let public_routes = Router::new()
        .route("/health", get(health))
        .route("/session", post(auth::login))
        .with_state(state.clone());

    let protected_routes = Router::new()
        .route("/user/username", post(users::set_username))
        .route("/user/photo", post(users::set_photo))
        .route("/conversations", get(conversations::list_conversations))
        .route("/conversations/{conversation_id}", get(conversations::get_conversation))
        .route("/conversations/{conversation_id}/messages", post(messages::send_message))
        .route("/messages/{message_id}", delete(messages::delete_message))
        .route("/messages/{message_id}/forward", post(messages::forward_message))
        .route("/messages/{message_id}/reactions", post(reactions::add_reaction))
        .route(
            "/messages/{message_id}/reactions/{reaction_id}",
            delete(reactions::remove_reaction),
        )
        .route("/groups/{conversation_id}/members", post(groups::add_member))
        .route("/groups/{conversation_id}/leave", post(groups::leave_group))
        .route("/groups/{conversation_id}/name", post(groups::set_group_name))
        .route("/groups/{conversation_id}/photo", post(groups::set_group_photo))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_auth))
        .with_state(state);

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
}

pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".into(),
    })
}
