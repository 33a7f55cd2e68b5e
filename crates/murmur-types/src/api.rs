use serde::{Deserialize, Serialize};

use crate::models::{Conversation, ConversationDetail};

// -- Session --

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoginRequest {
    pub name: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LoginResponse {
    pub identifier: String,
}

// -- Profile --

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SetUsernameRequest {
    pub name: String,
}

/// Body shared by the user and group photo endpoints.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "camelCase")]
pub struct SetPhotoRequest {
    pub media_url: String,
}

// -- Conversations --

#[derive(Debug, Serialize, Deserialize)]
pub struct ConversationsResponse {
    pub conversations: Vec<Conversation>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ConversationResponse {
    pub conversation: ConversationDetail,
}

// -- Messages --

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SendMessageRequest {
    pub content: String,
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "camelCase")]
pub struct ForwardMessageRequest {
    pub conversation_id: String,
}

// -- Reactions --

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AddReactionRequest {
    pub reaction: String,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddReactionResponse {
    pub reaction_id: String,
}

// -- Groups --

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AddMemberRequest {
    pub id: String,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SetGroupNameRequest {
    pub name: String,
}

// -- Generic replies --

#[derive(Debug, Serialize, Deserialize)]
pub struct AckResponse {
    pub message: String,
}

impl AckResponse {
    pub fn ok() -> Self {
        Self { message: "OK".into() }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}
