//! Chat relay request body.

use serde::Deserialize;
use utoipa::ToSchema;

use crate::chat::ChatMessage;

/// Request body for `POST /chat`.
#[derive(Debug, Deserialize, ToSchema)]
pub struct ChatRequest {
    /// Conversation so far, oldest first.
    pub messages: Vec<ChatMessage>,
}
