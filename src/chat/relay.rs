//! Outbound client for the chat-completion endpoint.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::config::ChatConfig;
use crate::error::DashboardError;

/// Most messages accepted in a single relayed conversation.
pub const MAX_MESSAGES: usize = 100;

/// Author of a chat message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    /// Instructions for the assistant.
    System,
    /// The dashboard user.
    User,
    /// A previous assistant reply.
    Assistant,
}

/// One message of the conversation.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ChatMessage {
    /// Author.
    pub role: ChatRole,
    /// Message text.
    pub content: String,
}

/// Forwards conversations to the configured upstream.
#[derive(Debug, Clone)]
pub struct ChatRelay {
    http: reqwest::Client,
    config: Option<ChatConfig>,
}

impl ChatRelay {
    /// Creates a relay. With `None` every call fails with
    /// [`DashboardError::ChatUnavailable`].
    #[must_use]
    pub fn new(config: Option<ChatConfig>) -> Self {
        Self {
            http: reqwest::Client::new(),
            config,
        }
    }

    /// Returns `true` if an upstream is configured.
    #[must_use]
    pub const fn is_configured(&self) -> bool {
        self.config.is_some()
    }

    /// Builds the upstream request body.
    #[must_use]
    pub fn request_body(model: &str, messages: &[ChatMessage]) -> serde_json::Value {
        serde_json::json!({
            "model": model,
            "messages": messages,
            "stream": true,
        })
    }

    /// Sends the conversation upstream and returns the streaming response.
    ///
    /// # Errors
    ///
    /// Returns [`DashboardError::InvalidRequest`] for an empty or oversized
    /// conversation, [`DashboardError::ChatUnavailable`] when no upstream is
    /// configured, and [`DashboardError::ChatUpstream`] when the upstream
    /// cannot be reached or answers with a non-success status.
    pub async fn stream(
        &self,
        messages: &[ChatMessage],
    ) -> Result<reqwest::Response, DashboardError> {
        validate(messages)?;
        let Some(config) = &self.config else {
            return Err(DashboardError::ChatUnavailable(
                "no chat endpoint configured".to_string(),
            ));
        };

        let mut request = self
            .http
            .post(&config.api_url)
            .json(&Self::request_body(&config.model, messages));
        if let Some(key) = &config.api_key {
            request = request.bearer_auth(key);
        }

        let response = request.send().await.map_err(|e| {
            tracing::error!(error = %e, "chat upstream unreachable");
            DashboardError::ChatUpstream(e.to_string())
        })?;

        let status = response.status();
        if !status.is_success() {
            tracing::error!(%status, "chat upstream rejected request");
            return Err(DashboardError::ChatUpstream(format!(
                "upstream answered {status}"
            )));
        }

        tracing::debug!(messages = messages.len(), "chat stream opened");
        Ok(response)
    }
}

fn validate(messages: &[ChatMessage]) -> Result<(), DashboardError> {
    if messages.is_empty() {
        return Err(DashboardError::InvalidRequest(
            "messages must not be empty".to_string(),
        ));
    }
    if messages.len() > MAX_MESSAGES {
        return Err(DashboardError::InvalidRequest(format!(
            "at most {MAX_MESSAGES} messages per request"
        )));
    }
    if messages.iter().any(|m| m.content.trim().is_empty()) {
        return Err(DashboardError::InvalidRequest(
            "message content must not be blank".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    fn user(content: &str) -> ChatMessage {
        ChatMessage {
            role: ChatRole::User,
            content: content.to_string(),
        }
    }

    #[test]
    fn request_body_enables_streaming() {
        let body = ChatRelay::request_body("gpt-4o-mini", &[user("How many tigers are tagged?")]);
        assert_eq!(body["model"], "gpt-4o-mini");
        assert_eq!(body["stream"], true);
        assert_eq!(body["messages"][0]["role"], "user");
    }

    #[tokio::test]
    async fn unconfigured_relay_is_unavailable() {
        let relay = ChatRelay::new(None);
        assert!(!relay.is_configured());
        assert!(matches!(
            relay.stream(&[user("hello")]).await,
            Err(DashboardError::ChatUnavailable(_))
        ));
    }

    #[tokio::test]
    async fn empty_conversation_is_rejected_first() {
        let relay = ChatRelay::new(None);
        assert!(matches!(
            relay.stream(&[]).await,
            Err(DashboardError::InvalidRequest(_))
        ));
        assert!(matches!(
            relay.stream(&[user("   ")]).await,
            Err(DashboardError::InvalidRequest(_))
        ));
    }

    #[test]
    fn roles_deserialize_lowercase() {
        let Ok(msg) = serde_json::from_value::<ChatMessage>(serde_json::json!({
            "role": "assistant",
            "content": "Two tigers were seen today."
        })) else {
            panic!("should deserialize");
        };
        assert_eq!(msg.role, ChatRole::Assistant);
    }
}
