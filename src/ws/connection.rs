//! WebSocket connection loop.
//!
//! Handles the read/write loop for a single WebSocket connection,
//! dispatching subscription commands and forwarding filtered events.

use axum::extract::ws::{Message, WebSocket};
use futures_util::{SinkExt, StreamExt};
use tokio::sync::broadcast;

use super::messages::{WsCommand, WsMessage, WsMessageType};
use super::subscription::{SubscriptionManager, parse_topics};
use crate::domain::DashboardEvent;

/// Runs the read/write loop for a single WebSocket connection.
///
/// - Reads commands from the client and answers each one.
/// - Forwards events from the [`broadcast::Receiver`] whose topic the
///   client subscribed to.
pub async fn run_connection(socket: WebSocket, mut event_rx: broadcast::Receiver<DashboardEvent>) {
    let (mut ws_tx, mut ws_rx) = socket.split();
    let mut subs = SubscriptionManager::new();

    loop {
        tokio::select! {
            msg = ws_rx.next() => {
                match msg {
                    Some(Ok(Message::Text(text))) => {
                        let response = handle_text_message(&text, &mut subs);
                        if let Some(resp_json) = response
                            && ws_tx.send(Message::text(resp_json)).await.is_err() {
                                break;
                            }
                    }
                    Some(Ok(Message::Close(_))) | None => break,
                    _ => {}
                }
            }
            event = event_rx.recv() => {
                match event {
                    Ok(event) => {
                        if !subs.matches(event.topic()) {
                            continue;
                        }
                        let Some(json) = event_message(&event) else {
                            continue;
                        };
                        if ws_tx.send(Message::text(json)).await.is_err() {
                            break;
                        }
                    }
                    Err(broadcast::error::RecvError::Lagged(n)) => {
                        tracing::warn!(lagged = n, "ws client lagged behind event bus");
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }
        }
    }

    tracing::debug!("ws connection closed");
}

/// Wraps a domain event in an `event` envelope.
fn event_message(event: &DashboardEvent) -> Option<String> {
    let payload = serde_json::to_value(event)
        .inspect_err(|e| tracing::error!(error = %e, "failed to encode event"))
        .ok()?;
    let mut msg = WsMessage::new(uuid::Uuid::new_v4().to_string(), WsMessageType::Event, payload);
    if let Some(obj) = msg.payload.as_object_mut() {
        obj.insert("topic".to_string(), event.topic().as_str().into());
    }
    serde_json::to_string(&msg).ok()
}

/// Handles a text frame from the client, returning the JSON reply.
fn handle_text_message(text: &str, subs: &mut SubscriptionManager) -> Option<String> {
    let Ok(msg) = serde_json::from_str::<WsMessage>(text) else {
        return serde_json::to_string(&WsMessage::error("", 400, "malformed JSON")).ok();
    };

    let Ok(command) = serde_json::from_value::<WsCommand>(msg.payload) else {
        return serde_json::to_string(&WsMessage::error(msg.id, 404, "unknown command")).ok();
    };

    let payload = match command {
        WsCommand::Subscribe { topics } => {
            let (known, wildcard, unknown) = parse_topics(&topics);
            subs.subscribe(&known, wildcard);
            tracing::debug!(topics = ?known, wildcard, "ws subscribe");
            serde_json::json!({
                "subscribed": subs.topics(),
                "wildcard": subs.is_subscribed_all(),
                "unknown": unknown,
            })
        }
        WsCommand::Unsubscribe { topics } => {
            let (known, wildcard, unknown) = parse_topics(&topics);
            subs.unsubscribe(&known, wildcard);
            serde_json::json!({
                "subscribed": subs.topics(),
                "wildcard": subs.is_subscribed_all(),
                "unknown": unknown,
            })
        }
    };

    serde_json::to_string(&WsMessage::new(msg.id, WsMessageType::Response, payload)).ok()
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use chrono::Utc;

    use super::*;
    use crate::domain::Topic;

    fn reply(text: &str, subs: &mut SubscriptionManager) -> serde_json::Value {
        let Some(json) = handle_text_message(text, subs) else {
            panic!("every frame gets a reply");
        };
        let Ok(value) = serde_json::from_str(&json) else {
            panic!("reply should be JSON");
        };
        value
    }

    #[test]
    fn malformed_json_gets_an_error() {
        let mut subs = SubscriptionManager::new();
        let value = reply("{not json", &mut subs);
        assert_eq!(value["type"], "error");
        assert_eq!(value["payload"]["code"], 400);
    }

    #[test]
    fn subscribe_reports_the_topic_set() {
        let mut subs = SubscriptionManager::new();
        let frame = serde_json::json!({
            "id": "req-1",
            "type": "command",
            "timestamp": Utc::now(),
            "payload": { "command": "subscribe", "topics": ["alerts", "herds"] }
        });
        let value = reply(&frame.to_string(), &mut subs);
        assert_eq!(value["id"], "req-1");
        assert_eq!(value["type"], "response");
        assert_eq!(value["payload"]["subscribed"], serde_json::json!(["alerts"]));
        assert_eq!(value["payload"]["unknown"], serde_json::json!(["herds"]));
        assert!(subs.matches(Topic::Alerts));
    }

    #[test]
    fn unknown_command_gets_404() {
        let mut subs = SubscriptionManager::new();
        let frame = serde_json::json!({
            "id": "req-2",
            "type": "command",
            "timestamp": Utc::now(),
            "payload": { "command": "rotate_camera" }
        });
        let value = reply(&frame.to_string(), &mut subs);
        assert_eq!(value["payload"]["code"], 404);
    }

    #[test]
    fn event_envelope_carries_topic() {
        let event = DashboardEvent::AlertResolved {
            alert_id: 3,
            resolved_at: Utc::now(),
            timestamp: Utc::now(),
        };
        let Some(json) = event_message(&event) else {
            panic!("event should encode");
        };
        let Ok(value) = serde_json::from_str::<serde_json::Value>(&json) else {
            panic!("event should be JSON");
        };
        assert_eq!(value["type"], "event");
        assert_eq!(value["payload"]["topic"], "alerts");
        assert_eq!(value["payload"]["event_type"], "alert_resolved");
    }
}
