//! Per-connection subscription manager.
//!
//! Tracks which topics a WebSocket client listens to and filters events
//! server-side.

use std::collections::BTreeSet;

use crate::domain::Topic;

/// Topic subscriptions for a single WebSocket connection.
#[derive(Debug, Default)]
pub struct SubscriptionManager {
    /// Explicit topics. Ignored while `subscribe_all` is set.
    topics: BTreeSet<Topic>,
    /// Wildcard `"*"` subscription.
    subscribe_all: bool,
}

impl SubscriptionManager {
    /// Creates a new empty subscription manager.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds topics to the subscription set.
    pub fn subscribe(&mut self, topics: &[Topic], wildcard: bool) {
        if wildcard {
            self.subscribe_all = true;
        }
        self.topics.extend(topics.iter().copied());
    }

    /// Removes topics from the subscription set.
    pub fn unsubscribe(&mut self, topics: &[Topic], wildcard: bool) {
        if wildcard {
            self.subscribe_all = false;
        }
        for topic in topics {
            self.topics.remove(topic);
        }
    }

    /// Returns `true` if events on `topic` should reach this client.
    #[must_use]
    pub fn matches(&self, topic: Topic) -> bool {
        self.subscribe_all || self.topics.contains(&topic)
    }

    /// Explicitly subscribed topics, in stable order.
    #[must_use]
    pub fn topics(&self) -> Vec<Topic> {
        self.topics.iter().copied().collect()
    }

    /// Returns `true` if the wildcard subscription is active.
    #[must_use]
    pub fn is_subscribed_all(&self) -> bool {
        self.subscribe_all
    }
}

/// Splits raw topic names into known topics, the wildcard flag, and
/// names that matched nothing.
#[must_use]
pub fn parse_topics(raw: &[String]) -> (Vec<Topic>, bool, Vec<String>) {
    let mut topics = Vec::new();
    let mut wildcard = false;
    let mut unknown = Vec::new();
    for name in raw {
        if name == "*" {
            wildcard = true;
        } else if let Ok(topic) = name.parse::<Topic>() {
            topics.push(topic);
        } else {
            unknown.push(name.clone());
        }
    }
    (topics, wildcard, unknown)
}
