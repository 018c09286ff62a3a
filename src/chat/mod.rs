//! Chat assistant relay.
//!
//! The dashboard's chat panel posts its conversation here; the relay forwards
//! it to an OpenAI-compatible chat-completions endpoint and streams the
//! upstream response back unchanged. No model logic lives in this crate.

pub mod relay;

pub use relay::{ChatMessage, ChatRelay, ChatRole};
