use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// An incoming message from a channel.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IncomingMessage {
    pub id: Uuid,
    /// Channel name (e.g. "whatsapp").
    pub channel: String,
    /// Platform-specific sender ID (e.g. a WhatsApp JID).
    pub sender_id: String,
    /// Human-readable sender name.
    pub sender_name: Option<String>,
    /// Message text content.
    pub text: String,
    pub timestamp: DateTime<Utc>,
    /// Platform-specific target for routing the response (e.g. the chat JID).
    #[serde(default)]
    pub reply_target: Option<String>,
    /// Whether this message comes from a group chat.
    #[serde(default)]
    pub is_group: bool,
    /// Whether the sender is a system broadcast channel (status updates).
    /// Broadcast messages are never answered.
    #[serde(default)]
    pub is_broadcast: bool,
}

impl IncomingMessage {
    /// Build a plain text message with fresh id and timestamp.
    pub fn text(channel: &str, sender_id: &str, text: &str) -> Self {
        Self {
            id: Uuid::new_v4(),
            channel: channel.to_string(),
            sender_id: sender_id.to_string(),
            sender_name: None,
            text: text.to_string(),
            timestamp: Utc::now(),
            reply_target: Some(sender_id.to_string()),
            is_group: false,
            is_broadcast: false,
        }
    }
}

/// An outgoing message to send back through a channel.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OutgoingMessage {
    pub text: String,
    /// Platform-specific target for routing (e.g. the chat JID).
    #[serde(default)]
    pub reply_target: Option<String>,
}

impl OutgoingMessage {
    /// A reply addressed to wherever `incoming` came from.
    pub fn reply_to(incoming: &IncomingMessage, text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            reply_target: incoming
                .reply_target
                .clone()
                .or_else(|| Some(incoming.sender_id.clone())),
        }
    }
}

/// Everything a channel reports back to the gateway.
#[derive(Debug, Clone)]
pub enum ChannelEvent {
    /// A user message.
    Message(IncomingMessage),
    /// A pairing code to be shown as a QR code.
    Qr(String),
    /// The session is authenticated and connected.
    Ready,
    /// The connection dropped; the payload is a human-readable reason.
    Disconnected(String),
    /// Pairing or authentication was rejected.
    AuthFailure(String),
}
