use crate::{
    error::BotError,
    message::{ChannelEvent, OutgoingMessage},
};
use async_trait::async_trait;

/// Messaging Channel trait: the transport the bot talks through.
///
/// A channel owns its connection and session. The gateway only sees the
/// event stream returned by [`Channel::start`] and the `send` operation.
#[async_trait]
pub trait Channel: Send + Sync {
    /// Human-readable channel name.
    fn name(&self) -> &str;

    /// Prepare the event stream. Does not connect; call
    /// [`Channel::initialize`] afterwards.
    async fn start(&self) -> Result<tokio::sync::mpsc::Receiver<ChannelEvent>, BotError>;

    /// Connect (or reconnect) to the platform. Events flow into the
    /// receiver returned by `start`.
    async fn initialize(&self) -> Result<(), BotError>;

    /// Send a message back through this channel.
    async fn send(&self, message: OutgoingMessage) -> Result<(), BotError>;

    /// Whether the channel currently holds a live connection.
    async fn is_connected(&self) -> bool {
        false
    }

    /// The latest pairing code that has not been scanned yet, if any.
    async fn pending_qr(&self) -> Option<String> {
        None
    }

    /// Graceful shutdown.
    async fn stop(&self) -> Result<(), BotError>;
}
