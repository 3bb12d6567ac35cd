//! Channel trait implementation for WhatsApp.

use super::send::{retry_send, split_message, to_jid, MAX_MESSAGE_LEN};
use super::WhatsAppChannel;
use async_trait::async_trait;
use tokio::sync::mpsc;
use tracing::info;
use wabot_core::{
    error::BotError,
    message::{ChannelEvent, OutgoingMessage},
    traits::Channel,
};
use wacore_binary::jid::Jid;

impl WhatsAppChannel {
    /// Send a text message to a phone number or JID.
    async fn send_text(&self, target: &str, text: &str) -> Result<(), BotError> {
        let client = self
            .client
            .lock()
            .await
            .clone()
            .ok_or_else(|| BotError::Channel("whatsapp client not connected".into()))?;

        let jid_str = to_jid(target);
        let jid: Jid = jid_str
            .parse()
            .map_err(|e| BotError::Channel(format!("invalid whatsapp JID '{jid_str}': {e}")))?;

        for chunk in split_message(text, MAX_MESSAGE_LEN) {
            let msg = waproto::whatsapp::Message {
                conversation: Some(chunk.to_string()),
                ..Default::default()
            };
            retry_send(&client, &jid, msg).await?;
        }

        Ok(())
    }
}

#[async_trait]
impl Channel for WhatsAppChannel {
    fn name(&self) -> &str {
        "whatsapp"
    }

    async fn start(&self) -> Result<mpsc::Receiver<ChannelEvent>, BotError> {
        let (tx, rx) = mpsc::channel(64);
        *self.event_tx.lock().await = Some(tx);
        info!("WhatsApp channel started");
        Ok(rx)
    }

    async fn initialize(&self) -> Result<(), BotError> {
        self.build_and_run_bot().await
    }

    async fn send(&self, message: OutgoingMessage) -> Result<(), BotError> {
        let target = message
            .reply_target
            .as_deref()
            .ok_or_else(|| BotError::Channel("no reply_target on outgoing message".into()))?;

        self.send_text(target, &message.text).await
    }

    async fn is_connected(&self) -> bool {
        self.client.lock().await.is_some()
    }

    async fn pending_qr(&self) -> Option<String> {
        self.last_qr.lock().await.clone()
    }

    async fn stop(&self) -> Result<(), BotError> {
        *self.client.lock().await = None;
        *self.event_tx.lock().await = None;
        info!("WhatsApp channel stopped");
        Ok(())
    }
}
