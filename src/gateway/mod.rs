//! Gateway: the event loop connecting the channel to the responder.
//!
//! Includes: broadcast filtering, reply delivery, connection lifecycle
//! (initial connect with retry, reconnect after logout, admin notice),
//! the HTTP health server, and graceful shutdown.

mod lifecycle;


use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tracing::{debug, error, info, warn};
use wabot_core::{
    config::{ApiConfig, Config},
    message::{ChannelEvent, IncomingMessage, OutgoingMessage},
    traits::Channel,
};
use wabot_responder::{uniform, Decision, ReplyContext, Responder};

/// The central gateway that routes messages between the channel and the
/// responder.
pub struct Gateway {
    pub(super) channel: Arc<dyn Channel>,
    pub(super) responder: Arc<Responder>,
    pub(super) api_config: ApiConfig,
    pub(super) bot_name: String,
    /// Label for the online notice.
    pub(super) server_name: String,
    /// Who to tell when the bot comes online. Empty = nobody.
    pub(super) admin_number: String,
    pub(super) reconnect_delay: Duration,
    pub(super) init_retry: Duration,
    pub(super) uptime: Instant,
    /// Source of the fallback draw.
    pub(super) roll: fn() -> f64,
    /// Held for the whole span of a (re)connect attempt loop.
    pub(super) init_lock: Mutex<()>,
    /// Set once the admin has been told about the current session.
    pub(super) announced: AtomicBool,
    /// Background tasks aborted on shutdown.
    pub(super) tasks: std::sync::Mutex<Vec<tokio::task::JoinHandle<()>>>,
}

impl Gateway {
    /// Create a new gateway.
    pub fn new(channel: Arc<dyn Channel>, responder: Arc<Responder>, config: &Config) -> Self {
        Self {
            channel,
            responder,
            api_config: config.api.clone(),
            bot_name: config.bot.name.clone(),
            server_name: config.bot.server_name.clone(),
            admin_number: config.whatsapp.admin_number.clone(),
            reconnect_delay: Duration::from_secs(config.whatsapp.reconnect_delay_secs),
            init_retry: Duration::from_secs(config.whatsapp.init_retry_secs),
            uptime: Instant::now(),
            roll: uniform,
            init_lock: Mutex::new(()),
            announced: AtomicBool::new(false),
            tasks: std::sync::Mutex::new(Vec::new()),
        }
    }

    /// Replace the fallback draw source.
    pub fn with_roll(mut self, roll: fn() -> f64) -> Self {
        self.roll = roll;
        self
    }

    /// Run the main event loop until Ctrl-C or until the channel closes.
    pub async fn run(self: Arc<Self>) -> anyhow::Result<()> {
        info!(
            "{} gateway running | channel: {} | commands: {} | keyword rules: {}",
            self.bot_name,
            self.channel.name(),
            self.responder.commands().len(),
            self.responder.keywords().len(),
        );

        let mut rx = self
            .channel
            .start()
            .await
            .map_err(|e| anyhow::anyhow!("failed to start channel {}: {e}", self.channel.name()))?;

        if self.api_config.enabled {
            let state = crate::api::ApiState::new(
                self.channel.clone(),
                self.uptime,
                self.bot_name.clone(),
            );
            let cfg = self.api_config.clone();
            self.track(tokio::spawn(async move {
                crate::api::serve(cfg, state).await;
            }));
        }

        let gw = self.clone();
        self.track(tokio::spawn(async move {
            gw.connect().await;
        }));

        loop {
            tokio::select! {
                event = rx.recv() => match event {
                    Some(event) => self.handle_event(event).await,
                    None => {
                        warn!("channel event stream closed");
                        break;
                    }
                },
                _ = tokio::signal::ctrl_c() => {
                    info!("🛑 Received shutdown signal");
                    break;
                }
            }
        }

        self.shutdown().await;
        Ok(())
    }

    /// React to one channel event. Messages are handled inline, so replies
    /// go out in the order messages arrived.
    pub(super) async fn handle_event(self: &Arc<Self>, event: ChannelEvent) {
        match event {
            ChannelEvent::Message(incoming) => self.handle_message(incoming).await,
            ChannelEvent::Qr(code) => self.show_qr(&code),
            ChannelEvent::Ready => {
                info!("✅ Client is ready and connected");
                // The library reconnects on its own and reports Ready each
                // time; the admin hears about it once per initialize.
                if !self.announced.swap(true, Ordering::SeqCst) {
                    self.notify_admin().await;
                }
            }
            ChannelEvent::AuthFailure(reason) => {
                error!("❌ Authentication failure: {reason}");
            }
            ChannelEvent::Disconnected(reason) => {
                warn!("❌ Client was logged out: {reason}");
                self.schedule_reconnect();
            }
        }
    }

    /// Run a message through the responder and send the reply, if any.
    pub(super) async fn handle_message(&self, incoming: IncomingMessage) {
        if incoming.is_broadcast {
            debug!("ignoring broadcast from {}", incoming.sender_id);
            return;
        }

        info!("📩 message from {}: {}", sender_label(&incoming), incoming.text);

        let ctx = ReplyContext::capture(self.uptime);
        match self.responder.decide(&incoming, &ctx, self.roll) {
            Decision::Reply(text) => self.send_text(&incoming, text).await,
            Decision::NoReply => debug!("no reply for message {}", incoming.id),
        }
    }

    /// Send a plain text message back to the sender. Failures are logged.
    pub(super) async fn send_text(&self, incoming: &IncomingMessage, text: String) {
        let msg = OutgoingMessage::reply_to(incoming, text);
        if let Err(e) = self.channel.send(msg).await {
            error!("failed to send reply to {}: {e}", incoming.sender_id);
        }
    }

    pub(super) fn track(&self, handle: tokio::task::JoinHandle<()>) {
        if let Ok(mut tasks) = self.tasks.lock() {
            tasks.retain(|h| !h.is_finished());
            tasks.push(handle);
        }
    }

    /// Graceful shutdown: abort background tasks, stop the channel.
    pub(super) async fn shutdown(&self) {
        info!("Shutting down gracefully...");

        if let Ok(mut tasks) = self.tasks.lock() {
            for handle in tasks.drain(..) {
                handle.abort();
            }
        }

        match self.channel.stop().await {
            Ok(()) => info!("✅ Channel {} stopped", self.channel.name()),
            Err(e) => error!("error stopping channel {}: {e}", self.channel.name()),
        }

        info!("Shutdown complete.");
    }
}

/// Who sent a message, for logs: push name and JID, plus the group chat.
pub(super) fn sender_label(msg: &IncomingMessage) -> String {
    let mut label = match msg.sender_name.as_deref() {
        Some(name) if name != msg.sender_id => format!("{name} <{}>", msg.sender_id),
        _ => msg.sender_id.clone(),
    };
    if msg.is_group {
        if let Some(chat) = msg.reply_target.as_deref() {
            label.push_str(&format!(" in {chat}"));
        }
    }
    label
}
