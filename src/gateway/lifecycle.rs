//! Connection lifecycle glue: connect with retry, reconnect, online notice.

use super::Gateway;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::{error, info, warn};
use wabot_channels::whatsapp::generate_qr_terminal;
use wabot_core::{message::OutgoingMessage, uptime::format_uptime};

impl Gateway {
    /// Initialize the channel, retrying every `init_retry` until it works.
    ///
    /// Only one connect loop runs at a time; a call that finds another in
    /// flight returns immediately and leaves the work to it.
    pub(super) async fn connect(&self) {
        let Ok(_guard) = self.init_lock.try_lock() else {
            info!("initialization already in progress, skipping");
            return;
        };

        loop {
            self.announced.store(false, Ordering::SeqCst);
            match self.channel.initialize().await {
                Ok(()) => {
                    info!("🚀 {} client initialization started", self.channel.name());
                    return;
                }
                Err(e) => {
                    error!(
                        "failed to initialize client: {e}; retrying in {}s",
                        self.init_retry.as_secs()
                    );
                    tokio::time::sleep(self.init_retry).await;
                }
            }
        }
    }

    /// Reconnect after `reconnect_delay`, in the background.
    pub(super) fn schedule_reconnect(self: &Arc<Self>) {
        info!(
            "🔄 Attempting to reconnect in {} seconds...",
            self.reconnect_delay.as_secs()
        );
        let gw = self.clone();
        self.track(tokio::spawn(async move {
            tokio::time::sleep(gw.reconnect_delay).await;
            gw.connect().await;
        }));
    }

    /// Text of the notice sent to the admin when the bot comes online.
    pub(super) fn online_notice(&self) -> String {
        format!(
            "🤖 {} is now online!\n\nServer: {}\nUptime: {}",
            self.bot_name,
            self.server_name,
            format_uptime(self.uptime.elapsed())
        )
    }

    /// Tell the configured admin that the bot is online.
    pub(super) async fn notify_admin(&self) {
        if self.admin_number.is_empty() {
            return;
        }
        let msg = OutgoingMessage {
            text: self.online_notice(),
            reply_target: Some(self.admin_number.clone()),
        };
        if let Err(e) = self.channel.send(msg).await {
            error!("failed to notify admin {}: {e}", self.admin_number);
        }
    }

    /// Print a pairing code as a terminal QR code.
    pub(super) fn show_qr(&self, code: &str) {
        info!("QR RECEIVED: scan this QR code with WhatsApp (Linked devices)");
        match generate_qr_terminal(code) {
            Ok(qr) => println!("\n{qr}"),
            Err(e) => {
                warn!("could not render QR code: {e}");
                println!("Raw QR data: {code}");
            }
        }
    }
}
