//! WhatsApp channel via `whatsapp-rust`.
//!
//! Uses the WhatsApp Web protocol (Noise handshake + Signal encryption).
//! Pairing is done by scanning a QR code, like WhatsApp Web.
//! Session is persisted to `{data_dir}/whatsapp_session/whatsapp.db`.

mod bot;
mod channel;
mod events;
mod qr;
mod send;


pub use events::is_status_broadcast;
pub use qr::{generate_qr_image, generate_qr_terminal};
pub use send::to_jid;

use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::{mpsc, Mutex};
use tracing::info;
use wabot_core::config::WhatsAppConfig;
use wabot_core::error::BotError;
use wabot_core::message::ChannelEvent;

/// WhatsApp channel using the WhatsApp Web protocol.
pub struct WhatsAppChannel {
    pub(super) config: WhatsAppConfig,
    pub(super) data_dir: String,
    /// Client handle for sending messages, set once connected.
    pub(super) client: Arc<Mutex<Option<Arc<whatsapp_rust::client::Client>>>>,
    /// Event sender, set by `start()` and shared by every bot we build.
    pub(super) event_tx: Arc<Mutex<Option<mpsc::Sender<ChannelEvent>>>>,
    /// Last QR code that has not been scanned yet.
    pub(super) last_qr: Arc<Mutex<Option<String>>>,
    /// Set when WhatsApp logged us out; the next `initialize()` starts
    /// from an empty session so a fresh QR code is issued.
    pub(super) logged_out: Arc<AtomicBool>,
}

impl WhatsAppChannel {
    /// Create a new WhatsApp channel from config.
    pub fn new(config: WhatsAppConfig, data_dir: &str) -> Self {
        Self {
            config,
            data_dir: data_dir.to_string(),
            client: Arc::new(Mutex::new(None)),
            event_tx: Arc::new(Mutex::new(None)),
            last_qr: Arc::new(Mutex::new(None)),
            logged_out: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Directory holding the session database.
    pub(super) fn session_dir(&self) -> String {
        let dir = wabot_core::config::shellexpand(&self.data_dir);
        format!("{dir}/whatsapp_session")
    }

    /// Get the session database path, creating its directory.
    pub(super) fn session_db_path(&self) -> Result<String, BotError> {
        let session_dir = self.session_dir();
        std::fs::create_dir_all(&session_dir)?;
        Ok(format!("{session_dir}/whatsapp.db"))
    }

    /// Delete the session left behind by a logout. The flag stays set until
    /// the delete succeeds, so a failed attempt is repeated next time.
    pub(super) fn reset_session(&self) -> Result<(), BotError> {
        if !self.logged_out.load(Ordering::SeqCst) {
            return Ok(());
        }
        let session_dir = self.session_dir();
        if Path::new(&session_dir).exists() {
            info!("deleting stale WhatsApp session at {session_dir}");
            std::fs::remove_dir_all(&session_dir)?;
        }
        self.logged_out.store(false, Ordering::SeqCst);
        Ok(())
    }
}
