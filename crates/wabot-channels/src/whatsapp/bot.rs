//! Bot lifecycle: building and running the WhatsApp client.

use super::events::to_incoming;
use super::WhatsAppChannel;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::{debug, info, warn};
use wabot_core::{error::BotError, message::ChannelEvent};
use wacore::types::events::Event;
use whatsapp_rust::bot::Bot;
use whatsapp_rust_sqlite_storage::SqliteStore;
use whatsapp_rust_tokio_transport::TokioWebSocketTransportFactory;
use whatsapp_rust_ureq_http_client::UreqHttpClient;

impl WhatsAppChannel {
    /// Build a WhatsApp bot wired to the shared event sender and run it in
    /// the background.
    ///
    /// After a logout the stale session is deleted first; the library will
    /// not issue new QR codes with invalidated keys.
    pub(super) async fn build_and_run_bot(&self) -> Result<(), BotError> {
        let tx = self
            .event_tx
            .lock()
            .await
            .clone()
            .ok_or_else(|| BotError::Channel("WhatsApp not started yet".into()))?;

        self.reset_session()?;

        // Any previous bot is orphaned from here on.
        *self.client.lock().await = None;
        *self.last_qr.lock().await = None;

        let db_path = self.session_db_path()?;
        info!("WhatsApp bot building (session: {db_path})...");

        let backend = Arc::new(
            SqliteStore::new(&db_path)
                .await
                .map_err(|e| BotError::Channel(format!("whatsapp store init failed: {e}")))?,
        );

        let allowed_users = self.config.allowed_users.clone();
        let client_handle = self.client.clone();
        let last_qr_handle = self.last_qr.clone();
        let logged_out_handle = self.logged_out.clone();

        let mut bot = Bot::builder()
            .with_backend(backend)
            .with_transport_factory(TokioWebSocketTransportFactory::new())
            .with_http_client(UreqHttpClient::new())
            .with_device_props(
                Some("WABOT".to_string()),
                None,
                Some(waproto::whatsapp::device_props::PlatformType::Desktop),
            )
            .on_event(move |event, client| {
                let tx = tx.clone();
                let allowed = allowed_users.clone();
                let client_store = client_handle.clone();
                let last_qr = last_qr_handle.clone();
                let logged_out = logged_out_handle.clone();
                async move {
                    let forwarded = match event {
                        Event::PairingQrCode { code, .. } => {
                            debug!("QR data: {code}");
                            *last_qr.lock().await = Some(code.clone());
                            Some(ChannelEvent::Qr(code))
                        }
                        Event::PairSuccess(_) => {
                            info!("WhatsApp pairing successful");
                            None
                        }
                        Event::PairError(err) => {
                            Some(ChannelEvent::AuthFailure(format!("pairing failed: {err:?}")))
                        }
                        Event::Connected(_) => {
                            *client_store.lock().await = Some(client);
                            *last_qr.lock().await = None;
                            Some(ChannelEvent::Ready)
                        }
                        Event::Disconnected(_) => {
                            // Transient drops are retried by the library itself.
                            warn!("WhatsApp connection dropped");
                            *client_store.lock().await = None;
                            None
                        }
                        Event::LoggedOut(info) => {
                            *client_store.lock().await = None;
                            logged_out.store(true, Ordering::SeqCst);
                            Some(ChannelEvent::Disconnected(format!("logged out: {info:?}")))
                        }
                        Event::Message(msg, info) => {
                            to_incoming(&msg, &info, &allowed).map(ChannelEvent::Message)
                        }
                        _ => None,
                    };

                    if let Some(event) = forwarded {
                        if tx.send(event).await.is_err() {
                            info!("whatsapp channel receiver dropped");
                        }
                    }
                }
            })
            .build()
            .await
            .map_err(|e| BotError::Channel(format!("whatsapp bot build failed: {e}")))?;

        // Run bot in background.
        let _handle = bot
            .run()
            .await
            .map_err(|e| BotError::Channel(format!("whatsapp bot run failed: {e}")))?;

        info!("WhatsApp bot started");
        Ok(())
    }
}
