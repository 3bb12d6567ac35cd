//! Test doubles shared by the gateway and API tests.

use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::mpsc;
use wabot_core::{
    error::BotError,
    message::{ChannelEvent, OutgoingMessage},
    traits::Channel,
};

/// A mock channel that records sent messages for assertion.
pub struct MockChannel {
    name: String,
    sent: Arc<Mutex<Vec<OutgoingMessage>>>,
    /// When true, `send()` returns an error (simulates delivery failure).
    fail_send: bool,
    send_attempts: Arc<AtomicUsize>,
    /// Number of `initialize()` calls that fail before one succeeds.
    init_failures: AtomicUsize,
    init_calls: Arc<AtomicUsize>,
    connected: AtomicBool,
    qr: Mutex<Option<String>>,
    events_tx: Mutex<Option<mpsc::Sender<ChannelEvent>>>,
    events_rx: Mutex<Option<mpsc::Receiver<ChannelEvent>>>,
}

impl MockChannel {
    pub fn new(name: &str) -> (Self, Arc<Mutex<Vec<OutgoingMessage>>>) {
        let sent = Arc::new(Mutex::new(Vec::new()));
        let (tx, rx) = mpsc::channel(16);
        (
            Self {
                name: name.to_string(),
                sent: Arc::clone(&sent),
                fail_send: false,
                send_attempts: Arc::new(AtomicUsize::new(0)),
                init_failures: AtomicUsize::new(0),
                init_calls: Arc::new(AtomicUsize::new(0)),
                connected: AtomicBool::new(false),
                qr: Mutex::new(None),
                events_tx: Mutex::new(Some(tx)),
                events_rx: Mutex::new(Some(rx)),
            },
            sent,
        )
    }

    pub fn new_failing(name: &str) -> Self {
        let (mut mock, _sent) = Self::new(name);
        mock.fail_send = true;
        mock
    }

    /// Shared counter of `send()` calls, failed ones included.
    pub fn send_attempts(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.send_attempts)
    }

    /// Make the next `n` calls to `initialize()` fail.
    pub fn fail_initialize(self, n: usize) -> Self {
        self.init_failures.store(n, Ordering::SeqCst);
        self
    }

    /// Shared counter of `initialize()` calls.
    pub fn init_calls(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.init_calls)
    }

    /// Hand out the sender side of the event stream. Dropping it ends `run()`.
    pub fn take_events(&self) -> mpsc::Sender<ChannelEvent> {
        self.events_tx
            .lock()
            .unwrap()
            .take()
            .expect("event sender already taken")
    }

    pub fn set_connected(&self, connected: bool) {
        self.connected.store(connected, Ordering::SeqCst);
    }

    pub fn set_qr(&self, code: Option<String>) {
        *self.qr.lock().unwrap() = code;
    }
}

#[async_trait]
impl Channel for MockChannel {
    fn name(&self) -> &str {
        &self.name
    }

    async fn start(&self) -> Result<mpsc::Receiver<ChannelEvent>, BotError> {
        self.events_rx
            .lock()
            .unwrap()
            .take()
            .ok_or_else(|| BotError::Channel("already started".to_string()))
    }

    async fn initialize(&self) -> Result<(), BotError> {
        self.init_calls.fetch_add(1, Ordering::SeqCst);
        let remaining = self.init_failures.load(Ordering::SeqCst);
        if remaining > 0 {
            self.init_failures.store(remaining - 1, Ordering::SeqCst);
            return Err(BotError::Channel("browser launch failed".to_string()));
        }
        Ok(())
    }

    async fn send(&self, message: OutgoingMessage) -> Result<(), BotError> {
        self.send_attempts.fetch_add(1, Ordering::SeqCst);
        if self.fail_send {
            return Err(BotError::Channel("connection reset".to_string()));
        }
        self.sent.lock().unwrap().push(message);
        Ok(())
    }

    async fn is_connected(&self) -> bool {
        self.connected.load(Ordering::SeqCst)
    }

    async fn pending_qr(&self) -> Option<String> {
        self.qr.lock().unwrap().clone()
    }

    async fn stop(&self) -> Result<(), BotError> {
        Ok(())
    }
}
