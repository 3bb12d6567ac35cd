//! HTTP server: landing page, health check, and QR pairing status.
//!
//! Spawned as a background task by the gateway.

use axum::{
    extract::State,
    http::StatusCode,
    response::{Html, Json},
    routing::get,
    Router,
};
use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use chrono::Utc;
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Instant;
use tracing::{error, info};
use wabot_channels::whatsapp;
use wabot_core::{config::ApiConfig, traits::Channel, uptime::format_uptime};

const INDEX_HTML: &str = include_str!("../public/index.html");

/// Shared state for API handlers.
#[derive(Clone)]
pub struct ApiState {
    channel: Arc<dyn Channel>,
    uptime: Instant,
    bot_name: String,
}

impl ApiState {
    pub fn new(channel: Arc<dyn Channel>, uptime: Instant, bot_name: String) -> Self {
        Self {
            channel,
            uptime,
            bot_name,
        }
    }
}

/// `GET /`: Static landing page.
async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

/// `GET /health`: Liveness with uptime and connection state.
async fn health(State(state): State<ApiState>) -> Json<Value> {
    let connection = if state.channel.is_connected().await {
        "connected"
    } else {
        "disconnected"
    };

    Json(json!({
        "status": "OK",
        "message": format!("{} is running", state.bot_name),
        "timestamp": Utc::now().to_rfc3339(),
        "uptime": format_uptime(state.uptime.elapsed()),
        "whatsapp": connection,
    }))
}

/// `GET /qr`: Current pairing QR as base64 PNG, or where to find it.
async fn qr(State(state): State<ApiState>) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    let Some(code) = state.channel.pending_qr().await else {
        let status = if state.channel.is_connected().await {
            "paired"
        } else {
            "waiting"
        };
        return Ok(Json(json!({
            "status": status,
            "message": "Check the logs for the QR code",
            "instruction": "Follow the server logs (e.g. `heroku logs --tail --app YOUR_APP_NAME`) and scan the QR code with WhatsApp > Linked devices",
        })));
    };

    let png_bytes = whatsapp::generate_qr_image(&code).map_err(|e| {
        error!("QR image generation failed: {e}");
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({"error": format!("QR generation failed: {e}")})),
        )
    })?;

    Ok(Json(json!({
        "status": "qr_ready",
        "qr_png_base64": BASE64.encode(&png_bytes),
    })))
}

fn build_router(state: ApiState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/health", get(health))
        .route("/qr", get(qr))
        .layer(axum::extract::DefaultBodyLimit::max(1024 * 1024)) // 1 MB max request body
        .with_state(state)
}

/// Bind and serve until the task is aborted. Bind errors are logged, not fatal.
pub async fn serve(config: ApiConfig, state: ApiState) {
    let app = build_router(state);
    let addr = format!("{}:{}", config.host, config.port);

    let listener = match tokio::net::TcpListener::bind(&addr).await {
        Ok(l) => l,
        Err(e) => {
            error!("HTTP server failed to bind to {addr}: {e}");
            return;
        }
    };

    info!("🌐 Server running on {addr}");

    if let Err(e) = axum::serve(listener, app).await {
        error!("HTTP server error: {e}");
    }
}
