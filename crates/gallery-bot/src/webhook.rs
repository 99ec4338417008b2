//! HTTP endpoint Telegram delivers updates to.

use crate::dispatcher::Dispatcher;
use crate::error::AppError;
use axum::{
    body::Bytes,
    extract::{Request, State},
    http::{HeaderMap, StatusCode},
    middleware::{self as axum_middleware, Next},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use sha2::{Digest, Sha256};
use std::collections::HashSet;
use std::sync::Arc;
use telegram_client::{ChatId, SendOptions, TelegramClient, Update};
use tower_http::trace::TraceLayer;
use tracing::{debug, error, info, warn};

pub const SECRET_HEADER: &str = "X-Telegram-Bot-Api-Secret-Token";

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub dispatcher: Arc<Dispatcher>,
    pub telegram: Arc<TelegramClient>,
    /// Chats updates are accepted from; empty accepts every chat
    pub allowed_chats: Arc<HashSet<ChatId>>,
    pub webhook_url: Option<String>,
    webhook_secret: Option<String>,
    secret_digest: Option<String>,
}

impl AppState {
    pub fn new(
        dispatcher: Arc<Dispatcher>,
        telegram: Arc<TelegramClient>,
        allowed_chats: impl IntoIterator<Item = ChatId>,
        webhook_url: Option<String>,
        webhook_secret: Option<String>,
    ) -> Self {
        Self {
            dispatcher,
            telegram,
            allowed_chats: Arc::new(allowed_chats.into_iter().collect()),
            webhook_url,
            secret_digest: webhook_secret.as_deref().map(hash_secret),
            webhook_secret,
        }
    }

    pub fn is_allowed(&self, update: &Update) -> bool {
        if self.allowed_chats.is_empty() {
            return true;
        }
        update
            .chat_id()
            .is_some_and(|id| self.allowed_chats.contains(&id))
    }

    /// Compare digests rather than the raw strings.
    fn secret_matches(&self, headers: &HeaderMap) -> bool {
        let Some(expected) = &self.secret_digest else {
            return true;
        };
        headers
            .get(SECRET_HEADER)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|provided| hash_secret(provided) == *expected)
    }
}

fn hash_secret(secret: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(secret.as_bytes());
    hex::encode(hasher.finalize())
}

/// Create the webhook router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/activate", get(activate))
        .route("/webhook", post(webhook))
        .layer(axum_middleware::from_fn(logging_middleware))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn index() -> &'static str {
    "The bot is running!"
}

/// Register the configured URL with Telegram.
async fn activate(State(state): State<AppState>) -> Response {
    let Some(url) = state.webhook_url.as_deref() else {
        return activation_failed("TELEGRAM__WEBHOOK_URL is not configured".into());
    };

    match state
        .telegram
        .set_webhook(url, state.webhook_secret.as_deref())
        .await
    {
        Ok(()) => {
            info!("Webhook registered at {}", url);
            "Webhook activated".into_response()
        }
        Err(e) => {
            error!("Failed to register webhook: {}", e);
            activation_failed(e.to_string())
        }
    }
}

fn activation_failed(message: String) -> Response {
    (
        StatusCode::BAD_REQUEST,
        Json(serde_json::json!({ "message": message })),
    )
        .into_response()
}

async fn webhook(State(state): State<AppState>, headers: HeaderMap, body: Bytes) -> StatusCode {
    if !state.secret_matches(&headers) {
        warn!("Rejected webhook delivery with bad secret");
        return StatusCode::UNAUTHORIZED;
    }

    // Telegram retries non-2xx deliveries, so unreadable bodies are dropped
    let update: Update = match serde_json::from_slice(&body) {
        Ok(update) => update,
        Err(e) => {
            warn!("Ignoring unparseable update: {}", e);
            return StatusCode::OK;
        }
    };

    process_update(&state, &update).await;
    StatusCode::OK
}

/// Dispatch one update, reporting any failure to its chat.
///
/// Never fails; shared by the webhook and polling modes.
pub async fn process_update(state: &AppState, update: &Update) {
    if !state.is_allowed(update) {
        debug!("Ignoring update {} from chat {:?}", update.update_id, update.chat_id());
        return;
    }

    match state.dispatcher.handle_update(update).await {
        Ok(outcome) => debug!("Update {} handled: {:?}", update.update_id, outcome),
        Err(e) => report_failure(state, update, &e).await,
    }
}

async fn report_failure(state: &AppState, update: &Update, err: &AppError) {
    error!("Update {} failed: {}", update.update_id, err);

    let Some(chat_id) = update.chat_id() else {
        return;
    };
    if let Err(e) = state
        .telegram
        .send_message(chat_id, &err.chat_message(), &SendOptions::default())
        .await
    {
        error!("Failed to report error to chat {}: {}", chat_id, e);
    }
}

/// Logging middleware for requests.
async fn logging_middleware(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let uri = request.uri().path().to_string();
    let start = std::time::Instant::now();

    let response = next.run(request).await;

    let duration = start.elapsed();
    let status = response.status();

    if status.is_success() {
        debug!(%method, %uri, %status, ?duration, "Request completed");
    } else {
        warn!(%method, %uri, %status, ?duration, "Request failed");
    }

    response
}
