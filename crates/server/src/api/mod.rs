pub mod health;
pub mod schemas;
pub mod submit;
pub mod trace_context;

use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::http::{HeaderValue, Method};
use axum::middleware;
use axum::routing::{any, get};
use formrelay_core::{Credentials, FormLimits, SecretSource};
use formrelay_telegram::{TelegramClient, TelegramConfig};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::warn;

use crate::config::{CorsConfig, FormRelayConfig, TelegramServerConfig};

/// Shared application state available to all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Where `BOT_TOKEN` and `CHAT_ID` are read from on every request.
    pub secrets: Arc<dyn SecretSource>,
    /// Pooled HTTP client reused for every Telegram call.
    pub http: reqwest::Client,
    /// Bot API base URL.
    pub telegram_api_base_url: String,
    /// Base deadline for every Telegram call.
    pub telegram_timeout: Duration,
    /// Upload throughput floor used to stretch `sendDocument` deadlines.
    pub telegram_min_upload_rate: u64,
    /// Multipart decoding limits.
    pub limits: FormLimits,
}

impl AppState {
    /// Build state from the loaded configuration.
    pub fn new(
        secrets: Arc<dyn SecretSource>,
        http: reqwest::Client,
        telegram: &TelegramServerConfig,
        limits: FormLimits,
    ) -> Self {
        Self {
            secrets,
            http,
            telegram_api_base_url: telegram.api_base_url.clone(),
            telegram_timeout: Duration::from_secs(telegram.timeout_seconds),
            telegram_min_upload_rate: telegram.min_upload_bytes_per_sec,
            limits,
        }
    }

    /// A Telegram client for one request's credentials.
    pub fn telegram_client(&self, credentials: &Credentials) -> TelegramClient {
        let config = TelegramConfig::new(credentials.token(), credentials.chat_id.clone())
            .with_api_base_url(self.telegram_api_base_url.as_str())
            .with_timeout(self.telegram_timeout)
            .with_min_upload_rate(self.telegram_min_upload_rate);
        TelegramClient::with_client(config, self.http.clone())
    }
}

/// Build the application router.
///
/// The submit route accepts every method so the handler can answer
/// non-`POST` requests with its own JSON body.
pub fn router(state: AppState, config: &FormRelayConfig) -> Router {
    let body_limit = state.limits.max_body_bytes();

    let app = Router::new()
        .route(&config.server.submit_path, any(submit::submit))
        .route("/health", get(health::health))
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(state)
        .layer(middleware::from_fn(trace_context::propagate_trace_context))
        .layer(TraceLayer::new_for_http());

    match cors_layer(&config.cors) {
        Some(cors) => app.layer(cors),
        None => app,
    }
}

fn cors_layer(config: &CorsConfig) -> Option<CorsLayer> {
    if config.allowed_origins.is_empty() {
        return None;
    }

    let origin = if config.allowed_origins.iter().any(|o| o == "*") {
        AllowOrigin::any()
    } else {
        let origins: Vec<HeaderValue> = config
            .allowed_origins
            .iter()
            .filter_map(|o| match HeaderValue::from_str(o) {
                Ok(v) => Some(v),
                Err(_) => {
                    warn!(origin = %o, "ignoring invalid CORS origin");
                    None
                }
            })
            .collect();
        AllowOrigin::list(origins)
    };

    Some(
        CorsLayer::new()
            .allow_origin(origin)
            .allow_methods([Method::POST, Method::OPTIONS])
            .allow_headers(Any),
    )
}
