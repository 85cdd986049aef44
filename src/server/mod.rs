//! HTTPサーバ
//!
//! 画像識別とチャットプロキシをブラウザ向けに公開する。

mod error;
mod routes;

pub use error::{ApiError, ApiResult};
pub use routes::{ChatRequest, ChatResponse, HealthResponse, IdentifyRequest};

use crate::chat::ChatProxy;
use crate::error::{ReefIdError, Result};
use crate::identify::Identifier;
use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// リクエストボディの上限（Base64画像を含むため大きめ）
const MAX_BODY_BYTES: usize = 12 * 1024 * 1024;

/// ハンドラ間で共有する状態
#[derive(Clone)]
pub struct AppState {
    pub identifier: Arc<Identifier>,
    pub chat: Arc<ChatProxy>,
    pub startup_time: DateTime<Utc>,
}

impl AppState {
    pub fn new(identifier: Arc<Identifier>, chat: Arc<ChatProxy>) -> Self {
        Self {
            identifier,
            chat,
            startup_time: Utc::now(),
        }
    }
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/identify-fish", post(routes::identify_fish))
        .route("/chat", post(routes::chat))
        .route("/health", get(routes::health))
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// 指定アドレスで待ち受ける
pub async fn serve(state: AppState, bind_address: &str) -> Result<()> {
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(bind_address)
        .await
        .map_err(|e| ReefIdError::Server(format!("{} にバインドできません: {}", bind_address, e)))?;
    tracing::info!("Listening on http://{}", bind_address);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| ReefIdError::Server(e.to_string()))?;

    tracing::info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "failed to listen for shutdown signal");
    }
}
