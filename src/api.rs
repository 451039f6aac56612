//! HTTP interface
//!
//! Routes are served both at the root and under `/api/sip`.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::extract::State;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use crate::error::SipCheckResult;
use crate::result::ValidationResult;
use crate::validator::{Validator, MISSING_HEADER_TEXT, MISSING_MESSAGE_TEXT};

/// Body of `GET /health`
pub const HEALTH_MESSAGE: &str = "SIP Header Validator is running";

/// Prefix the routes are mounted under in addition to the root
pub const API_PREFIX: &str = "/api/sip";

/// JSON body accepted by both validation endpoints
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationRequest {
    pub message_text: Option<String>,
    pub header_text: Option<String>,
}

async fn validate_message(
    State(validator): State<Arc<Validator>>,
    Json(request): Json<ValidationRequest>,
) -> Json<ValidationResult> {
    let result = match request.message_text.as_deref() {
        Some(text) if !text.is_empty() => validator.validate_message(text),
        _ => ValidationResult::rejected(MISSING_MESSAGE_TEXT),
    };
    Json(result)
}

async fn validate_header(
    State(validator): State<Arc<Validator>>,
    Json(request): Json<ValidationRequest>,
) -> Json<ValidationResult> {
    let result = match request.header_text.as_deref() {
        Some(text) if !text.is_empty() => validator.validate_header(text),
        _ => ValidationResult::rejected(MISSING_HEADER_TEXT),
    };
    Json(result)
}

async fn health() -> &'static str {
    HEALTH_MESSAGE
}

/// Build the application router around a shared validator
pub fn router(validator: Arc<Validator>) -> Router {
    let routes = Router::new()
        .route("/validate/message", post(validate_message))
        .route("/validate/header", post(validate_header))
        .route("/health", get(health));

    Router::new()
        .merge(routes.clone())
        .nest(API_PREFIX, routes)
        .layer(TraceLayer::new_for_http())
        .with_state(validator)
}

/// Serve the API on `bind` until Ctrl-C
pub async fn serve(bind: SocketAddr, validator: Arc<Validator>) -> SipCheckResult<()> {
    let listener = TcpListener::bind(bind).await?;
    info!(address = %listener.local_addr()?, "sipcheck listening");

    axum::serve(listener, router(validator))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("shutdown requested"),
        Err(e) => {
            warn!(error = %e, "cannot listen for Ctrl-C, running until killed");
            std::future::pending::<()>().await;
        }
    }
}
