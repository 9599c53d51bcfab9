//! HTTP front for the bridge.
//!
//! `GET /` takes the raw query string, forwards it upstream and answers with the mapped
//! envelope. The status is always 200; the envelope `code` carries the outcome.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use axum::extract::{RawQuery, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{info, info_span, warn, Instrument};
use uuid::Uuid;

use crate::config::Config;
use crate::gateway::ACTION_PARAM;
use crate::types::Envelope;
use crate::Bridge;

/// Shared state for the web server.
#[derive(Clone)]
pub struct AppState {
    pub bridge: Arc<Bridge>,
    pub pretty: bool,
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(bridge_query))
        .route("/health", get(health))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn bridge_query(State(state): State<AppState>, RawQuery(raw): RawQuery) -> Response {
    let query: Vec<(String, String)> = raw
        .as_deref()
        .map(|q| url::form_urlencoded::parse(q.as_bytes()).into_owned().collect())
        .unwrap_or_default();
    let ac = query
        .iter()
        .find(|(k, _)| k == ACTION_PARAM)
        .map(|(_, v)| v.clone())
        .unwrap_or_default();
    let span = info_span!("request", request_id = %Uuid::new_v4(), ac = %ac);
    let envelope = state.bridge.handle(query).instrument(span).await;
    json_response(&envelope, state.pretty)
}

pub async fn health() -> impl IntoResponse {
    StatusCode::OK
}

fn json_response(envelope: &Envelope, pretty: bool) -> Response {
    let body = if pretty {
        serde_json::to_string_pretty(envelope)
    } else {
        serde_json::to_string(envelope)
    };
    match body {
        Ok(body) => ([(header::CONTENT_TYPE, "application/json")], body).into_response(),
        Err(e) => {
            warn!(error = %e, "serializing envelope");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

/// Start the web server and run until Ctrl-C.
pub async fn serve(config: &Config) -> anyhow::Result<()> {
    let bridge = Bridge::new(config)?;
    let app = create_router(AppState { bridge: Arc::new(bridge), pretty: config.pretty });

    let addr: SocketAddr = format!("{}:{}", config.host, config.port)
        .parse()
        .with_context(|| format!("invalid listen address {}:{}", config.host, config.port))?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("binding {}", addr))?;
    info!("Starting server at http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "failed to listen for ctrl-c");
    }
}
