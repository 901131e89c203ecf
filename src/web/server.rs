//! Axum web server for the playback viewer.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    http::{header, Method},
    response::{Html, IntoResponse},
    routing::get,
    Json, Router,
};
use serde::Serialize;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::session::SessionRecorder;
use crate::web::protocol::{ViewerRequest, ViewerResponse};

/// Static viewer template bundled with the binary.
const VIEWER_HTML: &str = include_str!("../../assets/viewer.html");

/// Server configuration options.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Host address to bind to.
    pub host: String,
    /// Port to listen on.
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3000,
        }
    }
}

/// Shared state for viewer handlers.
#[derive(Clone)]
pub struct ViewerState {
    recorder: Arc<SessionRecorder>,
}

impl ViewerState {
    pub fn new(recorder: Arc<SessionRecorder>) -> Self {
        Self { recorder }
    }

    fn update_payload(&self) -> ViewerResponse {
        ViewerResponse::update_from(&self.recorder.timeline())
    }
}

/// Health check response.
#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

/// Health check endpoint handler.
async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// Serve the static viewer page.
async fn serve_viewer() -> Html<&'static str> {
    Html(VIEWER_HTML)
}

/// Plain JSON variant of the update payload.
async fn get_changes(State(state): State<ViewerState>) -> Json<ViewerResponse> {
    Json(state.update_payload())
}

/// WebSocket upgrade handler.
async fn ws_handler(ws: WebSocketUpgrade, State(state): State<ViewerState>) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

/// Answer `getChanges` requests until the viewer disconnects.
async fn handle_socket(mut socket: WebSocket, state: ViewerState) {
    while let Some(Ok(message)) = socket.recv().await {
        let Message::Text(text) = message else {
            continue;
        };

        let request: ViewerRequest = match serde_json::from_str(text.as_str()) {
            Ok(request) => request,
            Err(err) => {
                tracing::debug!(error = %err, "Ignoring malformed viewer message");
                continue;
            }
        };

        match request {
            ViewerRequest::GetChanges => {
                let payload = state.update_payload();
                let json = match serde_json::to_string(&payload) {
                    Ok(json) => json,
                    Err(err) => {
                        tracing::error!(error = %err, "Failed to serialize update payload");
                        continue;
                    }
                };
                if socket.send(Message::Text(json.into())).await.is_err() {
                    break;
                }
            }
        }
    }
}

/// Build the Axum router with all routes.
pub fn build_router(state: ViewerState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET])
        .allow_headers([header::CONTENT_TYPE]);

    Router::new()
        .route("/", get(serve_viewer))
        .route("/health", get(health))
        .route("/api/changes", get(get_changes))
        .route("/ws", get(ws_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Run the viewer server until the process exits.
pub async fn serve(config: ServerConfig, state: ViewerState) -> anyhow::Result<()> {
    let addr: SocketAddr = format!("{}:{}", config.host, config.port).parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, "Viewer server listening");
    axum::serve(listener, build_router(state)).await?;
    Ok(())
}
