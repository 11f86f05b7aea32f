use crate::structs::NetworkCredentials;
use crate::traits::WifiControl;
use crate::Error;
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

// The shared state for our web server.
// By using `Arc<dyn Trait>`, we can inject any implementation
// that satisfies the trait bounds.
pub type WebServerState = State<Arc<AppState>>;

pub struct AppState {
    pub backend: Arc<dyn WifiControl>,
}

/// Builds the router without binding a socket.
pub fn router(backend: Arc<dyn WifiControl>) -> Router {
    let app_state = Arc::new(AppState { backend });

    Router::new()
        .route("/status", get(api_status))
        .route("/scan", get(api_scan))
        .route("/networks", get(api_networks))
        .route("/ap/status", get(api_ap_status))
        .route("/connect", post(api_connect))
        .route("/connect/cancel", post(api_cancel_connect))
        .layer(TraceLayer::new_for_http())
        .with_state(app_state)
}

/// Serves the API on `addr` until `shutdown` resolves.
pub async fn run_server<F>(
    backend: Arc<dyn WifiControl>,
    addr: SocketAddr,
    shutdown: F,
) -> crate::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let app = router(backend);
    let listener = TcpListener::bind(addr).await?;
    tracing::info!("🌐 Web server listening on {}", addr);

    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(shutdown)
        .await?;
    Ok(())
}

// --- Route Handlers ---

fn error_response(e: Error) -> Response {
    let status = match e {
        Error::InvalidCredentials(_) => StatusCode::BAD_REQUEST,
        Error::Cancelled => StatusCode::CONFLICT,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };
    tracing::error!(error = %e, "request failed");
    (status, Json(serde_json::json!({ "error": e.to_string() }))).into_response()
}

/// wpa_supplicant 状态
async fn api_status(State(state): WebServerState) -> Response {
    match state.backend.status().await {
        Ok(status) => (StatusCode::OK, Json(status)).into_response(),
        Err(e) => error_response(e),
    }
}

/// API endpoint to scan for Wi-Fi networks.
async fn api_scan(State(state): WebServerState) -> Response {
    match state.backend.scan_networks().await {
        Ok(networks) => (StatusCode::OK, Json(networks)).into_response(),
        Err(e) => error_response(e),
    }
}

async fn api_networks(State(state): WebServerState) -> Response {
    match state.backend.configured_networks().await {
        Ok(networks) => (StatusCode::OK, Json(networks)).into_response(),
        Err(e) => error_response(e),
    }
}

async fn api_ap_status(State(state): WebServerState) -> Response {
    match state.backend.ap_status().await {
        Ok(status) => (StatusCode::OK, Json(status)).into_response(),
        Err(e) => error_response(e),
    }
}

/// API endpoint to connect to a Wi-Fi network.
/// A `FAIL` result is still a 200: the daemon was reachable, the network
/// just did not associate.
async fn api_connect(
    State(state): WebServerState,
    Json(payload): Json<NetworkCredentials>,
) -> Response {
    tracing::debug!(ssid = %payload.ssid, "Handling /connect request");
    match state.backend.connect_network(&payload).await {
        Ok(result) => (StatusCode::OK, Json(result)).into_response(),
        Err(e) => error_response(e),
    }
}

async fn api_cancel_connect(State(state): WebServerState) -> impl IntoResponse {
    let cancelled = state.backend.cancel_connect();
    (StatusCode::OK, Json(serde_json::json!({ "cancelled": cancelled })))
}
