//! # HTTP Server
//!
//! Exposes the boundary API over HTTP. Every endpoint answers 200 with JSON;
//! print and test endpoints always return `{success, message}`.
//!
//! | Method | Path | Body | Response |
//! |--------|------|------|----------|
//! | GET | `/api/devices` | | `[DeviceInfo]` |
//! | GET | `/api/profiles` | | `[ProfileInfo]` |
//! | POST | `/api/printer/test` | `PrinterConfigRequest` | `PrintResult` |
//! | POST | `/api/receipt/print` | `PrintRequest` | `PrintResult` |
//!
//! ## Usage
//!
//! ```bash
//! tillprint serve --listen 0.0.0.0:8080
//! ```

mod handlers;
mod state;

pub use state::ServerConfig;

use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{get, post},
};
use std::sync::Arc;
use std::time::Duration;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::api::PrintService;
use state::AppState;

/// Request bodies carry base64 logos.
const BODY_LIMIT: usize = 10 * 1024 * 1024;

/// Build the router around a service.
pub fn router(service: PrintService) -> Router {
    Router::new()
        .route("/api/devices", get(handlers::devices::list))
        .route("/api/profiles", get(handlers::profiles::list))
        .route("/api/printer/test", post(handlers::printer::test))
        .route("/api/receipt/print", post(handlers::receipt::print))
        .layer(DefaultBodyLimit::max(BODY_LIMIT))
        .layer(TraceLayer::new_for_http())
        .with_state(Arc::new(AppState::new(service)))
}

/// Start the HTTP server over the host's devices.
///
/// ## Example
///
/// ```no_run
/// use tillprint::server::{serve, ServerConfig};
///
/// # async fn example() -> std::io::Result<()> {
/// let config = ServerConfig {
///     listen_addr: "0.0.0.0:8080".to_string(),
///     default_timeout_ms: 3000,
/// };
///
/// serve(config).await?;
/// # Ok(())
/// # }
/// ```
pub async fn serve(config: ServerConfig) -> std::io::Result<()> {
    let service = PrintService::system()
        .with_default_timeout(Duration::from_millis(config.default_timeout_ms));
    let app = router(service);

    let listener = tokio::net::TcpListener::bind(&config.listen_addr).await?;
    info!(
        listen = %config.listen_addr,
        default_timeout_ms = config.default_timeout_ms,
        "tillprint HTTP server listening"
    );

    axum::serve(listener, app).await
}
