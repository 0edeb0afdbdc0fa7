//! Server state and configuration.

use crate::api::PrintService;
use crate::job::DEFAULT_TIMEOUT_MS;

/// Server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address to listen on (e.g., "0.0.0.0:8080")
    pub listen_addr: String,
    /// Connect timeout for requests without `timeoutMs`
    pub default_timeout_ms: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_addr: "127.0.0.1:8080".to_string(),
            default_timeout_ms: DEFAULT_TIMEOUT_MS,
        }
    }
}

/// Application state shared across handlers.
pub struct AppState {
    pub service: PrintService,
}

impl AppState {
    pub fn new(service: PrintService) -> Self {
        Self { service }
    }
}
