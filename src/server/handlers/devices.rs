//! Device listing handler.

use axum::{Json, extract::State};
use std::sync::Arc;

use crate::api::DeviceInfo;

use super::super::state::AppState;

/// GET /api/devices - List reachable printers.
pub async fn list(State(state): State<Arc<AppState>>) -> Json<Vec<DeviceInfo>> {
    Json(state.service.list_devices().await)
}
