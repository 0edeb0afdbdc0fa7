//! Profile API handlers.

use axum::{Json, extract::State};
use std::sync::Arc;

use crate::api::ProfileInfo;

use super::super::state::AppState;

/// GET /api/profiles - List supported printer profiles.
pub async fn list(State(state): State<Arc<AppState>>) -> Json<Vec<ProfileInfo>> {
    Json(state.service.profiles())
}
