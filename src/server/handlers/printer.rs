//! Connection test handler.

use axum::{Json, extract::State, extract::rejection::JsonRejection};
use std::sync::Arc;

use crate::api::PrinterConfigRequest;
use crate::job::PrintResult;

use super::super::state::AppState;
use super::rejected;

/// POST /api/printer/test - Open the printer and print a test page.
pub async fn test(
    State(state): State<Arc<AppState>>,
    body: Result<Json<PrinterConfigRequest>, JsonRejection>,
) -> Json<PrintResult> {
    match body {
        Ok(Json(config)) => Json(state.service.test_connection(&config).await),
        Err(rejection) => rejected(rejection),
    }
}
