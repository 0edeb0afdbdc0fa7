//! Receipt printing handler.

use axum::{Json, extract::State, extract::rejection::JsonRejection};
use std::sync::Arc;

use crate::api::PrintRequest;
use crate::job::PrintResult;

use super::super::state::AppState;
use super::rejected;

/// POST /api/receipt/print - Compose and print a receipt.
pub async fn print(
    State(state): State<Arc<AppState>>,
    body: Result<Json<PrintRequest>, JsonRejection>,
) -> Json<PrintResult> {
    match body {
        Ok(Json(request)) => Json(state.service.print_receipt(&request).await),
        Err(rejection) => rejected(rejection),
    }
}
