//! HTTP handlers for the server.

pub mod devices;
pub mod printer;
pub mod profiles;
pub mod receipt;

use axum::Json;
use axum::extract::rejection::JsonRejection;

use crate::error::PrintError;
use crate::job::PrintResult;

/// Malformed request bodies still answer with `{success, message}`.
pub(crate) fn rejected(rejection: JsonRejection) -> Json<PrintResult> {
    Json(PrintError::encoding(rejection.body_text()).into())
}
