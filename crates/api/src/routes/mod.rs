//! API route definitions.

use axum::{
    Json, Router,
    http::StatusCode,
    middleware,
    response::{IntoResponse, Response},
};
use serde_json::json;
use tracing::error;

use crate::{AppState, middleware::auth::auth_middleware};
use kivela_core::EngineError;
use kivela_shared::AppError;

pub mod credits;
pub mod health;
pub mod payments;
pub mod transfers;
pub mod withdrawals;

/// Creates the API router with protected routes that need state for middleware.
#[allow(clippy::needless_pass_by_value)]
pub fn api_routes_with_state(state: AppState) -> Router<AppState> {
    // All ledger operations require an authenticated caller
    let protected_routes = Router::new()
        .merge(transfers::routes())
        .merge(payments::routes())
        .merge(withdrawals::routes())
        .merge(credits::routes())
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    Router::new()
        .merge(health::routes())
        .merge(protected_routes)
}

/// Maps an engine error onto an HTTP response.
///
/// Business failures keep their kind and message; unexpected faults are
/// logged with context and collapsed to a generic internal error.
pub(crate) fn engine_error_response(operation: &'static str, err: EngineError) -> Response {
    if matches!(
        err,
        EngineError::Store(_) | EngineError::TreasuryMisconfigured | EngineError::Overflow
    ) {
        error!(operation, error = %err, "ledger operation failed unexpectedly");
    }

    let app_error: AppError = err.into();
    let status = StatusCode::from_u16(app_error.status_code())
        .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    let message = match &app_error {
        AppError::Internal(_) => "An internal error occurred".to_string(),
        other => other.to_string(),
    };

    (
        status,
        Json(json!({ "error": app_error.error_code(), "message": message })),
    )
        .into_response()
}

/// Rejects a request before it reaches the engine.
pub(crate) fn invalid_argument(message: &str) -> Response {
    (
        StatusCode::BAD_REQUEST,
        Json(json!({ "error": "INVALID_ARGUMENT", "message": message })),
    )
        .into_response()
}
