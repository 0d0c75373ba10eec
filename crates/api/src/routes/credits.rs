//! Credit application route.

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
};
use serde::Deserialize;
use serde_json::json;

use crate::middleware::AuthUser;
use crate::routes::{engine_error_response, invalid_argument};
use crate::AppState;
use kivela_core::CreditRequestInput;
use kivela_shared::types::Money;

/// Creates the credit application routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/credit-requests", post(create_credit_request))
}

/// Request body for a credit application.
#[derive(Debug, Deserialize)]
pub struct CreditRequest {
    /// Amount of credit applied for, as a decimal string.
    pub amount: String,
    /// Stated reason for the application.
    pub reason: String,
}

/// POST `/credit-requests` - Apply for credit.
///
/// Charges the flat application fee; the application itself is reviewed by
/// the credit collaborator.
async fn create_credit_request(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(payload): Json<CreditRequest>,
) -> Response {
    let Ok(amount) = payload.amount.parse::<Money>() else {
        return invalid_argument("amount must be a decimal number");
    };

    let input = CreditRequestInput {
        user_id: auth.account_id(),
        amount,
        reason: payload.reason,
    };

    match state.engine.request_credit(input).await {
        Ok(receipt) => (
            StatusCode::OK,
            Json(json!({
                "success": true,
                "message": "Credit application submitted successfully",
                "receipt": receipt
            })),
        )
            .into_response(),
        Err(err) => engine_error_response("credit_request", err),
    }
}
