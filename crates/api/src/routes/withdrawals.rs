//! Withdrawal request route.

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
use kivela_core::WithdrawalInput;
use kivela_shared::types::Money;

/// Creates the withdrawal routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/withdrawals", post(create_withdrawal))
}

/// Request body for a withdrawal request.
#[derive(Debug, Deserialize)]
pub struct WithdrawalRequest {
    /// Amount to pay out, as a decimal string. The fee comes on top.
    pub amount: String,
    /// Beneficiary full name.
    pub beneficiary_name: String,
    /// Beneficiary bank identifier.
    pub iban: String,
}

/// POST `/withdrawals` - Request a payout to an external bank account.
///
/// The amount plus fee leaves the balance immediately; the payout itself
/// is processed later by the banking collaborator.
async fn create_withdrawal(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(payload): Json<WithdrawalRequest>,
) -> Response {
    let Ok(amount) = payload.amount.parse::<Money>() else {
        return invalid_argument("amount must be a decimal number");
    };

    let input = WithdrawalInput {
        user_id: auth.account_id(),
        amount,
        beneficiary_name: payload.beneficiary_name,
        iban: payload.iban,
    };

    match state.engine.request_withdrawal(input).await {
        Ok(receipt) => (
            StatusCode::OK,
            Json(json!({
                "success": true,
                "message": "Withdrawal request submitted successfully",
                "receipt": receipt
            })),
        )
            .into_response(),
        Err(err) => engine_error_response("withdrawal", err),
    }
}
