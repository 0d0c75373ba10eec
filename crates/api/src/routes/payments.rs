//! Point-of-sale payment route.

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
};
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

use crate::middleware::AuthUser;
use crate::routes::{engine_error_response, invalid_argument};
use crate::AppState;
use kivela_core::PaymentInput;
use kivela_shared::types::{AccountId, Money};

/// Creates the payment routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/payments", post(create_payment))
}

/// Request body for a payment, typically scanned from a merchant QR code.
#[derive(Debug, Deserialize)]
pub struct PaymentRequest {
    /// The merchant account being paid.
    pub recipient_id: Uuid,
    /// Amount as a decimal string.
    pub amount: String,
}

/// POST `/payments` - Pay a merchant.
async fn create_payment(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(payload): Json<PaymentRequest>,
) -> Response {
    let Ok(amount) = payload.amount.parse::<Money>() else {
        return invalid_argument("amount must be a decimal number");
    };

    let input = PaymentInput {
        payer_id: auth.account_id(),
        merchant_id: AccountId::from_uuid(payload.recipient_id),
        amount,
    };

    match state.engine.pay(input).await {
        Ok(receipt) => (
            StatusCode::OK,
            Json(json!({
                "success": true,
                "message": "Payment processed successfully",
                "receipt": receipt
            })),
        )
            .into_response(),
        Err(err) => engine_error_response("payment", err),
    }
}
