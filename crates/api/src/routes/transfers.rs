//! Peer-to-peer transfer route.

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
use kivela_core::TransferInput;
use kivela_shared::types::{AccountId, Money};

/// Creates the transfer routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/transfers", post(create_transfer))
}

/// Request body for a transfer.
#[derive(Debug, Deserialize)]
pub struct TransferRequest {
    /// The receiving account.
    pub recipient_id: Uuid,
    /// Amount as a decimal string, to avoid float precision issues in JSON.
    pub amount: String,
    /// Optional free-text note.
    pub note: Option<String>,
}

/// POST `/transfers` - Move money to another account.
async fn create_transfer(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(payload): Json<TransferRequest>,
) -> Response {
    let Ok(amount) = payload.amount.parse::<Money>() else {
        return invalid_argument("amount must be a decimal number");
    };

    let input = TransferInput {
        sender_id: auth.account_id(),
        recipient_id: AccountId::from_uuid(payload.recipient_id),
        amount,
        note: payload.note,
    };

    match state.engine.transfer(input).await {
        Ok(receipt) => (
            StatusCode::OK,
            Json(json!({
                "success": true,
                "message": "Transfer completed successfully",
                "receipt": receipt
            })),
        )
            .into_response(),
        Err(err) => engine_error_response("transfer", err),
    }
}
