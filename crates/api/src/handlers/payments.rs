//! Handler for payment gateway callbacks.
//!
//! The gateway confirms or fails monetary donations by POSTing a signed
//! JSON payload. Authentication is an HMAC-SHA256 signature over the raw
//! request body, not a bearer token, so the handler takes `Bytes` and
//! parses after verifying.

use axum::body::Bytes;
use axum::extract::State;
use axum::http::HeaderMap;
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;

use fundra_core::donation::{validate_transition, DonationStatus, TransitionOutcome};
use fundra_core::error::CoreError;
use fundra_core::signing::verify_callback_signature;
use fundra_core::types::DbId;
use fundra_db::repositories::DonationRepo;

use crate::error::{AppError, AppResult};
use crate::handlers::donations::{apply_transition, DonationResponse};
use crate::handlers::donation_status;
use crate::response::DataResponse;
use crate::state::AppState;

/// Header carrying the hex HMAC-SHA256 signature of the request body.
pub const SIGNATURE_HEADER: &str = "x-payment-signature";

/// Callback payload sent by the payment gateway.
#[derive(Debug, Deserialize)]
pub struct PaymentCallback {
    pub donation_id: DbId,
    /// Gateway outcome: `succeeded` or `failed`.
    pub status: String,
    /// Gateway transaction id; required for `succeeded`.
    pub transaction_id: Option<String>,
}

/// POST /api/v1/payments/callback
///
/// Settle a monetary donation from a gateway notification. Deliveries are
/// at-least-once: a repeat of an already-applied outcome returns 200 with
/// the unchanged donation, a conflicting outcome is a 409.
pub async fn payment_callback(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> AppResult<impl IntoResponse> {
    let signature = headers
        .get(SIGNATURE_HEADER)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| {
            AppError::Core(CoreError::Unauthorized(
                "Missing X-Payment-Signature header".into(),
            ))
        })?;

    if !verify_callback_signature(&state.config.payment_webhook_secret, &body, signature) {
        tracing::warn!("Payment callback rejected: signature mismatch");
        return Err(AppError::Core(CoreError::Unauthorized(
            "Invalid payment callback signature".into(),
        )));
    }

    let input: PaymentCallback = serde_json::from_slice(&body).map_err(|e| {
        AppError::Core(CoreError::Validation(format!(
            "invalid callback payload: {e}"
        )))
    })?;

    let next = match input.status.as_str() {
        "succeeded" => DonationStatus::Completed,
        "failed" => DonationStatus::Failed,
        other => {
            return Err(AppError::Core(CoreError::Validation(format!(
                "unknown payment status: {other}"
            ))));
        }
    };
    if next == DonationStatus::Completed && input.transaction_id.is_none() {
        return Err(AppError::Core(CoreError::Validation(
            "transaction_id is required for succeeded callbacks".into(),
        )));
    }

    let donation = DonationRepo::find_by_id(&state.pool, input.donation_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Donation",
            id: input.donation_id,
        }))?;

    let current = donation_status(&donation)?;
    let updated = match validate_transition(current, next)? {
        TransitionOutcome::AlreadyApplied => {
            tracing::debug!(
                donation_id = donation.id,
                status = next.as_str(),
                "Payment callback repeated; already applied",
            );
            donation
        }
        TransitionOutcome::Apply => {
            apply_transition(
                &state,
                &donation,
                current,
                next,
                input.transaction_id.as_deref(),
            )
            .await?
        }
    };

    Ok(Json(DataResponse {
        data: DonationResponse::from_row(updated)?,
    }))
}
