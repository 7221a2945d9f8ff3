//! Route definitions for payment gateway callbacks.
//!
//! Unlike the rest of the API this is not JWT-authenticated: the gateway
//! proves itself with an HMAC signature over the request body.

use axum::routing::post;
use axum::Router;

use crate::handlers::payments;
use crate::state::AppState;

/// Routes mounted at `/payments`.
///
/// ```text
/// POST   /callback   -> payment_callback
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/callback", post(payments::payment_callback))
}
