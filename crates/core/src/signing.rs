//! HMAC signing for the payment gateway callback.
//!
//! The gateway signs the raw JSON body of every callback delivery with a
//! shared secret; we recompute and compare before trusting the payload.

use hmac::{Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// Compute the HMAC-SHA256 signature of a callback payload.
///
/// Returns the lowercase hex-encoded signature string, the format the
/// gateway sends in the `X-Payment-Signature` header.
pub fn compute_callback_signature(secret: &str, payload: &[u8]) -> String {
    let mut mac =
        HmacSha256::new_from_slice(secret.as_bytes()).expect("HMAC accepts any key length");
    mac.update(payload);
    hex_encode(mac.finalize().into_bytes())
}

/// Verify a callback signature against the raw request body.
pub fn verify_callback_signature(secret: &str, payload: &[u8], signature: &str) -> bool {
    compute_callback_signature(secret, payload) == signature.to_ascii_lowercase()
}

/// Encode bytes as a lowercase hex string.
fn hex_encode(bytes: impl AsRef<[u8]>) -> String {
    bytes.as_ref().iter().map(|b| format!("{b:02x}")).collect()
}
