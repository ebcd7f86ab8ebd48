//! Shopify webhook signature verification.
//!
//! Shopify signs the raw request body with HMAC-SHA256 using the app's shared
//! secret and sends the base64-encoded digest in `X-Shopify-Hmac-Sha256`.
//! Verification runs on the exact bytes received, before any parsing.

use axum::http::HeaderValue;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use hmac::{Hmac, Mac};
use sha2::Sha256;
use subtle::ConstantTimeEq;

pub const SIGNATURE_HEADER: &str = "x-shopify-hmac-sha256";

type HmacSha256 = Hmac<Sha256>;

/// Raw HMAC-SHA256 digest of `body` under `secret`.
fn digest(body: &[u8], secret: &[u8]) -> Option<Vec<u8>> {
    let mut mac = HmacSha256::new_from_slice(secret).ok()?;
    mac.update(body);
    Some(mac.finalize().into_bytes().to_vec())
}

/// Base64 signature as Shopify would send it. Used to sign test payloads.
#[must_use]
pub fn compute_signature(body: &[u8], secret: &[u8]) -> String {
    digest(body, secret)
        .map(|d| STANDARD.encode(d))
        .unwrap_or_default()
}

/// Checks `header` against the body's digest in constant time.
///
/// Fails closed: a missing header, a non-ASCII or non-base64 value, or a
/// digest of the wrong length all return `false`.
#[must_use]
pub fn verify_signature(body: &[u8], header: Option<&HeaderValue>, secret: &[u8]) -> bool {
    let Some(provided) = header
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .and_then(|v| STANDARD.decode(v).ok())
    else {
        return false;
    };

    let Some(expected) = digest(body, secret) else {
        return false;
    };

    expected.ct_eq(&provided).into()
}
