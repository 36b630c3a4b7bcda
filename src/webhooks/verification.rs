//! Square webhook signature verification.
//!
//! Square signs each notification with HMAC-SHA256 keyed by the
//! subscription's signature key. The signed message is the notification URL
//! (exactly as registered) followed by the raw request body, and the
//! base64-encoded result is sent in the `x-square-hmacsha256-signature`
//! header.
//!
//! # Example
//!
//! ```rust
//! use square_giftcard::webhooks::{compute_signature, verify_signature};
//!
//! let url = "https://shop.example.com/webhooks/square";
//! let body = br#"{"type":"payment.updated","event_id":"1"}"#;
//! let signature = compute_signature(url, body, "sig-key");
//!
//! assert!(verify_signature(url, body, &signature, "sig-key"));
//! assert!(!verify_signature(url, body, &signature, "other-key"));
//! ```
//!
//! # Security
//!
//! Comparisons are constant time. Verify against the raw bytes before
//! parsing; re-serialized JSON will not match.

use base64::Engine as _;
use hmac::{Hmac, Mac};
use sha2::Sha256;
use subtle::ConstantTimeEq;

use crate::webhooks::{WebhookError, WebhookEvent};

type HmacSha256 = Hmac<Sha256>;

/// HTTP header carrying the signature. Header names are case-insensitive.
pub const HEADER_SIGNATURE: &str = "x-square-hmacsha256-signature";

/// An incoming notification as received by the route handler.
#[derive(Clone, Debug)]
pub struct WebhookRequest {
    body: Vec<u8>,
    signature: String,
    notification_url: String,
}

impl WebhookRequest {
    /// Creates a request from the raw body, the signature header value and
    /// the notification URL registered with Square.
    #[must_use]
    pub fn new(
        body: Vec<u8>,
        signature: impl Into<String>,
        notification_url: impl Into<String>,
    ) -> Self {
        Self {
            body,
            signature: signature.into(),
            notification_url: notification_url.into(),
        }
    }

    /// Returns the raw body.
    #[must_use]
    pub fn body(&self) -> &[u8] {
        &self.body
    }

    /// Returns the signature header value.
    #[must_use]
    pub fn signature(&self) -> &str {
        &self.signature
    }

    /// Returns the notification URL.
    #[must_use]
    pub fn notification_url(&self) -> &str {
        &self.notification_url
    }
}

/// Computes the base64 signature Square would send for `body`.
#[must_use]
#[allow(clippy::missing_panics_doc)] // HMAC accepts any key size
pub fn compute_signature(notification_url: &str, body: &[u8], signature_key: &str) -> String {
    let mut mac = HmacSha256::new_from_slice(signature_key.as_bytes())
        .expect("HMAC can take key of any size");
    mac.update(notification_url.as_bytes());
    mac.update(body);
    base64::engine::general_purpose::STANDARD.encode(mac.finalize().into_bytes())
}

/// Returns `true` if `signature` is Square's signature of `body`.
///
/// Returns `false` for an empty signature or key.
#[must_use]
pub fn verify_signature(
    notification_url: &str,
    body: &[u8],
    signature: &str,
    signature_key: &str,
) -> bool {
    if signature.is_empty() || signature_key.is_empty() {
        return false;
    }
    let expected = compute_signature(notification_url, body, signature_key);
    expected.as_bytes().ct_eq(signature.trim().as_bytes()).into()
}

/// Verifies a notification and parses its event.
///
/// `old_signature_key` is tried when the current key fails, so that
/// notifications signed before a key rotation still verify.
///
/// # Errors
///
/// - [`WebhookError::InvalidSignature`] if neither key matches
/// - [`WebhookError::InvalidPayload`] if the body is not a Square event
pub fn verify_webhook(
    request: &WebhookRequest,
    signature_key: &str,
    old_signature_key: Option<&str>,
) -> Result<WebhookEvent, WebhookError> {
    let matches = |key: &str| {
        verify_signature(
            request.notification_url(),
            request.body(),
            request.signature(),
            key,
        )
    };

    if !matches(signature_key) && !old_signature_key.is_some_and(matches) {
        tracing::warn!("Rejected Square webhook with invalid signature");
        return Err(WebhookError::InvalidSignature);
    }

    let event: WebhookEvent =
        serde_json::from_slice(request.body()).map_err(|e| WebhookError::InvalidPayload {
            message: e.to_string(),
        })?;

    tracing::debug!(
        event_id = %event.event_id,
        event_type = %event.event_type,
        "Verified Square webhook"
    );
    Ok(event)
}
