//! Square webhook notifications.
//!
//! After a buyer pays through a hosted checkout link, Square reports the
//! payment with `payment.created` and `payment.updated` notifications. This
//! module verifies their signatures and parses the event envelope; routing
//! and persistence are left to the caller.
//!
//! - [`verify_signature`] / [`compute_signature`]: low-level HMAC helpers
//! - [`verify_webhook`]: verify a [`WebhookRequest`] and parse a [`WebhookEvent`]
//!
//! # Example
//!
//! ```rust
//! use square_giftcard::webhooks::{compute_signature, verify_webhook, WebhookRequest};
//!
//! let url = "https://shop.example.com/webhooks/square";
//! let body = br#"{"type":"payment.updated","event_id":"evt-1","data":{"type":"payment","object":{"payment":{"status":"COMPLETED","order_id":"O1"}}}}"#;
//! let signature = compute_signature(url, body, "sig-key");
//!
//! let request = WebhookRequest::new(body.to_vec(), signature, url);
//! let event = verify_webhook(&request, "sig-key", None).unwrap();
//!
//! assert!(event.is_completed_payment());
//! assert_eq!(event.order_id(), Some("O1"));
//! ```

mod errors;
mod types;
mod verification;

pub use errors::WebhookError;
pub use types::{event_types, WebhookEvent, WebhookEventData};
pub use verification::{
    compute_signature, verify_signature, verify_webhook, WebhookRequest, HEADER_SIGNATURE,
};
