//! Webhook error types.

use thiserror::Error;

/// Errors returned by [`verify_webhook`](super::verify_webhook).
#[derive(Debug, Error)]
pub enum WebhookError {
    /// The `x-square-hmacsha256-signature` header did not match the body.
    ///
    /// Also returned when the header is missing or the notification URL does
    /// not match the one registered with Square.
    #[error("Webhook signature verification failed")]
    InvalidSignature,

    /// The signature matched but the body is not a Square event.
    #[error("Invalid webhook payload: {message}")]
    InvalidPayload {
        /// Why the body could not be parsed.
        message: String,
    },
}

// Verify WebhookError is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<WebhookError>();
};
