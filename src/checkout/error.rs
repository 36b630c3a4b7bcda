//! Error types for the Payment Links adapter.
//!
//! Unlike the OAuth adapter, checkout operations fail with an error the caller
//! must handle. Structured Square failures (a response with an `errors` array)
//! become [`PaymentLinksError::Api`], whose message is
//! `Square API Error: <detail of the first error>` and which keeps every
//! entry. Unstructured failures are passed through unchanged as
//! [`PaymentLinksError::Http`].

use thiserror::Error;

use crate::clients::{HttpError, HttpResponseError, SquareApiError};
use crate::error::ConfigError;

/// Errors returned by [`SquarePaymentLinksService`](super::SquarePaymentLinksService).
#[derive(Debug, Error)]
pub enum PaymentLinksError {
    /// Missing or invalid configuration. Raised before any network call.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Square rejected the request with a structured `errors` array.
    #[error(transparent)]
    Api(HttpResponseError),

    /// Any other HTTP-layer failure, unchanged.
    #[error(transparent)]
    Http(HttpError),

    /// Square answered 2xx but the body was not usable.
    #[error("Invalid response from Square: {message}")]
    InvalidResponse {
        /// What was wrong with the body.
        message: String,
    },

    /// A caller-supplied value was rejected before sending.
    #[error("Invalid {field}: {reason}")]
    InvalidInput {
        /// The offending field.
        field: &'static str,
        /// Why it was rejected.
        reason: String,
    },

    /// A monetary amount could not be converted to minor units.
    #[error("Invalid amount {amount} for {field}: {reason}")]
    InvalidAmount {
        /// The offending field.
        field: &'static str,
        /// The amount in major units as supplied.
        amount: f64,
        /// Why it was rejected.
        reason: String,
    },
}

impl PaymentLinksError {
    /// Returns the structured Square errors, empty unless this is
    /// [`PaymentLinksError::Api`].
    #[must_use]
    pub fn api_errors(&self) -> &[SquareApiError] {
        match self {
            Self::Api(e) => &e.errors,
            _ => &[],
        }
    }

    /// Returns the HTTP status Square answered with, if any.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api(e) | Self::Http(HttpError::Response(e)) => Some(e.code),
            Self::Http(HttpError::MaxRetries(e)) => Some(e.code),
            _ => None,
        }
    }
}

impl From<HttpError> for PaymentLinksError {
    fn from(error: HttpError) -> Self {
        match error {
            HttpError::Response(e) if e.is_structured() => Self::Api(e),
            other => Self::Http(other),
        }
    }
}

// Verify PaymentLinksError is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<PaymentLinksError>();
};
