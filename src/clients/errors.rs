//! HTTP-specific error types for the Square gift-card SDK.
//!
//! This module contains error types for HTTP operations, including response
//! errors, retry exhaustion, timeouts and request validation failures.
//!
//! # Error Handling
//!
//! - [`HttpResponseError`]: Non-2xx HTTP responses from Square, with every
//!   entry of the response's `errors` array preserved
//! - [`MaxHttpRetriesExceededError`]: When opt-in retry attempts are exhausted
//! - [`InvalidHttpRequestError`]: When a request fails validation before sending
//! - [`HttpError`]: Unified error type encompassing all HTTP-related errors
//!
//! # Example
//!
//! ```rust,ignore
//! use square_giftcard::clients::{HttpClient, HttpRequest, HttpMethod, HttpError};
//!
//! match client.request(request).await {
//!     Ok(response) => println!("Success: {}", response.body),
//!     Err(HttpError::Response(e)) => {
//!         for error in &e.errors {
//!             println!("{} {}: {:?}", error.category, error.code, error.detail);
//!         }
//!     }
//!     Err(HttpError::Timeout { timeout }) => println!("No answer within {timeout:?}"),
//!     Err(other) => println!("Request failed: {other}"),
//! }
//! ```

use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A single entry of a Square `errors` array.
///
/// Square reports failures as `{"errors": [{"category", "code", "detail", "field"}]}`.
///
/// # Example
///
/// ```rust
/// use square_giftcard::clients::SquareApiError;
///
/// let error: SquareApiError = serde_json::from_str(
///     r#"{"category":"INVALID_REQUEST_ERROR","code":"VALUE_TOO_LOW","detail":"Amount must be positive","field":"quick_pay.price_money.amount"}"#,
/// ).unwrap();
///
/// assert_eq!(error.code, "VALUE_TOO_LOW");
/// assert_eq!(error.to_string(), "Amount must be positive");
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SquareApiError {
    /// High-level error category (e.g., `INVALID_REQUEST_ERROR`).
    #[serde(default)]
    pub category: String,
    /// Specific error code (e.g., `NOT_FOUND`).
    #[serde(default)]
    pub code: String,
    /// Human-readable explanation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
    /// The request field the error relates to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
}

impl std::fmt::Display for SquareApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.detail {
            Some(detail) if !detail.is_empty() => f.write_str(detail),
            _ if !self.code.is_empty() => f.write_str(&self.code),
            _ => f.write_str(&self.category),
        }
    }
}

/// Error returned when an HTTP request receives a non-successful response.
///
/// `errors` holds every structured error Square returned; `message` is the
/// display text. For structured responses the message is
/// `Square API Error: <detail of the first error>`.
///
/// # Example
///
/// ```rust
/// use square_giftcard::clients::{HttpResponseError, SquareApiError};
///
/// let error = HttpResponseError::from_errors(400, vec![SquareApiError {
///     category: "INVALID_REQUEST_ERROR".to_string(),
///     code: "MISSING_REQUIRED_PARAMETER".to_string(),
///     detail: Some("Missing required parameter: location_id".to_string()),
///     field: None,
/// }]);
///
/// assert_eq!(error.to_string(), "Square API Error: Missing required parameter: location_id");
/// assert!(error.is_structured());
/// ```
#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[error("{message}")]
pub struct HttpResponseError {
    /// The HTTP status code of the response.
    pub code: u16,
    /// Display message.
    pub message: String,
    /// Structured Square errors from the response body, in order.
    pub errors: Vec<SquareApiError>,
}

impl HttpResponseError {
    /// Builds an error from a structured `errors` array.
    #[must_use]
    pub fn from_errors(code: u16, errors: Vec<SquareApiError>) -> Self {
        let message = errors.first().map_or_else(
            || format!("Square API request failed with status {code}"),
            |first| format!("Square API Error: {first}"),
        );
        Self {
            code,
            message,
            errors,
        }
    }

    /// Builds an error from an unstructured message.
    #[must_use]
    pub fn from_message(code: u16, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            errors: Vec::new(),
        }
    }

    /// Returns `true` if Square returned a structured `errors` array.
    #[must_use]
    pub fn is_structured(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Returns the first structured error, if any.
    #[must_use]
    pub fn first_error(&self) -> Option<&SquareApiError> {
        self.errors.first()
    }
}

/// Error returned when maximum retry attempts have been exhausted.
///
/// Only produced for requests built with `.tries(n)` where `n > 1`.
#[derive(Debug, Error)]
#[error("Exceeded maximum retry count of {tries}. Last message: {message}")]
pub struct MaxHttpRetriesExceededError {
    /// The HTTP status code of the last response.
    pub code: u16,
    /// The number of tries that were attempted.
    pub tries: u32,
    /// Message from the last response.
    pub message: String,
    /// Structured errors from the last response.
    pub errors: Vec<SquareApiError>,
}

/// Error returned when an HTTP request fails validation.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum InvalidHttpRequestError {
    /// A POST or PUT request was made without a body.
    #[error("Cannot use {method} without specifying data.")]
    MissingBody {
        /// The HTTP method that requires a body.
        method: String,
    },

    /// The request path is not an absolute API path.
    #[error("Invalid request path '{path}'. Paths must start with '/'.")]
    InvalidPath {
        /// The invalid path that was provided.
        path: String,
    },

    /// The number of tries must be at least one.
    #[error("Request tries must be at least 1.")]
    ZeroTries,

    /// The request body could not be serialized to JSON.
    #[error("Invalid request body: {reason}")]
    InvalidBody {
        /// The serialization error.
        reason: String,
    },
}

impl From<serde_json::Error> for InvalidHttpRequestError {
    fn from(error: serde_json::Error) -> Self {
        Self::InvalidBody {
            reason: error.to_string(),
        }
    }
}

/// Unified error type for all HTTP-related errors.
#[derive(Debug, Error)]
pub enum HttpError {
    /// Non-successful HTTP response.
    #[error(transparent)]
    Response(#[from] HttpResponseError),

    /// Maximum retries exceeded.
    #[error(transparent)]
    MaxRetries(#[from] MaxHttpRetriesExceededError),

    /// Invalid request configuration.
    #[error(transparent)]
    InvalidRequest(#[from] InvalidHttpRequestError),

    /// No response arrived within the configured timeout.
    #[error("Square API request timed out after {timeout:?}")]
    Timeout {
        /// The timeout that elapsed.
        timeout: Duration,
    },

    /// Network or transport error.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
}

// Verify error types are Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<HttpError>();
    assert_send_sync::<HttpResponseError>();
};
