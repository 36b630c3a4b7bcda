//! HTTP response types for the Square gift-card SDK.
//!
//! This module provides the [`HttpResponse`] type and the conversion from a
//! failed response into a [`HttpResponseError`].

use std::collections::HashMap;

use crate::clients::errors::{HttpResponseError, SquareApiError};

/// An HTTP response from the Square API.
#[derive(Clone, Debug)]
pub struct HttpResponse {
    /// The HTTP status code.
    pub code: u16,
    /// Response headers, keyed by lower-case name (headers may repeat).
    pub headers: HashMap<String, Vec<String>>,
    /// The parsed response body. Empty bodies parse as `{}`.
    pub body: serde_json::Value,
    /// Seconds to wait before retrying (from `Retry-After` header).
    pub retry_request_after: Option<f64>,
}

impl HttpResponse {
    /// Creates a new `HttpResponse`, parsing the `Retry-After` header.
    #[must_use]
    pub fn new(code: u16, headers: HashMap<String, Vec<String>>, body: serde_json::Value) -> Self {
        let retry_request_after = headers
            .get("retry-after")
            .and_then(|values| values.first())
            .and_then(|value| value.parse::<f64>().ok());

        Self {
            code,
            headers,
            body,
            retry_request_after,
        }
    }

    /// Returns `true` if the response status code is in the 2xx range.
    #[must_use]
    pub const fn is_ok(&self) -> bool {
        self.code >= 200 && self.code <= 299
    }

    /// Returns the first value of a header, if present.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.to_ascii_lowercase())
            .and_then(|values| values.first())
            .map(String::as_str)
    }

    /// Parses the body's `errors` array.
    ///
    /// Returns an empty list when the body has no such array. Entries that do
    /// not look like Square errors are skipped.
    #[must_use]
    pub fn errors(&self) -> Vec<SquareApiError> {
        self.body
            .get("errors")
            .and_then(serde_json::Value::as_array)
            .map(|errors| {
                errors
                    .iter()
                    .filter_map(|e| serde_json::from_value(e.clone()).ok())
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Builds the error describing this (failed) response.
    ///
    /// Structured `errors` arrays take precedence. The OAuth endpoints also
    /// answer with `{"message", "type"}` or `{"error", "error_description"}`
    /// bodies, which are used next. Otherwise the status code is reported.
    #[must_use]
    pub fn to_error(&self) -> HttpResponseError {
        let errors = self.errors();
        if !errors.is_empty() {
            return HttpResponseError::from_errors(self.code, errors);
        }

        let text = |key: &str| {
            self.body
                .get(key)
                .and_then(serde_json::Value::as_str)
                .filter(|s| !s.is_empty())
        };

        let message = text("message")
            .or_else(|| text("error_description"))
            .or_else(|| text("error"))
            .or_else(|| text("raw_body"))
            .map_or_else(
                || format!("Square API request failed with status {}", self.code),
                String::from,
            );

        HttpResponseError::from_message(self.code, message)
    }
}
