//! OAuth-specific error types for the Square gift-card SDK.
//!
//! Every fallible [`SquareOAuthService`](super::SquareOAuthService) method
//! returns `Result<T, OAuthError>`. Expected failures (missing configuration,
//! provider rejection, transport problems) are values, never panics, and each
//! maps to a stable [`OAuthErrorCode`] callers can branch on without matching
//! message text.
//!
//! # Error Codes
//!
//! | Variant | Code |
//! |---------|------|
//! | [`OAuthError::ServiceUnavailable`] | `SERVICE_UNAVAILABLE` |
//! | [`OAuthError::TokenExchangeFailed`] | `TOKEN_EXCHANGE_FAILED` |
//! | [`OAuthError::TokenRefreshFailed`] | `TOKEN_REFRESH_FAILED` |
//! | [`OAuthError::TokenRevokeFailed`] | `TOKEN_REVOKE_FAILED` |
//! | [`OAuthError::InvalidResponse`] | `INVALID_RESPONSE` |
//! | [`OAuthError::Unknown`] | `UNKNOWN_ERROR` |
//!
//! # Example
//!
//! ```rust
//! use square_giftcard::auth::oauth::{OAuthError, OAuthErrorCode};
//!
//! let error = OAuthError::ServiceUnavailable;
//! assert_eq!(error.code(), OAuthErrorCode::ServiceUnavailable);
//!
//! let failure = error.to_failure();
//! let json = serde_json::to_value(&failure).unwrap();
//! assert_eq!(json["success"], false);
//! assert_eq!(json["errorCode"], "SERVICE_UNAVAILABLE");
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::clients::HttpError;

/// Errors returned by the OAuth adapter.
///
/// # Thread Safety
///
/// `OAuthError` is `Send + Sync`, making it safe to use across async boundaries.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum OAuthError {
    /// The service was constructed without client credentials.
    #[error("Square OAuth is not configured: set SQUARE_OAUTH_CLIENT_ID and SQUARE_OAUTH_CLIENT_SECRET")]
    ServiceUnavailable,

    /// Square rejected the `authorization_code` grant.
    #[error("Token exchange failed with status {status}: {message}")]
    TokenExchangeFailed {
        /// The HTTP status code returned.
        status: u16,
        /// The provider's error message.
        message: String,
    },

    /// Square rejected the `refresh_token` grant.
    #[error("Token refresh failed with status {status}: {message}")]
    TokenRefreshFailed {
        /// The HTTP status code returned.
        status: u16,
        /// The provider's error message.
        message: String,
    },

    /// Square rejected the revocation, or reported `success: false`.
    #[error("Token revocation failed with status {status}: {message}")]
    TokenRevokeFailed {
        /// The HTTP status code returned.
        status: u16,
        /// The provider's error message.
        message: String,
    },

    /// Square answered 2xx but the body was not usable.
    #[error("Invalid response from Square: {message}")]
    InvalidResponse {
        /// What was wrong with the body.
        message: String,
    },

    /// Transport failure, timeout, or other unexpected error.
    #[error("Unexpected OAuth error: {message}")]
    Unknown {
        /// Description of the underlying failure.
        message: String,
    },
}

/// Stable, serializable discriminant of an [`OAuthError`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OAuthErrorCode {
    /// See [`OAuthError::ServiceUnavailable`].
    ServiceUnavailable,
    /// See [`OAuthError::TokenExchangeFailed`].
    TokenExchangeFailed,
    /// See [`OAuthError::TokenRefreshFailed`].
    TokenRefreshFailed,
    /// See [`OAuthError::TokenRevokeFailed`].
    TokenRevokeFailed,
    /// See [`OAuthError::InvalidResponse`].
    InvalidResponse,
    /// See [`OAuthError::Unknown`].
    #[serde(rename = "UNKNOWN_ERROR")]
    Unknown,
}

impl OAuthErrorCode {
    /// Returns the wire form of the code (e.g., `TOKEN_EXCHANGE_FAILED`).
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::ServiceUnavailable => "SERVICE_UNAVAILABLE",
            Self::TokenExchangeFailed => "TOKEN_EXCHANGE_FAILED",
            Self::TokenRefreshFailed => "TOKEN_REFRESH_FAILED",
            Self::TokenRevokeFailed => "TOKEN_REVOKE_FAILED",
            Self::InvalidResponse => "INVALID_RESPONSE",
            Self::Unknown => "UNKNOWN_ERROR",
        }
    }
}

impl std::fmt::Display for OAuthErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Serializable failure body for route handlers:
/// `{"success": false, "error": "...", "errorCode": "..."}`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OAuthFailure {
    /// Always `false`.
    pub success: bool,
    /// Human-readable message.
    pub error: String,
    /// Machine-readable code.
    pub error_code: OAuthErrorCode,
}

impl OAuthError {
    /// Returns the stable code for this error.
    #[must_use]
    pub const fn code(&self) -> OAuthErrorCode {
        match self {
            Self::ServiceUnavailable => OAuthErrorCode::ServiceUnavailable,
            Self::TokenExchangeFailed { .. } => OAuthErrorCode::TokenExchangeFailed,
            Self::TokenRefreshFailed { .. } => OAuthErrorCode::TokenRefreshFailed,
            Self::TokenRevokeFailed { .. } => OAuthErrorCode::TokenRevokeFailed,
            Self::InvalidResponse { .. } => OAuthErrorCode::InvalidResponse,
            Self::Unknown { .. } => OAuthErrorCode::Unknown,
        }
    }

    /// Converts the error into the `{success:false, error, errorCode}` shape.
    #[must_use]
    pub fn to_failure(&self) -> OAuthFailure {
        OAuthFailure {
            success: false,
            error: self.to_string(),
            error_code: self.code(),
        }
    }

    /// Maps an HTTP-layer error onto the taxonomy.
    ///
    /// Provider responses become the operation's own variant via `rejected`;
    /// everything that never got a response becomes [`OAuthError::Unknown`].
    pub(crate) fn from_http(error: HttpError, rejected: fn(u16, String) -> Self) -> Self {
        match error {
            HttpError::Response(e) => rejected(e.code, e.message),
            HttpError::MaxRetries(e) => rejected(e.code, e.message),
            other @ (HttpError::InvalidRequest(_)
            | HttpError::Timeout { .. }
            | HttpError::Network(_)) => Self::Unknown {
                message: other.to_string(),
            },
        }
    }

    pub(crate) const fn exchange_failed(status: u16, message: String) -> Self {
        Self::TokenExchangeFailed { status, message }
    }

    pub(crate) const fn refresh_failed(status: u16, message: String) -> Self {
        Self::TokenRefreshFailed { status, message }
    }

    pub(crate) const fn revoke_failed(status: u16, message: String) -> Self {
        Self::TokenRevokeFailed { status, message }
    }

    pub(crate) fn status_failed(status: u16, message: String) -> Self {
        Self::Unknown {
            message: format!("Token status lookup failed with status {status}: {message}"),
        }
    }
}

// Verify OAuthError is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<OAuthError>();
    assert_send_sync::<OAuthFailure>();
};

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clients::{HttpResponseError, InvalidHttpRequestError};
    use std::time::Duration;

    #[test]
    fn test_codes_serialize_as_screaming_snake_case() {
        let cases = [
            (OAuthErrorCode::ServiceUnavailable, "SERVICE_UNAVAILABLE"),
            (OAuthErrorCode::TokenExchangeFailed, "TOKEN_EXCHANGE_FAILED"),
            (OAuthErrorCode::TokenRefreshFailed, "TOKEN_REFRESH_FAILED"),
            (OAuthErrorCode::TokenRevokeFailed, "TOKEN_REVOKE_FAILED"),
            (OAuthErrorCode::InvalidResponse, "INVALID_RESPONSE"),
            (OAuthErrorCode::Unknown, "UNKNOWN_ERROR"),
        ];

        for (code, expected) in cases {
            assert_eq!(serde_json::to_value(code).unwrap(), expected);
            assert_eq!(code.as_str(), expected);
            assert_eq!(code.to_string(), expected);
        }
    }

    #[test]
    fn test_token_exchange_failed_includes_status_and_message() {
        let error = OAuthError::TokenExchangeFailed {
            status: 401,
            message: "Invalid client credentials".to_string(),
        };
        let message = error.to_string();
        assert!(message.contains("401"));
        assert!(message.contains("Invalid client credentials"));
        assert_eq!(error.code(), OAuthErrorCode::TokenExchangeFailed);
    }

    #[test]
    fn test_to_failure_shape() {
        let error = OAuthError::TokenRefreshFailed {
            status: 400,
            message: "refresh token revoked".to_string(),
        };

        let json = serde_json::to_value(error.to_failure()).unwrap();
        assert_eq!(json["success"], false);
        assert_eq!(json["errorCode"], "TOKEN_REFRESH_FAILED");
        assert!(json["error"].as_str().unwrap().contains("refresh token revoked"));
    }

    #[test]
    fn test_from_http_maps_provider_response_to_operation_variant() {
        let http_error = HttpError::Response(HttpResponseError::from_message(
            400,
            "Authorization code is already claimed",
        ));

        let error = OAuthError::from_http(http_error, OAuthError::exchange_failed);
        assert_eq!(
            error,
            OAuthError::TokenExchangeFailed {
                status: 400,
                message: "Authorization code is already claimed".to_string()
            }
        );
    }

    #[test]
    fn test_from_http_maps_transport_failures_to_unknown() {
        let timeout = HttpError::Timeout {
            timeout: Duration::from_secs(30),
        };
        let error = OAuthError::from_http(timeout, OAuthError::refresh_failed);
        assert_eq!(error.code(), OAuthErrorCode::Unknown);
        assert!(error.to_string().contains("timed out"));

        let invalid = HttpError::InvalidRequest(InvalidHttpRequestError::ZeroTries);
        let error = OAuthError::from_http(invalid, OAuthError::revoke_failed);
        assert_eq!(error.code(), OAuthErrorCode::Unknown);
    }

    #[test]
    fn test_status_failures_are_unknown() {
        let http_error = HttpError::Response(HttpResponseError::from_message(401, "expired"));
        let error = OAuthError::from_http(http_error, OAuthError::status_failed);
        assert_eq!(error.code(), OAuthErrorCode::Unknown);
        assert!(error.to_string().contains("401"));
    }
}
