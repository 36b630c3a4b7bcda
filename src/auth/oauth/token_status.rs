//! Token introspection against `POST /oauth2/token/status`.
//!
//! The endpoint authenticates with the token being inspected, so each call
//! builds its own [`HttpClient`] carrying that token as the bearer. The
//! application-level client never holds a merchant token.

use crate::auth::oauth::OAuthError;
use crate::auth::token::{RetrieveTokenStatusResponse, TokenStatus};
use crate::clients::{HttpClient, HttpMethod, HttpRequest};
use crate::config::ClientSettings;

/// Path of the token status endpoint.
pub const TOKEN_STATUS_PATH: &str = "/oauth2/token/status";

/// Retrieves the scopes, expiry and merchant of an access token.
///
/// # Errors
///
/// - [`OAuthError::InvalidResponse`] if the 2xx body lacks a merchant id
/// - [`OAuthError::Unknown`] if Square rejects the token, on transport
///   failures and on timeouts
pub(crate) async fn token_status(
    settings: &ClientSettings,
    access_token: &str,
) -> Result<TokenStatus, OAuthError> {
    if access_token.trim().is_empty() {
        return Err(OAuthError::Unknown {
            message: "Access token must not be empty".to_string(),
        });
    }

    let token_client =
        HttpClient::new(settings, Some(access_token)).map_err(|e| OAuthError::Unknown {
            message: e.to_string(),
        })?;

    let request = HttpRequest::builder(HttpMethod::Post, TOKEN_STATUS_PATH)
        .body(serde_json::json!({}))
        .build()
        .map_err(|e| OAuthError::Unknown {
            message: e.to_string(),
        })?;

    let response = token_client
        .request(request)
        .await
        .map_err(|e| OAuthError::from_http(e, OAuthError::status_failed))?;

    let parsed: RetrieveTokenStatusResponse =
        serde_json::from_value(response.body).map_err(|e| OAuthError::InvalidResponse {
            message: format!("Failed to parse token status response: {e}"),
        })?;

    TokenStatus::from_response(parsed)
}
