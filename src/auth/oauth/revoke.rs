//! Token revocation against `POST /oauth2/revoke`.
//!
//! Square authenticates this call with `Authorization: Client <secret>` rather
//! than a bearer token, and needs either the access token or the merchant id.
//! Revoking by merchant id revokes every token the application holds for
//! that merchant.

use serde::{Deserialize, Serialize};

use crate::auth::oauth::OAuthError;
use crate::clients::{HttpClient, HttpMethod, HttpRequest, InvalidHttpRequestError};
use crate::config::OAuthConfig;

/// Path of the revoke endpoint.
pub const REVOKE_PATH: &str = "/oauth2/revoke";

#[derive(Debug, Serialize)]
struct RevokeTokenRequest<'a> {
    client_id: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    access_token: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    merchant_id: Option<&'a str>,
}

#[derive(Debug, Default, Deserialize)]
struct RevokeTokenResponse {
    #[serde(default)]
    success: bool,
}

/// Revokes an access token, or all of a merchant's tokens.
///
/// A second revoke of an already-revoked token reports a provider failure;
/// it is never a panic.
///
/// # Errors
///
/// - [`OAuthError::TokenRevokeFailed`] if Square rejects the call or answers
///   `success: false`
/// - [`OAuthError::Unknown`] on transport failures, timeouts, or when
///   neither a token nor a merchant id is given
pub(crate) async fn revoke(
    client: &HttpClient,
    config: &OAuthConfig,
    access_token: Option<&str>,
    merchant_id: Option<&str>,
) -> Result<(), OAuthError> {
    let access_token = access_token.filter(|t| !t.is_empty());
    let merchant_id = merchant_id.filter(|m| !m.is_empty());
    if access_token.is_none() && merchant_id.is_none() {
        return Err(OAuthError::Unknown {
            message: "Revocation needs an access token or a merchant id".to_string(),
        });
    }

    let body = RevokeTokenRequest {
        client_id: config.client_id().as_ref(),
        access_token,
        merchant_id,
    };

    let json = serde_json::to_value(&body).map_err(|e| OAuthError::Unknown {
        message: InvalidHttpRequestError::from(e).to_string(),
    })?;

    let request = HttpRequest::builder(HttpMethod::Post, REVOKE_PATH)
        .body(json)
        .header(
            "Authorization",
            format!("Client {}", config.client_secret().as_ref()),
        )
        .build()
        .map_err(|e| OAuthError::Unknown {
            message: e.to_string(),
        })?;

    let response = client
        .request(request)
        .await
        .map_err(|e| OAuthError::from_http(e, OAuthError::revoke_failed))?;

    let parsed: RevokeTokenResponse =
        serde_json::from_value(response.body).map_err(|e| OAuthError::InvalidResponse {
            message: format!("Failed to parse revoke response: {e}"),
        })?;

    if !parsed.success {
        return Err(OAuthError::TokenRevokeFailed {
            status: response.code,
            message: "Square reported the revocation as unsuccessful".to_string(),
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_request_sends_only_supplied_identifier() {
        let body = RevokeTokenRequest {
            client_id: "app",
            access_token: Some("EAAA"),
            merchant_id: None,
        };
        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            json!({"client_id": "app", "access_token": "EAAA"})
        );

        let body = RevokeTokenRequest {
            client_id: "app",
            access_token: None,
            merchant_id: Some("MLQW3"),
        };
        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            json!({"client_id": "app", "merchant_id": "MLQW3"})
        );
    }

    #[test]
    fn test_response_defaults_to_unsuccessful() {
        let parsed: RevokeTokenResponse = serde_json::from_value(json!({})).unwrap();
        assert!(!parsed.success);
    }
}
