//! `authorization_code` grant against `POST /oauth2/token`.
//!
//! Called from the OAuth callback handler once the caller has validated the
//! returned `state`. If the authorize URL carried a PKCE challenge, the
//! matching verifier must be supplied or Square rejects the exchange.

use serde::Serialize;

use crate::auth::oauth::OAuthError;
use crate::auth::token::{ObtainTokenResponse, OAuth2Token};
use crate::clients::{
    HttpClient, HttpError, HttpMethod, HttpRequest, HttpResponse, InvalidHttpRequestError,
};
use crate::config::OAuthConfig;

/// Path of the token endpoint, shared by both grants.
pub const TOKEN_PATH: &str = "/oauth2/token";

const AUTHORIZATION_CODE_GRANT_TYPE: &str = "authorization_code";

/// Request body for `POST /oauth2/token`.
#[derive(Debug, Serialize)]
pub(super) struct ObtainTokenRequest<'a> {
    pub client_id: &'a str,
    pub client_secret: &'a str,
    pub grant_type: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub redirect_uri: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code_verifier: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<&'a str>,
}

/// Exchanges an authorization code for a token.
///
/// # Errors
///
/// - [`OAuthError::TokenExchangeFailed`] if Square rejects the grant
/// - [`OAuthError::InvalidResponse`] if the 2xx body lacks required fields
/// - [`OAuthError::Unknown`] on transport failures and timeouts
pub(crate) async fn exchange_code(
    client: &HttpClient,
    config: &OAuthConfig,
    code: &str,
    code_verifier: Option<&str>,
) -> Result<OAuth2Token, OAuthError> {
    let body = ObtainTokenRequest {
        client_id: config.client_id().as_ref(),
        client_secret: config.client_secret().as_ref(),
        grant_type: AUTHORIZATION_CODE_GRANT_TYPE,
        code: Some(code),
        redirect_uri: config.redirect_uri().map(|uri| uri.as_ref()),
        code_verifier,
        refresh_token: None,
    };

    let response = post_token_request(client, &body)
        .await
        .map_err(|e| OAuthError::from_http(e, OAuthError::exchange_failed))?;

    parse_token_response(response)
}

/// Sends a token request. Shared with the refresh grant.
pub(super) async fn post_token_request(
    client: &HttpClient,
    body: &ObtainTokenRequest<'_>,
) -> Result<HttpResponse, HttpError> {
    let json = serde_json::to_value(body).map_err(InvalidHttpRequestError::from)?;

    let request = HttpRequest::builder(HttpMethod::Post, TOKEN_PATH)
        .body(json)
        .build()?;

    client.request(request).await
}

/// Normalizes a successful token response.
pub(super) fn parse_token_response(response: HttpResponse) -> Result<OAuth2Token, OAuthError> {
    let parsed: ObtainTokenResponse =
        serde_json::from_value(response.body).map_err(|e| OAuthError::InvalidResponse {
            message: format!("Failed to parse token response: {e}"),
        })?;

    OAuth2Token::from_response(parsed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_request_body_skips_absent_fields() {
        let body = ObtainTokenRequest {
            client_id: "app",
            client_secret: "secret",
            grant_type: AUTHORIZATION_CODE_GRANT_TYPE,
            code: Some("code-1"),
            redirect_uri: None,
            code_verifier: None,
            refresh_token: None,
        };

        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            json!({
                "client_id": "app",
                "client_secret": "secret",
                "grant_type": "authorization_code",
                "code": "code-1"
            })
        );
    }

    #[test]
    fn test_request_body_includes_verifier_and_redirect() {
        let body = ObtainTokenRequest {
            client_id: "app",
            client_secret: "secret",
            grant_type: AUTHORIZATION_CODE_GRANT_TYPE,
            code: Some("code-1"),
            redirect_uri: Some("https://shop.example.com/cb"),
            code_verifier: Some("verifier"),
            refresh_token: None,
        };

        let value = serde_json::to_value(&body).unwrap();
        assert_eq!(value["code_verifier"], "verifier");
        assert_eq!(value["redirect_uri"], "https://shop.example.com/cb");
        assert!(value.get("refresh_token").is_none());
    }

    #[test]
    fn test_parse_token_response_rejects_non_object() {
        let response = HttpResponse::new(200, std::collections::HashMap::new(), json!("oops"));
        let err = parse_token_response(response).unwrap_err();
        assert!(matches!(err, OAuthError::InvalidResponse { .. }));
    }
}
