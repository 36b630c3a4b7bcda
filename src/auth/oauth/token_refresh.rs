//! `refresh_token` grant against `POST /oauth2/token`.
//!
//! The adapter never schedules refreshes. Callers check
//! [`OAuth2Token::expires_within`] and refresh before `expires_at`.
//!
//! Concurrent refreshes of the same refresh token are not deduplicated. Square
//! may reject the second one; callers needing at-most-once refresh serialize
//! externally.

use crate::auth::oauth::token_exchange::{
    parse_token_response, post_token_request, ObtainTokenRequest,
};
use crate::auth::oauth::OAuthError;
use crate::auth::OAuth2Token;
use crate::clients::HttpClient;
use crate::config::OAuthConfig;

const REFRESH_TOKEN_GRANT_TYPE: &str = "refresh_token";

/// Exchanges a refresh token for a new access token.
///
/// Square may return a new refresh token; when it does not, the caller keeps
/// using the old one.
///
/// # Errors
///
/// - [`OAuthError::TokenRefreshFailed`] if Square rejects the grant
/// - [`OAuthError::InvalidResponse`] if the 2xx body lacks required fields
/// - [`OAuthError::Unknown`] on transport failures and timeouts
pub(crate) async fn refresh_access_token(
    client: &HttpClient,
    config: &OAuthConfig,
    refresh_token: &str,
) -> Result<OAuth2Token, OAuthError> {
    let body = ObtainTokenRequest {
        client_id: config.client_id().as_ref(),
        client_secret: config.client_secret().as_ref(),
        grant_type: REFRESH_TOKEN_GRANT_TYPE,
        code: None,
        redirect_uri: None,
        code_verifier: None,
        refresh_token: Some(refresh_token),
    };

    let response = post_token_request(client, &body)
        .await
        .map_err(|e| OAuthError::from_http(e, OAuthError::refresh_failed))?;

    parse_token_response(response)
}
