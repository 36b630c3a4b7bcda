//! Authorization URL construction.
//!
//! Builds the browser redirect to Square's hosted consent page:
//! `GET {base}/oauth2/authorize?client_id=..&response_type=code&...`.

use crate::auth::oauth::pkce::PkcePair;
use crate::auth::Scopes;
use crate::config::OAuthConfig;

/// Path of Square's consent page.
pub const AUTHORIZE_PATH: &str = "/oauth2/authorize";

/// Builds the authorization URL.
///
/// Parameters are `client_id`, `response_type=code`, then `redirect_uri` when
/// configured, `state`, `scope` (space-joined, omitted when empty) and
/// `session` when given. Values are percent-encoded.
pub(crate) fn authorization_url(
    config: &OAuthConfig,
    state: &str,
    scopes: &Scopes,
    session: Option<&str>,
) -> String {
    build(config, state, scopes, session, None)
}

/// Same as [`authorization_url`] plus `code_challenge` and
/// `code_challenge_method=S256`.
pub(crate) fn authorization_url_with_pkce(
    config: &OAuthConfig,
    state: &str,
    scopes: &Scopes,
    session: Option<&str>,
    pkce: &PkcePair,
) -> String {
    build(config, state, scopes, session, Some(pkce))
}

fn build(
    config: &OAuthConfig,
    state: &str,
    scopes: &Scopes,
    session: Option<&str>,
    pkce: Option<&PkcePair>,
) -> String {
    let mut params = vec![
        ("client_id", config.client_id().as_ref().to_string()),
        ("response_type", "code".to_string()),
    ];

    if let Some(redirect_uri) = config.redirect_uri() {
        params.push(("redirect_uri", redirect_uri.as_ref().to_string()));
    }

    params.push(("state", state.to_string()));

    if !scopes.is_empty() {
        params.push(("scope", scopes.to_string()));
    }

    if let Some(session) = session {
        params.push(("session", session.to_string()));
    }

    if let Some(pkce) = pkce {
        params.push(("code_challenge", pkce.code_challenge().to_string()));
        params.push((
            "code_challenge_method",
            pkce.code_challenge_method().to_string(),
        ));
    }

    let query_string = params
        .iter()
        .map(|(k, v)| format!("{k}={}", urlencoding::encode(v)))
        .collect::<Vec<_>>()
        .join("&");

    format!(
        "{}{AUTHORIZE_PATH}?{query_string}",
        config.settings().api_base_url()
    )
}
