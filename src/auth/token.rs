//! OAuth token records for Square merchant connections.
//!
//! This module provides the [`OAuth2Token`] produced by the code exchange and
//! refresh grants, the [`TokenStatus`] returned by token introspection, and
//! the wire shapes Square responds with.
//!
//! Tokens are plain values: the SDK never stores them. Callers persist the
//! token alongside the merchant connection and decide when to refresh it
//! (see [`OAuth2Token::expires_within`]).

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::auth::oauth::OAuthError;

/// A normalized Square OAuth token.
///
/// # Example
///
/// ```rust
/// use chrono::{Duration, Utc};
/// use square_giftcard::auth::OAuth2Token;
///
/// let token = OAuth2Token {
///     access_token: "EAAA-access".to_string(),
///     refresh_token: Some("EQAA-refresh".to_string()),
///     expires_at: Utc::now() + Duration::days(30),
///     merchant_id: "MLQW3".to_string(),
///     scopes: vec!["PAYMENTS_READ".to_string()],
///     token_type: "bearer".to_string(),
///     short_lived: false,
///     refresh_token_expires_at: None,
/// };
///
/// assert!(!token.expired());
/// assert!(token.expires_within(Duration::days(31)));
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OAuth2Token {
    /// The bearer token used for API calls on the merchant's behalf.
    pub access_token: String,
    /// The refresh token, when Square issued one.
    pub refresh_token: Option<String>,
    /// When the access token expires.
    pub expires_at: DateTime<Utc>,
    /// The merchant that granted access.
    pub merchant_id: String,
    /// Granted scopes. Square omits these from grant responses, so the list
    /// is empty unless filled in from a token status lookup.
    #[serde(default)]
    pub scopes: Vec<String>,
    /// Token type reported by Square (always `bearer` today).
    pub token_type: String,
    /// `true` for short-lived tokens issued to PKCE clients.
    #[serde(default)]
    pub short_lived: bool,
    /// When the refresh token expires, for PKCE-issued refresh tokens.
    #[serde(default)]
    pub refresh_token_expires_at: Option<DateTime<Utc>>,
}

impl OAuth2Token {
    /// Returns `true` if the access token has expired.
    #[must_use]
    pub fn expired(&self) -> bool {
        Utc::now() >= self.expires_at
    }

    /// Returns `true` if the access token expires within `window`.
    ///
    /// Use this to refresh proactively; the SDK does not schedule refreshes.
    #[must_use]
    pub fn expires_within(&self, window: Duration) -> bool {
        // Past the representable range every expiry is inside the window.
        Utc::now()
            .checked_add_signed(window)
            .map_or(window > Duration::zero(), |deadline| {
                deadline >= self.expires_at
            })
    }

    /// Returns `true` if a refresh token is present and not known to be expired.
    #[must_use]
    pub fn can_refresh(&self) -> bool {
        self.refresh_token.is_some()
            && self
                .refresh_token_expires_at
                .map_or(true, |expires| Utc::now() < expires)
    }

    /// Normalizes a token endpoint response.
    ///
    /// # Errors
    ///
    /// Returns [`OAuthError::InvalidResponse`] when a required field is
    /// missing or a timestamp cannot be parsed.
    pub(crate) fn from_response(response: ObtainTokenResponse) -> Result<Self, OAuthError> {
        let access_token = response
            .access_token
            .filter(|t| !t.is_empty())
            .ok_or_else(|| invalid("access_token"))?;
        let merchant_id = response
            .merchant_id
            .filter(|m| !m.is_empty())
            .ok_or_else(|| invalid("merchant_id"))?;
        let expires_at = parse_timestamp(
            "expires_at",
            response.expires_at.as_deref().ok_or_else(|| invalid("expires_at"))?,
        )?;
        let refresh_token_expires_at = response
            .refresh_token_expires_at
            .as_deref()
            .map(|raw| parse_timestamp("refresh_token_expires_at", raw))
            .transpose()?;

        Ok(Self {
            access_token,
            refresh_token: response.refresh_token.filter(|t| !t.is_empty()),
            expires_at,
            merchant_id,
            scopes: response.scopes.unwrap_or_default(),
            token_type: response.token_type.unwrap_or_else(|| "bearer".to_string()),
            short_lived: response.short_lived.unwrap_or(false),
            refresh_token_expires_at,
        })
    }
}

/// Introspection result for an access token.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenStatus {
    /// Scopes granted to the token.
    pub scopes: Vec<String>,
    /// When the token expires. `None` for personal access tokens, which do not expire.
    pub expires_at: Option<DateTime<Utc>>,
    /// The merchant the token acts for.
    pub merchant_id: String,
    /// The application the token was issued to.
    pub client_id: Option<String>,
}

impl TokenStatus {
    pub(crate) fn from_response(response: RetrieveTokenStatusResponse) -> Result<Self, OAuthError> {
        let merchant_id = response
            .merchant_id
            .filter(|m| !m.is_empty())
            .ok_or_else(|| invalid("merchant_id"))?;
        let expires_at = response
            .expires_at
            .as_deref()
            .map(|raw| parse_timestamp("expires_at", raw))
            .transpose()?;

        Ok(Self {
            scopes: response.scopes.unwrap_or_default(),
            expires_at,
            merchant_id,
            client_id: response.client_id,
        })
    }
}

/// Body of `POST /oauth2/token`.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct ObtainTokenResponse {
    pub access_token: Option<String>,
    pub token_type: Option<String>,
    pub expires_at: Option<String>,
    pub merchant_id: Option<String>,
    pub refresh_token: Option<String>,
    pub short_lived: Option<bool>,
    pub refresh_token_expires_at: Option<String>,
    pub scopes: Option<Vec<String>>,
}

/// Body of `POST /oauth2/token/status`.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct RetrieveTokenStatusResponse {
    pub scopes: Option<Vec<String>>,
    pub expires_at: Option<String>,
    pub client_id: Option<String>,
    pub merchant_id: Option<String>,
}

fn invalid(field: &str) -> OAuthError {
    OAuthError::InvalidResponse {
        message: format!("Token response is missing '{field}'"),
    }
}

fn parse_timestamp(field: &str, raw: &str) -> Result<DateTime<Utc>, OAuthError> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| OAuthError::InvalidResponse {
            message: format!("Token response has an invalid '{field}' value '{raw}': {e}"),
        })
}

// Verify token types are Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<OAuth2Token>();
    assert_send_sync::<TokenStatus>();
};

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::oauth::OAuthErrorCode;

    fn full_response() -> ObtainTokenResponse {
        serde_json::from_value(serde_json::json!({
            "access_token": "EAAAl-access",
            "token_type": "bearer",
            "expires_at": "2030-01-01T00:00:00Z",
            "merchant_id": "MLQW3",
            "refresh_token": "EQAAl-refresh",
            "short_lived": false
        }))
        .unwrap()
    }

    #[test]
    fn test_from_response_normalizes_fields() {
        let token = OAuth2Token::from_response(full_response()).unwrap();

        assert_eq!(token.access_token, "EAAAl-access");
        assert_eq!(token.refresh_token.as_deref(), Some("EQAAl-refresh"));
        assert_eq!(token.merchant_id, "MLQW3");
        assert_eq!(token.expires_at.to_rfc3339(), "2030-01-01T00:00:00+00:00");
        assert!(token.scopes.is_empty());
        assert!(!token.short_lived);
        assert!(token.can_refresh());
    }

    #[test]
    fn test_from_response_requires_access_token() {
        let mut response = full_response();
        response.access_token = None;

        let err = OAuth2Token::from_response(response).unwrap_err();
        assert_eq!(err.code(), OAuthErrorCode::InvalidResponse);
        assert!(err.to_string().contains("access_token"));
    }

    #[test]
    fn test_from_response_rejects_bad_timestamp() {
        let mut response = full_response();
        response.expires_at = Some("next tuesday".to_string());

        let err = OAuth2Token::from_response(response).unwrap_err();
        assert_eq!(err.code(), OAuthErrorCode::InvalidResponse);
        assert!(err.to_string().contains("next tuesday"));
    }

    #[test]
    fn test_expiry_helpers() {
        let mut token = OAuth2Token::from_response(full_response()).unwrap();
        token.expires_at = Utc::now() + Duration::hours(2);
        assert!(!token.expired());
        assert!(token.expires_within(Duration::hours(3)));
        assert!(!token.expires_within(Duration::hours(1)));

        token.expires_at = Utc::now() - Duration::seconds(1);
        assert!(token.expired());
    }

    #[test]
    fn test_expires_within_handles_windows_beyond_calendar_range() {
        let mut token = OAuth2Token::from_response(full_response()).unwrap();
        token.expires_at = Utc::now() + Duration::days(30);

        // A million years overflows `DateTime<Utc>`.
        let huge = Duration::days(365_000_000);
        assert!(token.expires_within(huge));
        assert!(!token.expires_within(-huge));
    }

    #[test]
    fn test_expired_refresh_token_cannot_refresh() {
        let mut token = OAuth2Token::from_response(full_response()).unwrap();
        token.refresh_token_expires_at = Some(Utc::now() - Duration::days(1));
        assert!(!token.can_refresh());

        token.refresh_token = None;
        token.refresh_token_expires_at = None;
        assert!(!token.can_refresh());
    }

    #[test]
    fn test_token_status_allows_missing_expiry() {
        let response: RetrieveTokenStatusResponse = serde_json::from_value(serde_json::json!({
            "scopes": ["PAYMENTS_READ"],
            "client_id": "sq0idp-app",
            "merchant_id": "MLQW3"
        }))
        .unwrap();

        let status = TokenStatus::from_response(response).unwrap();
        assert_eq!(status.scopes, vec!["PAYMENTS_READ".to_string()]);
        assert!(status.expires_at.is_none());
        assert_eq!(status.client_id.as_deref(), Some("sq0idp-app"));
    }
}
