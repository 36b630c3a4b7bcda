//! OAuth 2.0 merchant connections for Square.
//!
//! This module provides [`SquareOAuthService`], the adapter for Square's
//! three-legged authorization code flow and token maintenance:
//!
//! 1. **Authorization** ([`SquareOAuthService::authorization_url`]): build the
//!    consent URL and redirect the merchant to Square. Generate a fresh
//!    `state` with [`generate_state`] (and optionally a [`PkcePair`]) per
//!    attempt and keep it in the caller's session.
//! 2. **Callback**: compare the returned `state` with [`validate_state`], then
//!    call [`SquareOAuthService::exchange_code_for_token`].
//! 3. **Maintenance**: [`SquareOAuthService::refresh_token`],
//!    [`SquareOAuthService::revoke_token`] and
//!    [`SquareOAuthService::get_token_status`].
//!
//! # Availability
//!
//! A service built without client credentials is *unavailable*: every
//! operation that talks to Square or needs the client id returns
//! [`OAuthError::ServiceUnavailable`] instead of panicking, so callers can
//! hide the "Connect with Square" button. Check
//! [`SquareOAuthService::is_available`] up front.
//!
//! # Security Features
//!
//! - **CSRF Protection**: `state` values are 32 random bytes
//! - **Constant-Time Comparison**: [`validate_state`] uses `subtle`
//! - **PKCE**: S256 challenges bind the code to the verifier
//! - **No fallback credentials**: missing configuration fails closed
//!
//! # Example: Authorization Code Flow
//!
//! ```rust,ignore
//! use square_giftcard::auth::oauth::{SquareOAuthService, generate_state, validate_state};
//! use square_giftcard::auth::Scopes;
//!
//! let oauth = SquareOAuthService::from_env();
//! if !oauth.is_available() {
//!     return hide_connect_button();
//! }
//!
//! // Authorize route
//! let state = generate_state();
//! session.insert("square_oauth_state", &state);
//! let url = oauth.authorization_url(&state, &Scopes::required(), None)?;
//!
//! // Callback route
//! if !validate_state(&query.state, &session.get("square_oauth_state")?) {
//!     return Err(csrf_error());
//! }
//! match oauth.exchange_code_for_token(&query.code, None).await {
//!     Ok(token) => store_connection(token).await?,
//!     Err(e) => return Ok(Json(e.to_failure())),
//! }
//! ```

mod authorize;
mod error;
mod pkce;
mod revoke;
mod state;
mod token_exchange;
mod token_refresh;
mod token_status;

pub use authorize::AUTHORIZE_PATH;
pub use error::{OAuthError, OAuthErrorCode, OAuthFailure};
pub use pkce::PkcePair;
pub use revoke::REVOKE_PATH;
pub use state::{generate_state, validate_state};
pub use token_exchange::TOKEN_PATH;
pub use token_status::TOKEN_STATUS_PATH;

use crate::auth::{OAuth2Token, Scopes, TokenStatus};
use crate::clients::HttpClient;
use crate::config::OAuthConfig;
use crate::error::ConfigError;

/// Credentials plus the application-level client built from them.
#[derive(Debug)]
struct Configured {
    config: OAuthConfig,
    client: HttpClient,
}

/// The Square OAuth adapter.
///
/// Construct once at startup and share by reference (or `Arc`) across
/// request handlers. The service holds no mutable state.
///
/// # Example
///
/// ```rust
/// use square_giftcard::auth::oauth::{OAuthErrorCode, SquareOAuthService};
///
/// let oauth = SquareOAuthService::unavailable();
/// assert!(!oauth.is_available());
///
/// let err = oauth
///     .authorization_url("state", &oauth.required_scopes(), None)
///     .unwrap_err();
/// assert_eq!(err.code(), OAuthErrorCode::ServiceUnavailable);
/// ```
#[derive(Debug)]
pub struct SquareOAuthService {
    inner: Option<Configured>,
}

// Verify SquareOAuthService is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<SquareOAuthService>();
};

impl SquareOAuthService {
    /// Creates the service. `None` yields an unavailable service.
    ///
    /// If the HTTP client cannot be built the service is also unavailable;
    /// the failure is logged.
    #[must_use]
    pub fn new(config: Option<OAuthConfig>) -> Self {
        let Some(config) = config else {
            return Self::unavailable();
        };

        match HttpClient::new(config.settings(), None) {
            Ok(client) => {
                tracing::debug!(
                    environment = %config.settings().environment(),
                    "Square OAuth service configured"
                );
                Self {
                    inner: Some(Configured { config, client }),
                }
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to build HTTP client for Square OAuth");
                Self::unavailable()
            }
        }
    }

    /// Creates an available service from a configuration.
    #[must_use]
    pub fn from_config(config: OAuthConfig) -> Self {
        Self::new(Some(config))
    }

    /// Creates a service with no credentials.
    #[must_use]
    pub const fn unavailable() -> Self {
        Self { inner: None }
    }

    /// Creates the service from the process environment.
    ///
    /// Never fails: missing or invalid variables yield an unavailable service.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_config_result(OAuthConfig::from_env())
    }

    /// Creates the service from an arbitrary key/value source.
    ///
    /// Never fails; see [`SquareOAuthService::from_env`].
    #[must_use]
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        Self::from_config_result(OAuthConfig::from_lookup(lookup))
    }

    fn from_config_result(result: Result<OAuthConfig, ConfigError>) -> Self {
        match result {
            Ok(config) => Self::from_config(config),
            Err(ConfigError::MissingEnvVar { var }) => {
                tracing::info!(var, "Square OAuth credentials not set, OAuth is unavailable");
                Self::unavailable()
            }
            Err(e) => {
                tracing::warn!(error = %e, "Invalid Square OAuth configuration, OAuth is unavailable");
                Self::unavailable()
            }
        }
    }

    /// Returns `true` if client credentials were present at construction.
    #[must_use]
    pub const fn is_available(&self) -> bool {
        self.inner.is_some()
    }

    /// Returns the configuration, if available.
    #[must_use]
    pub fn config(&self) -> Option<&OAuthConfig> {
        self.inner.as_ref().map(|inner| &inner.config)
    }

    fn configured(&self) -> Result<&Configured, OAuthError> {
        self.inner.as_ref().ok_or(OAuthError::ServiceUnavailable)
    }

    /// Builds the Square consent URL.
    ///
    /// `state` must be an unguessable per-attempt value (see
    /// [`generate_state`]); the caller stores it and validates the callback
    /// against it. `session` is passed through as Square's `session` parameter.
    ///
    /// # Errors
    ///
    /// Returns [`OAuthError::ServiceUnavailable`] if the service is unconfigured.
    pub fn authorization_url(
        &self,
        state: &str,
        scopes: &Scopes,
        session: Option<&str>,
    ) -> Result<String, OAuthError> {
        let inner = self.configured()?;
        Ok(authorize::authorization_url(
            &inner.config,
            state,
            scopes,
            session,
        ))
    }

    /// Builds the Square consent URL with a PKCE S256 challenge.
    ///
    /// Pass `pkce.code_verifier()` to
    /// [`exchange_code_for_token`](Self::exchange_code_for_token) on callback.
    ///
    /// # Errors
    ///
    /// Returns [`OAuthError::ServiceUnavailable`] if the service is unconfigured.
    pub fn authorization_url_with_pkce(
        &self,
        state: &str,
        scopes: &Scopes,
        session: Option<&str>,
        pkce: &PkcePair,
    ) -> Result<String, OAuthError> {
        let inner = self.configured()?;
        Ok(authorize::authorization_url_with_pkce(
            &inner.config,
            state,
            scopes,
            session,
            pkce,
        ))
    }

    /// Performs the `authorization_code` grant.
    ///
    /// # Errors
    ///
    /// - [`OAuthError::ServiceUnavailable`] if the service is unconfigured
    /// - [`OAuthError::TokenExchangeFailed`] if Square rejects the code
    /// - [`OAuthError::InvalidResponse`] for unusable 2xx bodies
    /// - [`OAuthError::Unknown`] for transport errors and timeouts
    pub async fn exchange_code_for_token(
        &self,
        code: &str,
        code_verifier: Option<&str>,
    ) -> Result<OAuth2Token, OAuthError> {
        let inner = self.configured()?;

        let result =
            token_exchange::exchange_code(&inner.client, &inner.config, code, code_verifier).await;
        log_outcome("exchange", &result);
        result
    }

    /// Performs the `refresh_token` grant.
    ///
    /// Nothing is scheduled; call this before the token's `expires_at`.
    ///
    /// # Errors
    ///
    /// - [`OAuthError::ServiceUnavailable`] if the service is unconfigured
    /// - [`OAuthError::TokenRefreshFailed`] if Square rejects the refresh token
    /// - [`OAuthError::InvalidResponse`] for unusable 2xx bodies
    /// - [`OAuthError::Unknown`] for transport errors and timeouts
    pub async fn refresh_token(&self, refresh_token: &str) -> Result<OAuth2Token, OAuthError> {
        let inner = self.configured()?;

        let result =
            token_refresh::refresh_access_token(&inner.client, &inner.config, refresh_token).await;
        log_outcome("refresh", &result);
        result
    }

    /// Revokes an access token. With `merchant_id`, Square revokes every token
    /// this application holds for that merchant.
    ///
    /// # Errors
    ///
    /// - [`OAuthError::ServiceUnavailable`] if the service is unconfigured
    /// - [`OAuthError::TokenRevokeFailed`] if Square rejects the revocation
    /// - [`OAuthError::Unknown`] for transport errors and timeouts
    pub async fn revoke_token(
        &self,
        access_token: &str,
        merchant_id: Option<&str>,
    ) -> Result<(), OAuthError> {
        let inner = self.configured()?;

        let result = revoke::revoke(
            &inner.client,
            &inner.config,
            Some(access_token),
            merchant_id,
        )
        .await;

        match &result {
            Ok(()) => tracing::info!(merchant_id = ?merchant_id, "Square token revoked"),
            Err(e) => tracing::warn!(code = %e.code(), error = %e, "Square token revocation failed"),
        }
        result
    }

    /// Introspects an access token.
    ///
    /// Uses a separate client whose bearer is `access_token`; the
    /// application client is not involved.
    ///
    /// # Errors
    ///
    /// - [`OAuthError::ServiceUnavailable`] if the service is unconfigured
    /// - [`OAuthError::InvalidResponse`] for unusable 2xx bodies
    /// - [`OAuthError::Unknown`] if Square rejects the token, for transport
    ///   errors and timeouts
    pub async fn get_token_status(&self, access_token: &str) -> Result<TokenStatus, OAuthError> {
        let inner = self.configured()?;
        token_status::token_status(inner.config.settings(), access_token).await
    }

    /// Generates a fresh PKCE pair. Never reuse a pair across attempts.
    #[must_use]
    pub fn generate_pkce_pair(&self) -> PkcePair {
        PkcePair::generate()
    }

    /// Generates a fresh `state` value.
    #[must_use]
    pub fn generate_state(&self) -> String {
        generate_state()
    }

    /// Compares states in constant time.
    #[must_use]
    pub fn validate_state(&self, provided: &str, expected: &str) -> bool {
        validate_state(provided, expected)
    }

    /// Returns Square's full scope catalog.
    #[must_use]
    pub fn available_scopes(&self) -> Scopes {
        Scopes::available()
    }

    /// Returns the scopes this application requests: payments, customers,
    /// orders, gift cards, merchant profile and disputes.
    #[must_use]
    pub fn required_scopes(&self) -> Scopes {
        Scopes::required()
    }
}

fn log_outcome(grant: &'static str, result: &Result<OAuth2Token, OAuthError>) {
    match result {
        Ok(token) => tracing::info!(
            grant,
            merchant_id = %token.merchant_id,
            expires_at = %token.expires_at,
            "Square OAuth grant succeeded"
        ),
        Err(e) => tracing::warn!(grant, code = %e.code(), error = %e, "Square OAuth grant failed"),
    }
}
