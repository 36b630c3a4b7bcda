//! Configuration types for the Square gift-card SDK.
//!
//! This module provides the configuration types used to construct the
//! OAuth adapter ([`SquareOAuthService`](crate::auth::oauth::SquareOAuthService))
//! and the Payment Links adapter
//! ([`SquarePaymentLinksService`](crate::checkout::SquarePaymentLinksService)).
//!
//! # Overview
//!
//! - [`OAuthConfig`]: application credentials for the OAuth code flow
//! - [`PaymentLinksConfig`]: seller access token and location for checkout links
//! - [`ClientSettings`]: transport settings shared by both (environment,
//!   base URL override, timeout, `Square-Version`)
//! - [`ClientId`], [`ClientSecret`], [`AccessToken`], [`LocationId`],
//!   [`RedirectUri`], [`BaseUrl`]: validated newtypes
//! - [`Environment`], [`SquareVersion`]
//!
//! # Environment Variables
//!
//! Both configs can be loaded from the process environment with `from_env()`,
//! or from any key/value source with `from_lookup()`. The variable names are
//! listed in [`env_vars`]. There are no built-in fallback credentials: a
//! missing variable is always reported as [`ConfigError::MissingEnvVar`].
//!
//! # Example
//!
//! ```rust
//! use square_giftcard::{OAuthConfig, ClientId, ClientSecret, Environment};
//!
//! let config = OAuthConfig::builder()
//!     .client_id(ClientId::new("sq0idp-app").unwrap())
//!     .client_secret(ClientSecret::new("sq0csp-secret").unwrap())
//!     .environment(Environment::Sandbox)
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(config.settings().api_base_url(), "https://connect.squareupsandbox.com");
//! ```

mod environment;
mod newtypes;
mod version;

pub use environment::Environment;
pub use newtypes::{AccessToken, BaseUrl, ClientId, ClientSecret, LocationId, RedirectUri};
pub use version::SquareVersion;

use std::time::Duration;

use crate::error::ConfigError;

/// Names of the environment variables read by `from_env()`.
pub mod env_vars {
    /// OAuth application ID.
    pub const OAUTH_CLIENT_ID: &str = "SQUARE_OAUTH_CLIENT_ID";
    /// OAuth application secret.
    pub const OAUTH_CLIENT_SECRET: &str = "SQUARE_OAUTH_CLIENT_SECRET";
    /// OAuth redirect URI.
    pub const OAUTH_REDIRECT_URI: &str = "SQUARE_OAUTH_REDIRECT_URI";
    /// `sandbox` (default) or `production`.
    pub const ENVIRONMENT: &str = "SQUARE_ENVIRONMENT";
    /// Seller access token used for the Checkout API.
    pub const ACCESS_TOKEN: &str = "SQUARE_ACCESS_TOKEN";
    /// Location that owns checkout orders.
    pub const LOCATION_ID: &str = "SQUARE_LOCATION_ID";
    /// Optional request timeout in whole seconds.
    pub const API_TIMEOUT_SECS: &str = "SQUARE_API_TIMEOUT_SECS";
    /// Optional `Square-Version` header override.
    pub const SQUARE_VERSION: &str = "SQUARE_VERSION";
}

/// Default timeout applied to every outbound request.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Transport settings shared by both adapters.
///
/// # Defaults
///
/// - `environment`: [`Environment::Sandbox`]
/// - `base_url`: `None` (derived from the environment)
/// - `timeout`: [`DEFAULT_TIMEOUT`]
/// - `square_version`: [`SquareVersion::latest`]
/// - `user_agent_prefix`: `None`
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClientSettings {
    environment: Environment,
    base_url: Option<BaseUrl>,
    timeout: Duration,
    square_version: SquareVersion,
    user_agent_prefix: Option<String>,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            environment: Environment::default(),
            base_url: None,
            timeout: DEFAULT_TIMEOUT,
            square_version: SquareVersion::latest(),
            user_agent_prefix: None,
        }
    }
}

impl ClientSettings {
    /// Returns the configured environment.
    #[must_use]
    pub const fn environment(&self) -> Environment {
        self.environment
    }

    /// Returns the base URL override, if any.
    #[must_use]
    pub const fn base_url(&self) -> Option<&BaseUrl> {
        self.base_url.as_ref()
    }

    /// Returns the URL requests are sent to: the override if set, otherwise
    /// the environment's host.
    #[must_use]
    pub fn api_base_url(&self) -> &str {
        self.base_url
            .as_ref()
            .map_or_else(|| self.environment.base_url(), |url| url.as_ref())
    }

    /// Returns the per-request timeout.
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Returns the `Square-Version` header value.
    #[must_use]
    pub const fn square_version(&self) -> &SquareVersion {
        &self.square_version
    }

    /// Returns the user agent prefix, if configured.
    #[must_use]
    pub fn user_agent_prefix(&self) -> Option<&str> {
        self.user_agent_prefix.as_deref()
    }

    fn from_lookup<F>(lookup: &F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut settings = Self::default();

        if let Some(env) = non_empty(lookup, env_vars::ENVIRONMENT) {
            settings.environment = env.parse()?;
        }

        if let Some(raw) = non_empty(lookup, env_vars::API_TIMEOUT_SECS) {
            let secs: u64 = raw.parse().map_err(|e: std::num::ParseIntError| {
                ConfigError::InvalidValue {
                    field: env_vars::API_TIMEOUT_SECS,
                    value: raw.clone(),
                    reason: e.to_string(),
                }
            })?;
            if secs == 0 {
                return Err(ConfigError::InvalidValue {
                    field: env_vars::API_TIMEOUT_SECS,
                    value: raw,
                    reason: "timeout must be at least one second".to_string(),
                });
            }
            settings.timeout = Duration::from_secs(secs);
        }

        if let Some(version) = non_empty(lookup, env_vars::SQUARE_VERSION) {
            settings.square_version = version.parse()?;
        }

        Ok(settings)
    }
}

/// Reads a variable, treating blank values as unset.
fn non_empty<F>(lookup: &F, key: &str) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key).filter(|v| !v.trim().is_empty())
}

fn required<F>(lookup: &F, key: &'static str) -> Result<String, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    non_empty(lookup, key).ok_or(ConfigError::MissingEnvVar { var: key })
}

fn process_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// Application credentials for the Square OAuth code flow.
///
/// Immutable after construction. `Clone`, `Send` and `Sync`, so one instance
/// can be built at startup and shared across request handlers.
///
/// # Example
///
/// ```rust
/// use square_giftcard::{OAuthConfig, ClientId, ClientSecret, RedirectUri};
///
/// let config = OAuthConfig::builder()
///     .client_id(ClientId::new("sq0idp-app").unwrap())
///     .client_secret(ClientSecret::new("sq0csp-secret").unwrap())
///     .redirect_uri(RedirectUri::new("https://shop.example.com/api/oauth/square/callback").unwrap())
///     .build()
///     .unwrap();
///
/// assert!(config.redirect_uri().is_some());
/// ```
#[derive(Clone, Debug)]
pub struct OAuthConfig {
    client_id: ClientId,
    client_secret: ClientSecret,
    redirect_uri: Option<RedirectUri>,
    settings: ClientSettings,
}

impl OAuthConfig {
    /// Creates a new builder for constructing an `OAuthConfig`.
    #[must_use]
    pub fn builder() -> OAuthConfigBuilder {
        OAuthConfigBuilder::new()
    }

    /// Loads the configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingEnvVar`] if the client ID or secret is
    /// unset, or a validation error for malformed optional values.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(process_env)
    }

    /// Loads the configuration from an arbitrary key/value source.
    ///
    /// # Errors
    ///
    /// Same as [`OAuthConfig::from_env`].
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let client_id = ClientId::new(required(&lookup, env_vars::OAUTH_CLIENT_ID)?)?;
        let client_secret =
            ClientSecret::new(required(&lookup, env_vars::OAUTH_CLIENT_SECRET)?)?;
        let redirect_uri = non_empty(&lookup, env_vars::OAUTH_REDIRECT_URI)
            .map(RedirectUri::new)
            .transpose()?;
        let settings = ClientSettings::from_lookup(&lookup)?;

        Ok(Self {
            client_id,
            client_secret,
            redirect_uri,
            settings,
        })
    }

    /// Returns the OAuth client ID.
    #[must_use]
    pub const fn client_id(&self) -> &ClientId {
        &self.client_id
    }

    /// Returns the OAuth client secret.
    #[must_use]
    pub const fn client_secret(&self) -> &ClientSecret {
        &self.client_secret
    }

    /// Returns the redirect URI, if configured.
    #[must_use]
    pub const fn redirect_uri(&self) -> Option<&RedirectUri> {
        self.redirect_uri.as_ref()
    }

    /// Returns the transport settings.
    #[must_use]
    pub const fn settings(&self) -> &ClientSettings {
        &self.settings
    }
}

/// Configuration for the Payment Links adapter.
///
/// Holds the seller access token used as the bearer credential for the
/// Checkout API and the location that owns the generated orders.
#[derive(Clone, Debug)]
pub struct PaymentLinksConfig {
    access_token: AccessToken,
    location_id: LocationId,
    settings: ClientSettings,
}

impl PaymentLinksConfig {
    /// Creates a new builder for constructing a `PaymentLinksConfig`.
    #[must_use]
    pub fn builder() -> PaymentLinksConfigBuilder {
        PaymentLinksConfigBuilder::new()
    }

    /// Loads the configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingEnvVar`] if `SQUARE_ACCESS_TOKEN` or
    /// `SQUARE_LOCATION_ID` is unset.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(process_env)
    }

    /// Loads the configuration from an arbitrary key/value source.
    ///
    /// # Errors
    ///
    /// Same as [`PaymentLinksConfig::from_env`].
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let access_token = AccessToken::new(required(&lookup, env_vars::ACCESS_TOKEN)?)?;
        let location_id = LocationId::new(required(&lookup, env_vars::LOCATION_ID)?)?;
        let settings = ClientSettings::from_lookup(&lookup)?;

        Ok(Self {
            access_token,
            location_id,
            settings,
        })
    }

    /// Returns the seller access token.
    #[must_use]
    pub const fn access_token(&self) -> &AccessToken {
        &self.access_token
    }

    /// Returns the location ID.
    #[must_use]
    pub const fn location_id(&self) -> &LocationId {
        &self.location_id
    }

    /// Returns the transport settings.
    #[must_use]
    pub const fn settings(&self) -> &ClientSettings {
        &self.settings
    }
}

// Verify configs are Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<OAuthConfig>();
    assert_send_sync::<PaymentLinksConfig>();
};

/// Builder fields shared by both config builders.
#[derive(Debug, Default)]
struct SettingsBuilder {
    environment: Option<Environment>,
    base_url: Option<BaseUrl>,
    timeout: Option<Duration>,
    square_version: Option<SquareVersion>,
    user_agent_prefix: Option<String>,
}

impl SettingsBuilder {
    fn build(self) -> ClientSettings {
        let defaults = ClientSettings::default();
        ClientSettings {
            environment: self.environment.unwrap_or(defaults.environment),
            base_url: self.base_url,
            timeout: self.timeout.unwrap_or(defaults.timeout),
            square_version: self.square_version.unwrap_or(defaults.square_version),
            user_agent_prefix: self.user_agent_prefix,
        }
    }
}

macro_rules! settings_setters {
    () => {
        /// Sets the Square environment (default: sandbox).
        #[must_use]
        pub const fn environment(mut self, environment: Environment) -> Self {
            self.settings.environment = Some(environment);
            self
        }

        /// Overrides the API base URL (proxies, local mock servers).
        #[must_use]
        pub fn base_url(mut self, base_url: BaseUrl) -> Self {
            self.settings.base_url = Some(base_url);
            self
        }

        /// Sets the per-request timeout (default: 30 seconds).
        #[must_use]
        pub const fn timeout(mut self, timeout: Duration) -> Self {
            self.settings.timeout = Some(timeout);
            self
        }

        /// Sets the `Square-Version` header value.
        #[must_use]
        pub fn square_version(mut self, version: SquareVersion) -> Self {
            self.settings.square_version = Some(version);
            self
        }

        /// Sets the user agent prefix for HTTP requests.
        #[must_use]
        pub fn user_agent_prefix(mut self, prefix: impl Into<String>) -> Self {
            self.settings.user_agent_prefix = Some(prefix.into());
            self
        }
    };
}

/// Builder for constructing [`OAuthConfig`] instances.
///
/// Required fields are `client_id` and `client_secret`.
#[derive(Debug, Default)]
pub struct OAuthConfigBuilder {
    client_id: Option<ClientId>,
    client_secret: Option<ClientSecret>,
    redirect_uri: Option<RedirectUri>,
    settings: SettingsBuilder,
}

impl OAuthConfigBuilder {
    /// Creates a new builder with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the OAuth client ID (required).
    #[must_use]
    pub fn client_id(mut self, id: ClientId) -> Self {
        self.client_id = Some(id);
        self
    }

    /// Sets the OAuth client secret (required).
    #[must_use]
    pub fn client_secret(mut self, secret: ClientSecret) -> Self {
        self.client_secret = Some(secret);
        self
    }

    /// Sets the redirect URI sent with authorization and token requests.
    #[must_use]
    pub fn redirect_uri(mut self, uri: RedirectUri) -> Self {
        self.redirect_uri = Some(uri);
        self
    }

    settings_setters!();

    /// Builds the [`OAuthConfig`].
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingRequiredField`] if `client_id` or
    /// `client_secret` is not set.
    pub fn build(self) -> Result<OAuthConfig, ConfigError> {
        let client_id = self
            .client_id
            .ok_or(ConfigError::MissingRequiredField { field: "client_id" })?;
        let client_secret = self
            .client_secret
            .ok_or(ConfigError::MissingRequiredField {
                field: "client_secret",
            })?;

        Ok(OAuthConfig {
            client_id,
            client_secret,
            redirect_uri: self.redirect_uri,
            settings: self.settings.build(),
        })
    }
}

/// Builder for constructing [`PaymentLinksConfig`] instances.
///
/// Required fields are `access_token` and `location_id`.
#[derive(Debug, Default)]
pub struct PaymentLinksConfigBuilder {
    access_token: Option<AccessToken>,
    location_id: Option<LocationId>,
    settings: SettingsBuilder,
}

impl PaymentLinksConfigBuilder {
    /// Creates a new builder with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the seller access token (required).
    #[must_use]
    pub fn access_token(mut self, token: AccessToken) -> Self {
        self.access_token = Some(token);
        self
    }

    /// Sets the location ID (required).
    #[must_use]
    pub fn location_id(mut self, id: LocationId) -> Self {
        self.location_id = Some(id);
        self
    }

    settings_setters!();

    /// Builds the [`PaymentLinksConfig`].
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingRequiredField`] if `access_token` or
    /// `location_id` is not set.
    pub fn build(self) -> Result<PaymentLinksConfig, ConfigError> {
        let access_token = self
            .access_token
            .ok_or(ConfigError::MissingRequiredField {
                field: "access_token",
            })?;
        let location_id = self
            .location_id
            .ok_or(ConfigError::MissingRequiredField {
                field: "location_id",
            })?;

        Ok(PaymentLinksConfig {
            access_token,
            location_id,
            settings: self.settings.build(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_builder_requires_client_id() {
        let result = OAuthConfigBuilder::new()
            .client_secret(ClientSecret::new("secret").unwrap())
            .build();

        assert!(matches!(
            result,
            Err(ConfigError::MissingRequiredField { field: "client_id" })
        ));
    }

    #[test]
    fn test_builder_requires_client_secret() {
        let result = OAuthConfigBuilder::new()
            .client_id(ClientId::new("id").unwrap())
            .build();

        assert!(matches!(
            result,
            Err(ConfigError::MissingRequiredField {
                field: "client_secret"
            })
        ));
    }

    #[test]
    fn test_builder_provides_sensible_defaults() {
        let config = OAuthConfig::builder()
            .client_id(ClientId::new("id").unwrap())
            .client_secret(ClientSecret::new("secret").unwrap())
            .build()
            .unwrap();

        let settings = config.settings();
        assert_eq!(settings.environment(), Environment::Sandbox);
        assert_eq!(settings.timeout(), DEFAULT_TIMEOUT);
        assert_eq!(settings.square_version(), &SquareVersion::latest());
        assert!(settings.base_url().is_none());
        assert!(settings.user_agent_prefix().is_none());
        assert!(config.redirect_uri().is_none());
    }

    #[test]
    fn test_base_url_override_takes_precedence() {
        let config = PaymentLinksConfig::builder()
            .access_token(AccessToken::new("token").unwrap())
            .location_id(LocationId::new("L1").unwrap())
            .environment(Environment::Production)
            .base_url(BaseUrl::new("http://127.0.0.1:9999").unwrap())
            .build()
            .unwrap();

        assert_eq!(config.settings().api_base_url(), "http://127.0.0.1:9999");
        assert_eq!(config.settings().environment(), Environment::Production);
    }

    #[test]
    fn test_oauth_from_lookup_reads_all_variables() {
        let config = OAuthConfig::from_lookup(lookup_from(&[
            ("SQUARE_OAUTH_CLIENT_ID", "sq0idp-app"),
            ("SQUARE_OAUTH_CLIENT_SECRET", "sq0csp-secret"),
            ("SQUARE_OAUTH_REDIRECT_URI", "https://shop.example.com/cb"),
            ("SQUARE_ENVIRONMENT", "production"),
            ("SQUARE_API_TIMEOUT_SECS", "12"),
        ]))
        .unwrap();

        assert_eq!(config.client_id().as_ref(), "sq0idp-app");
        assert_eq!(config.client_secret().as_ref(), "sq0csp-secret");
        assert_eq!(
            config.redirect_uri().map(|uri| uri.as_ref()),
            Some("https://shop.example.com/cb")
        );
        assert_eq!(config.settings().environment(), Environment::Production);
        assert_eq!(config.settings().timeout(), Duration::from_secs(12));
    }

    #[test]
    fn test_oauth_from_lookup_has_no_fallback_credentials() {
        let result = OAuthConfig::from_lookup(lookup_from(&[(
            "SQUARE_OAUTH_CLIENT_SECRET",
            "sq0csp-secret",
        )]));
        assert!(matches!(
            result,
            Err(ConfigError::MissingEnvVar {
                var: "SQUARE_OAUTH_CLIENT_ID"
            })
        ));
    }

    #[test]
    fn test_blank_variables_count_as_missing() {
        let result = PaymentLinksConfig::from_lookup(lookup_from(&[
            ("SQUARE_ACCESS_TOKEN", "   "),
            ("SQUARE_LOCATION_ID", "L1"),
        ]));
        assert!(matches!(
            result,
            Err(ConfigError::MissingEnvVar {
                var: "SQUARE_ACCESS_TOKEN"
            })
        ));
    }

    #[test]
    fn test_payment_links_from_lookup_requires_location() {
        let result =
            PaymentLinksConfig::from_lookup(lookup_from(&[("SQUARE_ACCESS_TOKEN", "token")]));
        assert!(matches!(
            result,
            Err(ConfigError::MissingEnvVar {
                var: "SQUARE_LOCATION_ID"
            })
        ));
    }

    #[test]
    fn test_invalid_timeout_is_rejected() {
        for raw in ["abc", "0"] {
            let result = PaymentLinksConfig::from_lookup(lookup_from(&[
                ("SQUARE_ACCESS_TOKEN", "token"),
                ("SQUARE_LOCATION_ID", "L1"),
                ("SQUARE_API_TIMEOUT_SECS", raw),
            ]));
            assert!(matches!(
                result,
                Err(ConfigError::InvalidValue {
                    field: "SQUARE_API_TIMEOUT_SECS",
                    ..
                })
            ));
        }
    }

    #[test]
    fn test_config_is_clone_and_debug_without_secrets() {
        let config = OAuthConfig::builder()
            .client_id(ClientId::new("id").unwrap())
            .client_secret(ClientSecret::new("very-secret-value").unwrap())
            .build()
            .unwrap();

        let cloned = config.clone();
        assert_eq!(cloned.client_id(), config.client_id());

        let debug_str = format!("{:?}", config);
        assert!(debug_str.contains("OAuthConfig"));
        assert!(!debug_str.contains("very-secret-value"));
    }
}
