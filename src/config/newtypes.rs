//! Validated newtype wrappers for configuration values.
//!
//! This module provides type-safe wrappers around string values that validate
//! their contents on construction. Invalid values are rejected with clear error messages.

use crate::error::ConfigError;
use std::fmt;

/// A validated Square OAuth client ID (the application ID).
///
/// # Example
///
/// ```rust
/// use square_giftcard::ClientId;
///
/// let id = ClientId::new("sq0idp-abc123").unwrap();
/// assert_eq!(id.as_ref(), "sq0idp-abc123");
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClientId(String);

impl ClientId {
    /// Creates a new validated client ID.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::EmptyClientId`] if the ID is empty or blank.
    pub fn new(id: impl Into<String>) -> Result<Self, ConfigError> {
        let id = id.into().trim().to_string();
        if id.is_empty() {
            return Err(ConfigError::EmptyClientId);
        }
        Ok(Self(id))
    }
}

impl AsRef<str> for ClientId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// A validated Square OAuth client secret (the application secret).
///
/// # Security
///
/// The `Debug` implementation masks the secret value, displaying only
/// `ClientSecret(*****)` instead of the actual secret.
///
/// # Example
///
/// ```rust
/// use square_giftcard::ClientSecret;
///
/// let secret = ClientSecret::new("sq0csp-secret").unwrap();
/// assert_eq!(format!("{:?}", secret), "ClientSecret(*****)");
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct ClientSecret(String);

impl ClientSecret {
    /// Creates a new validated client secret.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::EmptyClientSecret`] if the secret is empty or blank.
    pub fn new(secret: impl Into<String>) -> Result<Self, ConfigError> {
        let secret = secret.into().trim().to_string();
        if secret.is_empty() {
            return Err(ConfigError::EmptyClientSecret);
        }
        Ok(Self(secret))
    }
}

impl AsRef<str> for ClientSecret {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ClientSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ClientSecret(*****)")
    }
}

/// A validated Square access token (personal or OAuth-issued).
///
/// Like [`ClientSecret`], the `Debug` output is masked.
#[derive(Clone, PartialEq, Eq)]
pub struct AccessToken(String);

impl AccessToken {
    /// Creates a new validated access token.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::EmptyAccessToken`] if the token is empty or blank.
    pub fn new(token: impl Into<String>) -> Result<Self, ConfigError> {
        let token = token.into().trim().to_string();
        if token.is_empty() {
            return Err(ConfigError::EmptyAccessToken);
        }
        Ok(Self(token))
    }
}

impl AsRef<str> for AccessToken {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AccessToken(*****)")
    }
}

/// A validated Square location ID.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LocationId(String);

impl LocationId {
    /// Creates a new validated location ID.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::EmptyLocationId`] if the ID is empty or blank.
    pub fn new(id: impl Into<String>) -> Result<Self, ConfigError> {
        let id = id.into().trim().to_string();
        if id.is_empty() {
            return Err(ConfigError::EmptyLocationId);
        }
        Ok(Self(id))
    }
}

impl AsRef<str> for LocationId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Byte offsets of the scheme and host inside a validated URL string.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct UrlParts {
    scheme_end: usize,
    host_start: usize,
    host_end: usize,
}

impl UrlParts {
    fn parse(url: &str) -> Result<Self, ConfigError> {
        let invalid = || ConfigError::InvalidUrl {
            url: url.to_string(),
        };

        let scheme_end = url.find("://").ok_or_else(invalid)?;
        let scheme = &url[..scheme_end];
        if scheme.is_empty() || !scheme.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(invalid());
        }

        let host_start = scheme_end + 3;
        if host_start >= url.len() {
            return Err(invalid());
        }

        // Host ends at port, path, query, or end of string
        let remainder = &url[host_start..];
        let host_end = remainder
            .find([':', '/', '?', '#'])
            .map_or(url.len(), |i| host_start + i);

        if host_start == host_end {
            return Err(invalid());
        }

        Ok(Self {
            scheme_end,
            host_start,
            host_end,
        })
    }
}

/// A validated OAuth redirect URI registered with the Square application.
///
/// # Example
///
/// ```rust
/// use square_giftcard::RedirectUri;
///
/// let uri = RedirectUri::new("https://shop.example.com/api/oauth/square/callback").unwrap();
/// assert_eq!(uri.scheme(), "https");
/// assert_eq!(uri.host_name(), "shop.example.com");
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RedirectUri {
    url: String,
    parts: UrlParts,
}

impl RedirectUri {
    /// Creates a new validated redirect URI.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidUrl`] if the URI has no scheme or host.
    pub fn new(url: impl Into<String>) -> Result<Self, ConfigError> {
        let url = url.into().trim().to_string();
        let parts = UrlParts::parse(&url)?;
        Ok(Self { url, parts })
    }

    /// Returns the URL scheme (e.g., "https").
    #[must_use]
    pub fn scheme(&self) -> &str {
        &self.url[..self.parts.scheme_end]
    }

    /// Returns the host name portion of the URI.
    #[must_use]
    pub fn host_name(&self) -> &str {
        &self.url[self.parts.host_start..self.parts.host_end]
    }
}

impl AsRef<str> for RedirectUri {
    fn as_ref(&self) -> &str {
        &self.url
    }
}

/// A validated API base URL overriding the environment default.
///
/// Used when requests are routed through a proxy, or pointed at a local mock
/// server in tests. Trailing slashes are stripped so paths can be appended.
///
/// # Example
///
/// ```rust
/// use square_giftcard::BaseUrl;
///
/// let url = BaseUrl::new("http://127.0.0.1:8080/").unwrap();
/// assert_eq!(url.as_ref(), "http://127.0.0.1:8080");
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BaseUrl(String);

impl BaseUrl {
    /// Creates a new validated base URL.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidUrl`] if the URL has no scheme or host.
    pub fn new(url: impl Into<String>) -> Result<Self, ConfigError> {
        let url = url.into().trim().trim_end_matches('/').to_string();
        UrlParts::parse(&url)?;
        Ok(Self(url))
    }
}

impl AsRef<str> for BaseUrl {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
