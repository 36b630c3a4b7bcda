//! # Square Gift Card SDK
//!
//! A Rust SDK for the two Square integrations a gift-card storefront needs:
//! merchant OAuth connections and hosted checkout links.
//!
//! ## Overview
//!
//! This SDK provides:
//! - Type-safe configuration via [`OAuthConfig`] and [`PaymentLinksConfig`],
//!   loaded from builders or from `SQUARE_*` environment variables
//! - Validated newtypes for credentials and identifiers
//! - The OAuth authorization code flow with PKCE, token refresh, revocation
//!   and introspection via [`SquareOAuthService`]
//! - Gift-card and quick-pay checkout links via [`SquarePaymentLinksService`]
//! - Webhook signature verification via [`webhooks`]
//! - An async HTTP client with a configurable timeout and opt-in retries
//!
//! ## Quick Start
//!
//! ```rust
//! use square_giftcard::{ClientId, ClientSecret, Environment, OAuthConfig, SquareOAuthService};
//! use square_giftcard::auth::oauth::generate_state;
//!
//! let config = OAuthConfig::builder()
//!     .client_id(ClientId::new("sq0idp-app").unwrap())
//!     .client_secret(ClientSecret::new("sq0csp-secret").unwrap())
//!     .environment(Environment::Sandbox)
//!     .build()
//!     .unwrap();
//!
//! let oauth = SquareOAuthService::from_config(config);
//! let state = generate_state();
//! let url = oauth
//!     .authorization_url(&state, &oauth.required_scopes(), None)
//!     .unwrap();
//! assert!(url.starts_with("https://connect.squareupsandbox.com/oauth2/authorize?"));
//! ```
//!
//! ## Checkout
//!
//! ```rust,ignore
//! use square_giftcard::SquarePaymentLinksService;
//! use square_giftcard::checkout::GiftCardPaymentLinkOptions;
//!
//! // Fails before any network call if SQUARE_ACCESS_TOKEN or
//! // SQUARE_LOCATION_ID is unset.
//! let checkout = SquarePaymentLinksService::from_env()?;
//!
//! let link = checkout
//!     .create_gift_card_payment_link(&GiftCardPaymentLinkOptions {
//!         recipient_name: Some("Jane".to_string()),
//!         sender_name: Some("John".to_string()),
//!         ..GiftCardPaymentLinkOptions::new("$49.99 Gift Card", 49.99)
//!     })
//!     .await?;
//! ```
//!
//! ## Errors
//!
//! - OAuth operations return `Result<_, OAuthError>`. Provider rejections,
//!   transport failures and missing credentials are values with a stable
//!   [`OAuthErrorCode`]; nothing panics.
//! - Checkout operations return `Result<_, PaymentLinksError>`. Structured
//!   Square errors keep the full `errors[]` list.
//!
//! ## Logging
//!
//! The crate emits [`tracing`] events and never installs a subscriber.
//! Tokens and secrets are never logged and are masked in `Debug` output.
//!
//! ## Design Principles
//!
//! - **No global state**: services are built once and passed explicitly
//! - **Fail closed**: no embedded fallback credentials
//! - **Fail-fast validation**: all newtypes validate on construction
//! - **Thread-safe**: all services are `Send + Sync`

pub mod auth;
pub mod checkout;
pub mod clients;
pub mod config;
pub mod error;
pub mod webhooks;

// Re-export public types at crate root for convenience
pub use config::{
    AccessToken, BaseUrl, ClientId, ClientSecret, ClientSettings, Environment, LocationId,
    OAuthConfig, OAuthConfigBuilder, PaymentLinksConfig, PaymentLinksConfigBuilder, RedirectUri,
    SquareVersion,
};
pub use error::ConfigError;

// Re-export HTTP client types
pub use clients::{
    HttpClient, HttpError, HttpMethod, HttpRequest, HttpRequestBuilder, HttpResponse,
    HttpResponseError, InvalidHttpRequestError, MaxHttpRetriesExceededError, SquareApiError,
};

// Re-export the adapters
pub use auth::oauth::{OAuthError, OAuthErrorCode, SquareOAuthService};
pub use auth::{OAuth2Token, OAuthScope, Scopes, TokenStatus};
pub use checkout::{PaymentLink, PaymentLinksError, SquarePaymentLinksService};
