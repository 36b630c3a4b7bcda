//! Authentication types for the Square gift-card SDK.
//!
//! This module provides the scope catalog, the token records produced by the
//! OAuth grants, and the [`oauth`] adapter itself.
//!
//! # Overview
//!
//! - [`OAuthScope`] / [`Scopes`]: Square permissions requested at authorization
//! - [`OAuth2Token`]: the normalized result of a code exchange or refresh
//! - [`TokenStatus`]: the result of token introspection
//! - [`oauth`]: [`SquareOAuthService`](oauth::SquareOAuthService) and helpers
//!
//! Persisting tokens is the caller's job; nothing here stores them.
//!
//! # Example
//!
//! ```rust
//! use square_giftcard::auth::{OAuthScope, Scopes};
//!
//! let scopes: Scopes = vec![OAuthScope::PaymentsRead, OAuthScope::OrdersRead].into();
//! assert_eq!(scopes.to_string(), "PAYMENTS_READ ORDERS_READ");
//! assert!(Scopes::available().covers(&Scopes::required()));
//! ```

pub mod oauth;
mod scopes;
mod token;

pub use scopes::{OAuthScope, Scopes};
pub use token::{OAuth2Token, TokenStatus};
