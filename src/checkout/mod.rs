//! Hosted checkout links for gift-card and quick-pay purchases.
//!
//! [`SquarePaymentLinksService`] wraps Square's Checkout API
//! (`/v2/online-checkout/payment-links`). It turns a caller-side purchase
//! intent ([`GiftCardPaymentLinkOptions`] or [`QuickPayOptions`]) into
//! Square's nested request body and returns the resulting [`PaymentLink`].
//!
//! # Money
//!
//! Options carry prices in major units. Each monetary field is converted to
//! minor units with `round(amount * 100)` exactly once, while the request
//! body is built. See [`money`].
//!
//! # Idempotency
//!
//! Every creation call sends an [`IdempotencyKey`]. The plain methods
//! generate a fresh key per call. To retry an identical request without
//! creating a duplicate link, keep the key and call the `_with_key` variant.
//!
//! # Errors
//!
//! Unlike the OAuth adapter, every method returns [`PaymentLinksError`].
//! Structured Square failures become [`PaymentLinksError::Api`] with the
//! message `Square API Error: <first detail>` and the full error list.
//!
//! # Example
//!
//! ```rust,ignore
//! use square_giftcard::checkout::{GiftCardPaymentLinkOptions, SquarePaymentLinksService};
//!
//! let checkout = SquarePaymentLinksService::from_env()?;
//!
//! let link = checkout
//!     .create_gift_card_payment_link(&GiftCardPaymentLinkOptions {
//!         recipient_name: Some("Jane".to_string()),
//!         sender_name: Some("John".to_string()),
//!         ..GiftCardPaymentLinkOptions::new("$50 Gift Card", 50.0)
//!     })
//!     .await?;
//!
//! redirect_to(&link.url);
//! ```

mod error;
mod idempotency;
pub mod money;
mod note;
mod options;
mod types;

pub use error::PaymentLinksError;
pub use idempotency::{IdempotencyKey, MAX_IDEMPOTENCY_KEY_LENGTH};
pub use money::{Money, DEFAULT_CURRENCY};
pub use note::compose_gift_card_note;
pub use options::{
    metadata_keys, BuyerData, CheckoutOptionsUpdate, CheckoutSettings,
    GiftCardPaymentLinkOptions, PaymentLinkUpdate, QuickPayOptions, ShippingFeeOption,
};
pub use types::{
    AcceptedPaymentMethods, Address, CheckoutOptions, CustomField, DeletedPaymentLink,
    PaymentLink, PrePopulatedData, ShippingFee,
};

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::clients::{HttpClient, HttpError, HttpMethod, HttpRequest, HttpResponse};
use crate::clients::InvalidHttpRequestError;
use crate::config::PaymentLinksConfig;
use types::{
    CreatePaymentLinkRequest, PaymentLinkPatch, PaymentLinkResponse, UpdatePaymentLinkRequest,
};

/// Base path of the Payment Links API.
pub const PAYMENT_LINKS_PATH: &str = "/v2/online-checkout/payment-links";

/// The Square Payment Links adapter.
///
/// Holds the seller access token (as the bearer credential of its HTTP
/// client) and the location that owns created orders. Construct once and
/// share by reference; the service holds no mutable state.
///
/// # Example
///
/// ```rust
/// use square_giftcard::checkout::{PaymentLinksError, SquarePaymentLinksService};
/// use square_giftcard::ConfigError;
///
/// let result = SquarePaymentLinksService::from_lookup(|_| None);
/// assert!(matches!(
///     result,
///     Err(PaymentLinksError::Config(ConfigError::MissingEnvVar { var: "SQUARE_ACCESS_TOKEN" }))
/// ));
/// ```
#[derive(Debug)]
pub struct SquarePaymentLinksService {
    config: PaymentLinksConfig,
    client: HttpClient,
}

// Verify SquarePaymentLinksService is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<SquarePaymentLinksService>();
};

impl SquarePaymentLinksService {
    /// Creates the service.
    ///
    /// # Errors
    ///
    /// Returns [`PaymentLinksError::Http`] if the HTTP client cannot be built.
    pub fn new(config: PaymentLinksConfig) -> Result<Self, PaymentLinksError> {
        let client = HttpClient::new(config.settings(), Some(config.access_token().as_ref()))?;

        let location_id: &str = config.location_id().as_ref();
        tracing::debug!(
            environment = %config.settings().environment(),
            location_id,
            "Square Payment Links service configured"
        );

        Ok(Self { config, client })
    }

    /// Creates the service from the process environment.
    ///
    /// # Errors
    ///
    /// Returns [`PaymentLinksError::Config`] with
    /// [`ConfigError::MissingEnvVar`](crate::ConfigError::MissingEnvVar) if
    /// `SQUARE_ACCESS_TOKEN` or `SQUARE_LOCATION_ID` is unset. Nothing is
    /// sent over the network in that case.
    pub fn from_env() -> Result<Self, PaymentLinksError> {
        Self::new(PaymentLinksConfig::from_env()?)
    }

    /// Creates the service from an arbitrary key/value source.
    ///
    /// # Errors
    ///
    /// Same as [`SquarePaymentLinksService::from_env`].
    pub fn from_lookup<F>(lookup: F) -> Result<Self, PaymentLinksError>
    where
        F: Fn(&str) -> Option<String>,
    {
        Self::new(PaymentLinksConfig::from_lookup(lookup)?)
    }

    /// Returns the configuration.
    #[must_use]
    pub const fn config(&self) -> &PaymentLinksConfig {
        &self.config
    }

    /// Creates a gift-card checkout link with a fresh idempotency key.
    ///
    /// The link carries one line item (quantity 1) whose note reads
    /// `For: <recipient> | From: <sender> | Message: <message>`, and the
    /// recipient/sender details as order metadata.
    ///
    /// # Errors
    ///
    /// - [`PaymentLinksError::InvalidInput`] / [`PaymentLinksError::InvalidAmount`]
    ///   for unusable options, before anything is sent
    /// - [`PaymentLinksError::Api`] if Square rejects the request
    /// - [`PaymentLinksError::Http`] for other HTTP failures
    /// - [`PaymentLinksError::InvalidResponse`] if the body lacks a link
    pub async fn create_gift_card_payment_link(
        &self,
        options: &GiftCardPaymentLinkOptions,
    ) -> Result<PaymentLink, PaymentLinksError> {
        self.create_gift_card_payment_link_with_key(options, IdempotencyKey::new())
            .await
    }

    /// Same as [`create_gift_card_payment_link`](Self::create_gift_card_payment_link)
    /// with a caller-chosen idempotency key.
    ///
    /// # Errors
    ///
    /// See [`create_gift_card_payment_link`](Self::create_gift_card_payment_link).
    pub async fn create_gift_card_payment_link_with_key(
        &self,
        options: &GiftCardPaymentLinkOptions,
        idempotency_key: IdempotencyKey,
    ) -> Result<PaymentLink, PaymentLinksError> {
        let body = options.to_request(self.config.location_id().as_ref(), idempotency_key)?;
        self.create(&body).await
    }

    /// Creates a single-price checkout link with a fresh idempotency key.
    ///
    /// # Errors
    ///
    /// See [`create_gift_card_payment_link`](Self::create_gift_card_payment_link).
    pub async fn create_quick_pay_link(
        &self,
        options: &QuickPayOptions,
    ) -> Result<PaymentLink, PaymentLinksError> {
        self.create_quick_pay_link_with_key(options, IdempotencyKey::new())
            .await
    }

    /// Same as [`create_quick_pay_link`](Self::create_quick_pay_link) with a
    /// caller-chosen idempotency key.
    ///
    /// # Errors
    ///
    /// See [`create_gift_card_payment_link`](Self::create_gift_card_payment_link).
    pub async fn create_quick_pay_link_with_key(
        &self,
        options: &QuickPayOptions,
        idempotency_key: IdempotencyKey,
    ) -> Result<PaymentLink, PaymentLinksError> {
        let body = options.to_request(self.config.location_id().as_ref(), idempotency_key)?;
        self.create(&body).await
    }

    /// Retrieves a payment link.
    ///
    /// # Errors
    ///
    /// - [`PaymentLinksError::InvalidInput`] if `id` is empty
    /// - [`PaymentLinksError::Api`] if Square rejects the request (e.g. `NOT_FOUND`)
    /// - [`PaymentLinksError::Http`] for other HTTP failures
    /// - [`PaymentLinksError::InvalidResponse`] if the body lacks a link
    pub async fn get_payment_link(&self, id: &str) -> Result<PaymentLink, PaymentLinksError> {
        let request = HttpRequest::builder(HttpMethod::Get, link_path(id)?)
            .build()
            .map_err(HttpError::from)?;

        let response = self.client.request(request).await?;
        parse_link(response)
    }

    /// Applies a partial update to a payment link.
    ///
    /// Only the fields set on `update` are sent, so untouched checkout
    /// options and buyer data keep their remote values. If
    /// `update.version` is `None` the current version is retrieved first.
    ///
    /// # Errors
    ///
    /// - [`PaymentLinksError::InvalidInput`] if `id` is empty or `update`
    ///   sets nothing once blank strings are dropped
    /// - the errors of [`get_payment_link`](Self::get_payment_link) when the
    ///   version is looked up
    /// - [`PaymentLinksError::Api`], [`PaymentLinksError::Http`],
    ///   [`PaymentLinksError::InvalidAmount`] or
    ///   [`PaymentLinksError::InvalidResponse`]
    pub async fn update_payment_link(
        &self,
        id: &str,
        update: &PaymentLinkUpdate,
    ) -> Result<PaymentLink, PaymentLinksError> {
        let path = link_path(id)?;
        let checkout_options = update.checkout_options()?;
        let pre_populated_data = update.pre_populated_data();
        if checkout_options.is_none()
            && pre_populated_data.is_none()
            && update.payment_note.is_none()
        {
            return Err(PaymentLinksError::InvalidInput {
                field: "update",
                reason: "no fields to update".to_string(),
            });
        }

        let version = match update.version {
            Some(version) => version,
            None => self.get_payment_link(id).await?.version,
        };

        let body = UpdatePaymentLinkRequest {
            payment_link: PaymentLinkPatch {
                version,
                checkout_options,
                pre_populated_data,
                payment_note: update.payment_note.clone(),
            },
        };

        let request = HttpRequest::builder(HttpMethod::Put, path)
            .body(to_json(&body)?)
            .build()
            .map_err(HttpError::from)?;

        let response = self.client.request(request).await?;
        let link = parse_link(response)?;

        tracing::info!(link_id = %link.id, version = link.version, "Updated Square payment link");
        Ok(link)
    }

    /// Deletes a payment link. Square also cancels the link's order.
    ///
    /// # Errors
    ///
    /// - [`PaymentLinksError::InvalidInput`] if `id` is empty
    /// - [`PaymentLinksError::Api`] / [`PaymentLinksError::Http`] on failure
    /// - [`PaymentLinksError::InvalidResponse`] if the body lacks an `id`
    pub async fn delete_payment_link(
        &self,
        id: &str,
    ) -> Result<DeletedPaymentLink, PaymentLinksError> {
        let request = HttpRequest::builder(HttpMethod::Delete, link_path(id)?)
            .build()
            .map_err(HttpError::from)?;

        let response = self.client.request(request).await?;
        let deleted: DeletedPaymentLink = parse_body(response, "delete payment link response")?;

        tracing::info!(link_id = %deleted.id, "Deleted Square payment link");
        Ok(deleted)
    }

    async fn create(&self, body: &CreatePaymentLinkRequest) -> Result<PaymentLink, PaymentLinksError> {
        let request = HttpRequest::builder(HttpMethod::Post, PAYMENT_LINKS_PATH)
            .body(to_json(body)?)
            .build()
            .map_err(HttpError::from)?;

        let response = self.client.request(request).await?;
        let link = parse_link(response)?;

        tracing::info!(
            link_id = %link.id,
            order_id = link.order_id.as_deref().unwrap_or_default(),
            "Created Square payment link"
        );
        Ok(link)
    }
}

fn link_path(id: &str) -> Result<String, PaymentLinksError> {
    if id.trim().is_empty() {
        return Err(PaymentLinksError::InvalidInput {
            field: "id",
            reason: "must not be empty".to_string(),
        });
    }
    Ok(format!("{PAYMENT_LINKS_PATH}/{}", urlencoding::encode(id)))
}

fn to_json<T: Serialize>(body: &T) -> Result<serde_json::Value, PaymentLinksError> {
    serde_json::to_value(body)
        .map_err(|e| HttpError::from(InvalidHttpRequestError::from(e)).into())
}

fn parse_body<T: DeserializeOwned>(
    response: HttpResponse,
    what: &str,
) -> Result<T, PaymentLinksError> {
    serde_json::from_value(response.body).map_err(|e| PaymentLinksError::InvalidResponse {
        message: format!("Failed to parse {what}: {e}"),
    })
}

fn parse_link(response: HttpResponse) -> Result<PaymentLink, PaymentLinksError> {
    let parsed: PaymentLinkResponse = parse_body(response, "payment link response")?;

    let mut link = parsed
        .payment_link
        .ok_or_else(|| PaymentLinksError::InvalidResponse {
            message: "Response has no payment_link".to_string(),
        })?;

    if parsed.related_resources.is_some() {
        link.related_resources = parsed.related_resources;
    }
    Ok(link)
}
