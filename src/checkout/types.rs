//! Square Checkout API wire types.
//!
//! The public types mirror Square's `PaymentLink` resource and its nested
//! objects. Every optional field is skipped when absent so that a partial
//! update never sends `null` over a value the caller did not mention.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::checkout::idempotency::IdempotencyKey;
use crate::checkout::money::Money;

/// A hosted checkout link as returned by Square.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PaymentLink {
    /// Square-assigned link ID.
    pub id: String,
    /// Current version, required when updating.
    pub version: i64,
    /// Description shown to the merchant.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// The order created for this link.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order_id: Option<String>,
    /// Checkout page behaviour.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub checkout_options: Option<CheckoutOptions>,
    /// Buyer data pre-filled on the checkout page.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pre_populated_data: Option<PrePopulatedData>,
    /// Short URL to send to the buyer.
    #[serde(default)]
    pub url: String,
    /// Long form of [`PaymentLink::url`].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub long_url: Option<String>,
    /// Creation time.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    /// Last update time.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
    /// Note attached to the resulting payment.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_note: Option<String>,
    /// Objects Square created alongside the link (orders, subscription plans).
    ///
    /// Only populated by creation calls; passed through unchanged.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub related_resources: Option<serde_json::Value>,
}

/// Checkout page options.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckoutOptions {
    /// Whether the buyer is offered a tip prompt.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allow_tipping: Option<bool>,
    /// Free-text fields the buyer fills in.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_fields: Option<Vec<CustomField>>,
    /// Where Square sends the buyer after payment.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub redirect_url: Option<String>,
    /// Contact address shown to the buyer.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub merchant_support_email: Option<String>,
    /// Whether a shipping address is collected.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ask_for_shipping_address: Option<bool>,
    /// Wallets and pay-later methods on offer.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub accepted_payment_methods: Option<AcceptedPaymentMethods>,
    /// Fee collected by the application.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub app_fee_money: Option<Money>,
    /// Flat shipping charge.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shipping_fee: Option<ShippingFee>,
}

/// A free-text field the buyer fills in at checkout.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomField {
    /// Label shown above the field.
    pub title: String,
}

/// Wallets and pay-later methods offered on the checkout page.
///
/// Apple Pay, Google Pay and Cash App Pay default to on. Afterpay/Clearpay
/// defaults to off.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AcceptedPaymentMethods {
    /// Apple Pay.
    pub apple_pay: bool,
    /// Google Pay.
    pub google_pay: bool,
    /// Cash App Pay.
    pub cash_app_pay: bool,
    /// Afterpay/Clearpay.
    pub afterpay_clearpay: bool,
}

impl Default for AcceptedPaymentMethods {
    fn default() -> Self {
        Self {
            apple_pay: true,
            google_pay: true,
            cash_app_pay: true,
            afterpay_clearpay: false,
        }
    }
}

/// Flat shipping charge added at checkout.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShippingFee {
    /// Label shown to the buyer.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Amount charged.
    pub charge: Money,
}

/// Buyer details pre-filled on the checkout page.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrePopulatedData {
    /// Buyer email.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub buyer_email: Option<String>,
    /// Buyer phone number.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub buyer_phone_number: Option<String>,
    /// Buyer address.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub buyer_address: Option<Address>,
}

/// A postal address in Square's format.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address_line_1: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address_line_2: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub locality: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub administrative_district_level_1: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub postal_code: Option<String>,
    /// ISO 3166-1 alpha-2 country code.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
}

/// Result of deleting a payment link.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeletedPaymentLink {
    /// ID of the deleted link.
    pub id: String,
    /// The order Square cancelled along with the link.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cancelled_order_id: Option<String>,
}

// ---- requests ----

/// `POST /v2/online-checkout/payment-links` body.
#[derive(Clone, Debug, Serialize)]
pub(crate) struct CreatePaymentLinkRequest {
    pub idempotency_key: IdempotencyKey,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quick_pay: Option<QuickPay>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order: Option<Order>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub checkout_options: Option<CheckoutOptions>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pre_populated_data: Option<PrePopulatedData>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_note: Option<String>,
}

/// Single-price checkout with no order details.
#[derive(Clone, Debug, Serialize)]
pub(crate) struct QuickPay {
    pub name: String,
    pub price_money: Money,
    pub location_id: String,
}

#[derive(Clone, Debug, Serialize)]
pub(crate) struct Order {
    pub location_id: String,
    pub line_items: Vec<OrderLineItem>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub metadata: BTreeMap<String, String>,
}

#[derive(Clone, Debug, Serialize)]
pub(crate) struct OrderLineItem {
    pub name: String,
    /// Decimal string, as Square expects.
    pub quantity: String,
    pub base_price_money: Money,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

/// `PUT /v2/online-checkout/payment-links/{id}` body.
#[derive(Clone, Debug, Serialize)]
pub(crate) struct UpdatePaymentLinkRequest {
    pub payment_link: PaymentLinkPatch,
}

#[derive(Clone, Debug, Serialize)]
pub(crate) struct PaymentLinkPatch {
    pub version: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub checkout_options: Option<CheckoutOptions>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pre_populated_data: Option<PrePopulatedData>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_note: Option<String>,
}

// ---- responses ----

#[derive(Debug, Deserialize)]
pub(crate) struct PaymentLinkResponse {
    #[serde(default)]
    pub payment_link: Option<PaymentLink>,
    #[serde(default)]
    pub related_resources: Option<serde_json::Value>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_payment_link_deserializes_square_shape() {
        let link: PaymentLink = serde_json::from_value(json!({
            "id": "LINK1",
            "version": 3,
            "order_id": "ORDER1",
            "checkout_options": {
                "allow_tipping": false,
                "accepted_payment_methods": {"apple_pay": true, "google_pay": false}
            },
            "url": "https://square.link/u/abc",
            "long_url": "https://checkout.square.site/merchant/X/order/Y",
            "created_at": "2025-03-01T12:00:00Z",
            "payment_note": "gift"
        }))
        .unwrap();

        assert_eq!(link.version, 3);
        assert_eq!(link.order_id.as_deref(), Some("ORDER1"));
        let methods = link
            .checkout_options
            .unwrap()
            .accepted_payment_methods
            .unwrap();
        assert!(!methods.google_pay);
        assert!(methods.cash_app_pay);
        assert!(link.created_at.is_some());
        assert!(link.updated_at.is_none());
    }

    #[test]
    fn test_patch_omits_absent_fields() {
        let body = serde_json::to_value(UpdatePaymentLinkRequest {
            payment_link: PaymentLinkPatch {
                version: 2,
                checkout_options: None,
                pre_populated_data: None,
                payment_note: Some("x".to_string()),
            },
        })
        .unwrap();

        assert_eq!(body, json!({"payment_link": {"version": 2, "payment_note": "x"}}));
    }

    #[test]
    fn test_accepted_payment_methods_defaults() {
        let methods = AcceptedPaymentMethods::default();
        assert!(methods.apple_pay && methods.google_pay && methods.cash_app_pay);
        assert!(!methods.afterpay_clearpay);
    }
}
