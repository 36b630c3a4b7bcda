//! Caller-facing purchase intents for the Payment Links adapter.
//!
//! Amounts here are in major units (dollars). They are converted to Square
//! money objects exactly once, when the request body is built.

use std::collections::BTreeMap;

use crate::checkout::error::PaymentLinksError;
use crate::checkout::idempotency::IdempotencyKey;
use crate::checkout::money::{self, Money, DEFAULT_CURRENCY};
use crate::checkout::note::compose_gift_card_note;
use crate::checkout::types::{
    AcceptedPaymentMethods, Address, CheckoutOptions, CreatePaymentLinkRequest, CustomField,
    Order, OrderLineItem, PrePopulatedData, QuickPay, ShippingFee,
};

/// Order metadata keys carrying gift-card recipient and sender details.
pub mod metadata_keys {
    /// Recipient name.
    pub const RECIPIENT_NAME: &str = "recipient_name";
    /// Recipient email.
    pub const RECIPIENT_EMAIL: &str = "recipient_email";
    /// Sender name.
    pub const SENDER_NAME: &str = "sender_name";
    /// Sender email.
    pub const SENDER_EMAIL: &str = "sender_email";
}

/// A gift-card purchase.
///
/// # Example
///
/// ```rust
/// use square_giftcard::checkout::GiftCardPaymentLinkOptions;
///
/// let options = GiftCardPaymentLinkOptions {
///     recipient_name: Some("Jane".to_string()),
///     sender_name: Some("John".to_string()),
///     ..GiftCardPaymentLinkOptions::new("$50 Gift Card", 50.0)
/// };
/// assert_eq!(options.currency, "USD");
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct GiftCardPaymentLinkOptions {
    /// Line item name.
    pub name: String,
    /// Price in major units.
    pub amount: f64,
    /// ISO 4217 code. Defaults to `USD`.
    pub currency: String,
    /// Description shown to the merchant.
    pub description: Option<String>,
    /// Who receives the gift card.
    pub recipient_name: Option<String>,
    /// Recipient email, kept in the order metadata.
    pub recipient_email: Option<String>,
    /// Who is giving the gift card.
    pub sender_name: Option<String>,
    /// Sender email, kept in the order metadata.
    pub sender_email: Option<String>,
    /// Personal message appended to the line-item note.
    pub custom_message: Option<String>,
    /// Checkout page behaviour.
    pub checkout: CheckoutSettings,
    /// Buyer details to pre-fill.
    pub buyer: Option<BuyerData>,
    /// Note attached to the resulting payment.
    pub payment_note: Option<String>,
}

impl GiftCardPaymentLinkOptions {
    /// Creates options with the given name and price and defaults elsewhere.
    #[must_use]
    pub fn new(name: impl Into<String>, amount: f64) -> Self {
        Self {
            name: name.into(),
            amount,
            ..Self::default()
        }
    }

    /// The line-item note, e.g. `For: Jane | From: John`.
    #[must_use]
    pub fn note(&self) -> Option<String> {
        compose_gift_card_note(
            self.recipient_name.as_deref(),
            self.sender_name.as_deref(),
            self.custom_message.as_deref(),
        )
    }

    fn metadata(&self) -> BTreeMap<String, String> {
        [
            (metadata_keys::RECIPIENT_NAME, &self.recipient_name),
            (metadata_keys::RECIPIENT_EMAIL, &self.recipient_email),
            (metadata_keys::SENDER_NAME, &self.sender_name),
            (metadata_keys::SENDER_EMAIL, &self.sender_email),
        ]
        .into_iter()
        .filter_map(|(key, value)| {
            value
                .as_deref()
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .map(|v| (key.to_string(), v.to_string()))
        })
        .collect()
    }

    pub(crate) fn to_request(
        &self,
        location_id: &str,
        idempotency_key: IdempotencyKey,
    ) -> Result<CreatePaymentLinkRequest, PaymentLinksError> {
        let name = required_name(&self.name)?;
        let base_price_money = money::price("amount", self.amount, &self.currency)?;

        let order = Order {
            location_id: location_id.to_string(),
            line_items: vec![OrderLineItem {
                name,
                quantity: "1".to_string(),
                base_price_money,
                note: self.note(),
            }],
            metadata: self.metadata(),
        };

        Ok(CreatePaymentLinkRequest {
            idempotency_key,
            description: non_empty(self.description.as_deref()),
            quick_pay: None,
            order: Some(order),
            checkout_options: Some(self.checkout.to_wire(&self.currency)?),
            pre_populated_data: self.buyer.as_ref().and_then(BuyerData::to_wire),
            payment_note: non_empty(self.payment_note.as_deref()),
        })
    }
}

impl Default for GiftCardPaymentLinkOptions {
    fn default() -> Self {
        Self {
            name: String::new(),
            amount: 0.0,
            currency: DEFAULT_CURRENCY.to_string(),
            description: None,
            recipient_name: None,
            recipient_email: None,
            sender_name: None,
            sender_email: None,
            custom_message: None,
            checkout: CheckoutSettings::default(),
            buyer: None,
            payment_note: None,
        }
    }
}

/// A plain single-price checkout without gift-card details.
#[derive(Clone, Debug, PartialEq)]
pub struct QuickPayOptions {
    /// Item name shown on the checkout page.
    pub name: String,
    /// Price in major units.
    pub amount: f64,
    /// ISO 4217 code. Defaults to `USD`.
    pub currency: String,
    /// Description shown to the merchant.
    pub description: Option<String>,
    /// Checkout page behaviour.
    pub checkout: CheckoutSettings,
    /// Buyer details to pre-fill.
    pub buyer: Option<BuyerData>,
    /// Note attached to the resulting payment.
    pub payment_note: Option<String>,
}

impl QuickPayOptions {
    /// Creates options with the given name and price and defaults elsewhere.
    #[must_use]
    pub fn new(name: impl Into<String>, amount: f64) -> Self {
        Self {
            name: name.into(),
            amount,
            ..Self::default()
        }
    }

    pub(crate) fn to_request(
        &self,
        location_id: &str,
        idempotency_key: IdempotencyKey,
    ) -> Result<CreatePaymentLinkRequest, PaymentLinksError> {
        let quick_pay = QuickPay {
            name: required_name(&self.name)?,
            price_money: money::price("amount", self.amount, &self.currency)?,
            location_id: location_id.to_string(),
        };

        Ok(CreatePaymentLinkRequest {
            idempotency_key,
            description: non_empty(self.description.as_deref()),
            quick_pay: Some(quick_pay),
            order: None,
            checkout_options: Some(self.checkout.to_wire(&self.currency)?),
            pre_populated_data: self.buyer.as_ref().and_then(BuyerData::to_wire),
            payment_note: non_empty(self.payment_note.as_deref()),
        })
    }
}

impl Default for QuickPayOptions {
    fn default() -> Self {
        Self {
            name: String::new(),
            amount: 0.0,
            currency: DEFAULT_CURRENCY.to_string(),
            description: None,
            checkout: CheckoutSettings::default(),
            buyer: None,
            payment_note: None,
        }
    }
}

/// Checkout page behaviour. Fees are in major units.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CheckoutSettings {
    /// Offer a tip prompt.
    pub allow_tipping: bool,
    /// Titles of free-text fields the buyer fills in.
    pub custom_fields: Vec<String>,
    /// Where Square sends the buyer after payment.
    pub redirect_url: Option<String>,
    /// Contact address shown to the buyer.
    pub merchant_support_email: Option<String>,
    /// Collect a shipping address.
    pub ask_for_shipping_address: bool,
    /// Wallets and pay-later methods on offer.
    pub accepted_payment_methods: AcceptedPaymentMethods,
    /// Platform fee taken by the application.
    pub app_fee: Option<f64>,
    /// Flat shipping charge.
    pub shipping_fee: Option<ShippingFeeOption>,
}

impl CheckoutSettings {
    pub(crate) fn to_wire(&self, currency: &str) -> Result<CheckoutOptions, PaymentLinksError> {
        let custom_fields = custom_fields(&self.custom_fields);

        Ok(CheckoutOptions {
            allow_tipping: Some(self.allow_tipping),
            custom_fields: (!custom_fields.is_empty()).then_some(custom_fields),
            redirect_url: non_empty(self.redirect_url.as_deref()),
            merchant_support_email: non_empty(self.merchant_support_email.as_deref()),
            ask_for_shipping_address: Some(self.ask_for_shipping_address),
            accepted_payment_methods: Some(self.accepted_payment_methods),
            app_fee_money: app_fee(self.app_fee, currency)?,
            shipping_fee: shipping_fee(self.shipping_fee.as_ref(), currency)?,
        })
    }
}

/// Checkout options to change on an existing link.
///
/// Unlike [`CheckoutSettings`] every field is optional, and only the fields
/// that are `Some` are sent. `custom_fields` replaces the whole list.
///
/// # Example
///
/// ```rust
/// use square_giftcard::checkout::{CheckoutOptionsUpdate, PaymentLinkUpdate};
///
/// let update = PaymentLinkUpdate {
///     checkout: Some(CheckoutOptionsUpdate {
///         redirect_url: Some("https://shop.example.com/thanks".to_string()),
///         ..CheckoutOptionsUpdate::default()
///     }),
///     ..PaymentLinkUpdate::default()
/// };
/// assert!(!update.is_empty());
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CheckoutOptionsUpdate {
    /// Offer a tip prompt.
    pub allow_tipping: Option<bool>,
    /// Titles of free-text fields the buyer fills in.
    pub custom_fields: Option<Vec<String>>,
    /// Where Square sends the buyer after payment.
    pub redirect_url: Option<String>,
    /// Contact address shown to the buyer.
    pub merchant_support_email: Option<String>,
    /// Collect a shipping address.
    pub ask_for_shipping_address: Option<bool>,
    /// Wallets and pay-later methods on offer.
    pub accepted_payment_methods: Option<AcceptedPaymentMethods>,
    /// Platform fee in major units.
    pub app_fee: Option<f64>,
    /// Flat shipping charge.
    pub shipping_fee: Option<ShippingFeeOption>,
}

impl CheckoutOptionsUpdate {
    /// `None` when no field survives, so `checkout_options` is left out.
    pub(crate) fn to_wire(
        &self,
        currency: &str,
    ) -> Result<Option<CheckoutOptions>, PaymentLinksError> {
        let options = CheckoutOptions {
            allow_tipping: self.allow_tipping,
            custom_fields: self.custom_fields.as_deref().map(custom_fields),
            redirect_url: non_empty(self.redirect_url.as_deref()),
            merchant_support_email: non_empty(self.merchant_support_email.as_deref()),
            ask_for_shipping_address: self.ask_for_shipping_address,
            accepted_payment_methods: self.accepted_payment_methods,
            app_fee_money: app_fee(self.app_fee, currency)?,
            shipping_fee: shipping_fee(self.shipping_fee.as_ref(), currency)?,
        };
        Ok((options != CheckoutOptions::default()).then_some(options))
    }
}

/// Flat shipping charge in major units.
#[derive(Clone, Debug, PartialEq)]
pub struct ShippingFeeOption {
    /// Label shown to the buyer.
    pub name: String,
    /// Charge in major units.
    pub amount: f64,
}

/// Buyer details to pre-fill on the checkout page.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BuyerData {
    /// Buyer email.
    pub email: Option<String>,
    /// Buyer phone number.
    pub phone_number: Option<String>,
    /// Shipping or billing address.
    pub address: Option<Address>,
}

impl BuyerData {
    /// `None` when nothing is set, so the field is left out of the request.
    pub(crate) fn to_wire(&self) -> Option<PrePopulatedData> {
        let data = PrePopulatedData {
            buyer_email: non_empty(self.email.as_deref()),
            buyer_phone_number: non_empty(self.phone_number.as_deref()),
            buyer_address: self.address.clone(),
        };
        (data != PrePopulatedData::default()).then_some(data)
    }
}

/// A partial update of a payment link.
///
/// Only the fields that are `Some` are sent. Square requires the link's
/// current `version`; when `version` is `None` the adapter reads it first.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PaymentLinkUpdate {
    /// The link's current version.
    pub version: Option<i64>,
    /// Checkout options to change.
    pub checkout: Option<CheckoutOptionsUpdate>,
    /// Replaces the pre-populated buyer data.
    pub buyer: Option<BuyerData>,
    /// Note attached to the resulting payment.
    pub payment_note: Option<String>,
    /// Currency for the fees in `checkout`. Defaults to `USD`.
    pub currency: Option<String>,
}

impl PaymentLinkUpdate {
    /// Returns `true` if no field is set.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.checkout.is_none() && self.buyer.is_none() && self.payment_note.is_none()
    }

    pub(crate) fn checkout_options(&self) -> Result<Option<CheckoutOptions>, PaymentLinksError> {
        let currency = self.currency.as_deref().unwrap_or(DEFAULT_CURRENCY);
        match &self.checkout {
            Some(checkout) => checkout.to_wire(currency),
            None => Ok(None),
        }
    }

    pub(crate) fn pre_populated_data(&self) -> Option<PrePopulatedData> {
        self.buyer.as_ref().and_then(BuyerData::to_wire)
    }
}

fn required_name(name: &str) -> Result<String, PaymentLinksError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(PaymentLinksError::InvalidInput {
            field: "name",
            reason: "must not be empty".to_string(),
        });
    }
    Ok(trimmed.to_string())
}

fn custom_fields(titles: &[String]) -> Vec<CustomField> {
    titles
        .iter()
        .map(|title| title.trim())
        .filter(|title| !title.is_empty())
        .map(|title| CustomField {
            title: title.to_string(),
        })
        .collect()
}

fn app_fee(amount: Option<f64>, currency: &str) -> Result<Option<Money>, PaymentLinksError> {
    amount
        .map(|amount| money::fee("app_fee", amount, currency))
        .transpose()
}

fn shipping_fee(
    fee: Option<&ShippingFeeOption>,
    currency: &str,
) -> Result<Option<ShippingFee>, PaymentLinksError> {
    fee.map(|fee| -> Result<ShippingFee, PaymentLinksError> {
        Ok(ShippingFee {
            name: non_empty(Some(fee.name.as_str())),
            charge: money::fee("shipping_fee", fee.amount, currency)?,
        })
    })
    .transpose()
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(String::from)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn gift_card() -> GiftCardPaymentLinkOptions {
        GiftCardPaymentLinkOptions {
            description: Some("Birthday card".to_string()),
            recipient_name: Some("Jane".to_string()),
            recipient_email: Some("jane@example.com".to_string()),
            sender_name: Some("John".to_string()),
            custom_message: Some(String::new()),
            ..GiftCardPaymentLinkOptions::new("$49.99 Gift Card", 49.99)
        }
    }

    #[test]
    fn test_gift_card_request_body() {
        let key: IdempotencyKey = "key-1".parse().unwrap();
        let body = serde_json::to_value(gift_card().to_request("LOC1", key).unwrap()).unwrap();

        assert_eq!(body["idempotency_key"], "key-1");
        assert_eq!(body["description"], "Birthday card");
        assert!(body.get("quick_pay").is_none());

        let line_item = &body["order"]["line_items"][0];
        assert_eq!(body["order"]["location_id"], "LOC1");
        assert_eq!(line_item["quantity"], "1");
        assert_eq!(line_item["base_price_money"], json!({"amount": 4999, "currency": "USD"}));
        assert_eq!(line_item["note"], "For: Jane | From: John");

        assert_eq!(
            body["order"]["metadata"],
            json!({
                "recipient_email": "jane@example.com",
                "recipient_name": "Jane",
                "sender_name": "John"
            })
        );
    }

    #[test]
    fn test_checkout_defaults_are_explicit() {
        let key = IdempotencyKey::new();
        let body = serde_json::to_value(gift_card().to_request("LOC1", key).unwrap()).unwrap();
        let checkout = &body["checkout_options"];

        assert_eq!(checkout["allow_tipping"], false);
        assert_eq!(checkout["ask_for_shipping_address"], false);
        assert_eq!(
            checkout["accepted_payment_methods"],
            json!({
                "apple_pay": true,
                "google_pay": true,
                "cash_app_pay": true,
                "afterpay_clearpay": false
            })
        );
        assert!(checkout.get("app_fee_money").is_none());
        assert!(checkout.get("custom_fields").is_none());
        assert!(body.get("pre_populated_data").is_none());
    }

    #[test]
    fn test_each_fee_is_converted_once() {
        let settings = CheckoutSettings {
            app_fee: Some(1.25),
            shipping_fee: Some(ShippingFeeOption {
                name: "Mail".to_string(),
                amount: 4.995,
            }),
            custom_fields: vec!["Engraving".to_string(), " ".to_string()],
            ..CheckoutSettings::default()
        };

        let wire = settings.to_wire("cad").unwrap();
        assert_eq!(wire.app_fee_money.unwrap().amount, 125);
        let shipping = wire.shipping_fee.unwrap();
        assert_eq!(shipping.charge.amount, 500);
        assert_eq!(shipping.charge.currency, "CAD");
        assert_eq!(wire.custom_fields.unwrap().len(), 1);
    }

    #[test]
    fn test_invalid_values_are_rejected_before_sending() {
        let key = IdempotencyKey::new();
        let options = GiftCardPaymentLinkOptions::new("  ", 10.0);
        assert!(matches!(
            options.to_request("LOC1", key.clone()),
            Err(PaymentLinksError::InvalidInput { field: "name", .. })
        ));

        let options = QuickPayOptions::new("Coffee", -1.0);
        assert!(matches!(
            options.to_request("LOC1", key.clone()),
            Err(PaymentLinksError::InvalidAmount { field: "amount", .. })
        ));

        let mut options = QuickPayOptions::new("Coffee", 3.5);
        options.checkout.app_fee = Some(f64::NAN);
        assert!(matches!(
            options.to_request("LOC1", key),
            Err(PaymentLinksError::InvalidAmount { field: "app_fee", .. })
        ));
    }

    #[test]
    fn test_quick_pay_request_body() {
        let options = QuickPayOptions {
            buyer: Some(BuyerData {
                email: Some("buyer@example.com".to_string()),
                ..BuyerData::default()
            }),
            ..QuickPayOptions::new("Coffee", 3.5)
        };

        let body = serde_json::to_value(options.to_request("LOC1", IdempotencyKey::new()).unwrap())
            .unwrap();

        assert!(body.get("order").is_none());
        assert_eq!(
            body["quick_pay"],
            json!({
                "name": "Coffee",
                "price_money": {"amount": 350, "currency": "USD"},
                "location_id": "LOC1"
            })
        );
        assert_eq!(
            body["pre_populated_data"],
            json!({"buyer_email": "buyer@example.com"})
        );
    }

    #[test]
    fn test_update_only_carries_supplied_fields() {
        let update = PaymentLinkUpdate {
            payment_note: Some("x".to_string()),
            ..PaymentLinkUpdate::default()
        };
        assert!(!update.is_empty());
        assert!(update.checkout_options().unwrap().is_none());
        assert!(update.pre_populated_data().is_none());
        assert!(PaymentLinkUpdate::default().is_empty());
    }

    #[test]
    fn test_checkout_update_sends_only_set_fields() {
        let update = PaymentLinkUpdate {
            checkout: Some(CheckoutOptionsUpdate {
                redirect_url: Some("https://shop.example.com/thanks".to_string()),
                ..CheckoutOptionsUpdate::default()
            }),
            ..PaymentLinkUpdate::default()
        };

        let wire = serde_json::to_value(update.checkout_options().unwrap()).unwrap();
        assert_eq!(wire, json!({"redirect_url": "https://shop.example.com/thanks"}));

        let blank = CheckoutOptionsUpdate {
            merchant_support_email: Some("  ".to_string()),
            ..CheckoutOptionsUpdate::default()
        };
        assert!(blank.to_wire(DEFAULT_CURRENCY).unwrap().is_none());

        let cleared = CheckoutOptionsUpdate {
            allow_tipping: Some(false),
            custom_fields: Some(Vec::new()),
            ..CheckoutOptionsUpdate::default()
        };
        assert_eq!(
            serde_json::to_value(cleared.to_wire(DEFAULT_CURRENCY).unwrap()).unwrap(),
            json!({"allow_tipping": false, "custom_fields": []})
        );
    }

    #[test]
    fn test_update_buyer_data_drops_blank_strings() {
        let update = PaymentLinkUpdate {
            buyer: Some(BuyerData {
                email: Some(String::new()),
                phone_number: Some(" +15551234567 ".to_string()),
                ..BuyerData::default()
            }),
            ..PaymentLinkUpdate::default()
        };

        let data = update.pre_populated_data().unwrap();
        assert_eq!(data.buyer_email, None);
        assert_eq!(data.buyer_phone_number.as_deref(), Some("+15551234567"));

        let blank = PaymentLinkUpdate {
            buyer: Some(BuyerData {
                email: Some("   ".to_string()),
                ..BuyerData::default()
            }),
            ..PaymentLinkUpdate::default()
        };
        assert!(blank.pre_populated_data().is_none());
    }
}
