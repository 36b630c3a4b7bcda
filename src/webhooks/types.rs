//! Square webhook event envelope.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Event types relevant to hosted checkout.
pub mod event_types {
    /// A payment was created (buyer submitted the checkout form).
    pub const PAYMENT_CREATED: &str = "payment.created";
    /// A payment changed state, e.g. to `COMPLETED`.
    pub const PAYMENT_UPDATED: &str = "payment.updated";
    /// An order changed state.
    pub const ORDER_UPDATED: &str = "order.updated";
}

/// A verified Square webhook notification.
///
/// ```json
/// {
///   "merchant_id": "ML...",
///   "type": "payment.updated",
///   "event_id": "6a8f...",
///   "created_at": "2025-03-01T12:00:00Z",
///   "data": {"type": "payment", "id": "KkA...", "object": {"payment": {...}}}
/// }
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WebhookEvent {
    /// Seller the event belongs to.
    #[serde(default)]
    pub merchant_id: Option<String>,
    /// Event type, e.g. `payment.updated`.
    #[serde(rename = "type")]
    pub event_type: String,
    /// Unique per delivery; use it to drop duplicates.
    pub event_id: String,
    /// When Square raised the event.
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    /// The affected object.
    #[serde(default)]
    pub data: Option<WebhookEventData>,
}

/// The object an event is about.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WebhookEventData {
    /// Object type, e.g. `payment`.
    #[serde(rename = "type", default)]
    pub data_type: Option<String>,
    /// ID of the affected object.
    #[serde(default)]
    pub id: Option<String>,
    /// The object itself, keyed by its type.
    #[serde(default)]
    pub object: serde_json::Value,
}

impl WebhookEvent {
    /// Returns `true` for `payment.*` events.
    #[must_use]
    pub fn is_payment_event(&self) -> bool {
        self.event_type.starts_with("payment.")
    }

    fn payment_field(&self, field: &str) -> Option<&str> {
        self.data
            .as_ref()?
            .object
            .get("payment")?
            .get(field)?
            .as_str()
    }

    /// The payment's status (`APPROVED`, `COMPLETED`, ...), for payment events.
    #[must_use]
    pub fn payment_status(&self) -> Option<&str> {
        self.payment_field("status")
    }

    /// The order the payment belongs to. Matches [`PaymentLink::order_id`].
    ///
    /// [`PaymentLink::order_id`]: crate::checkout::PaymentLink::order_id
    #[must_use]
    pub fn order_id(&self) -> Option<&str> {
        self.payment_field("order_id")
    }

    /// Returns `true` once a payment event reports `COMPLETED`.
    #[must_use]
    pub fn is_completed_payment(&self) -> bool {
        self.is_payment_event() && self.payment_status() == Some("COMPLETED")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_payment_event_accessors() {
        let event: WebhookEvent = serde_json::from_value(json!({
            "merchant_id": "ML1",
            "type": "payment.updated",
            "event_id": "evt-1",
            "created_at": "2025-03-01T12:00:00Z",
            "data": {
                "type": "payment",
                "id": "PAY1",
                "object": {"payment": {"id": "PAY1", "status": "COMPLETED", "order_id": "ORDER1"}}
            }
        }))
        .unwrap();

        assert!(event.is_payment_event());
        assert!(event.is_completed_payment());
        assert_eq!(event.order_id(), Some("ORDER1"));
        assert_eq!(event.event_type, event_types::PAYMENT_UPDATED);
    }

    #[test]
    fn test_non_payment_event() {
        let event: WebhookEvent = serde_json::from_value(json!({
            "type": "order.updated",
            "event_id": "evt-2",
            "data": {"type": "order_updated", "object": {"order_updated": {"state": "OPEN"}}}
        }))
        .unwrap();

        assert!(!event.is_payment_event());
        assert!(!event.is_completed_payment());
        assert_eq!(event.payment_status(), None);
        assert!(event.merchant_id.is_none());
    }
}
