//! OAuth permission scopes for Square.
//!
//! This module provides the [`OAuthScope`] catalog and the ordered [`Scopes`]
//! collection used when building authorization URLs.
//!
//! Square scopes are upper-case identifiers (`PAYMENTS_READ`) and are sent
//! space-separated in the `scope` query parameter. Unlike some providers,
//! Square does not imply read access from write access, so both must be
//! requested explicitly.

use crate::error::ConfigError;
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

macro_rules! scope_catalog {
    ($($(#[$doc:meta])* $variant:ident => $name:literal,)+) => {
        /// A Square OAuth permission.
        ///
        /// Known permissions have dedicated variants; anything else parses
        /// into [`OAuthScope::Custom`] so newly introduced Square scopes can
        /// still be requested.
        #[derive(Clone, Debug, PartialEq, Eq, Hash)]
        pub enum OAuthScope {
            $($(#[$doc])* $variant,)+
            /// A scope not in this catalog.
            Custom(String),
        }

        impl OAuthScope {
            /// Every scope in the catalog, in catalog order.
            const CATALOG: &'static [OAuthScope] = &[$(OAuthScope::$variant,)+];

            /// Returns the wire name of the scope.
            #[must_use]
            pub fn as_str(&self) -> &str {
                match self {
                    $(Self::$variant => $name,)+
                    Self::Custom(name) => name,
                }
            }

            fn from_known(name: &str) -> Option<Self> {
                match name {
                    $($name => Some(Self::$variant),)+
                    _ => None,
                }
            }
        }
    };
}

scope_catalog! {
    /// Read appointments for the seller's own team member.
    AppointmentsRead => "APPOINTMENTS_READ",
    /// Create and modify appointments.
    AppointmentsWrite => "APPOINTMENTS_WRITE",
    /// Read linked bank accounts.
    BankAccountsRead => "BANK_ACCOUNTS_READ",
    /// Read cash drawer shifts.
    CashDrawerRead => "CASH_DRAWER_READ",
    /// Read customer profiles.
    CustomersRead => "CUSTOMERS_READ",
    /// Create and modify customer profiles.
    CustomersWrite => "CUSTOMERS_WRITE",
    /// Read device information.
    DevicesRead => "DEVICES_READ",
    /// Read disputes.
    DisputesRead => "DISPUTES_READ",
    /// Accept and contest disputes.
    DisputesWrite => "DISPUTES_WRITE",
    /// Read employee records.
    EmployeesRead => "EMPLOYEES_READ",
    /// Modify employee records.
    EmployeesWrite => "EMPLOYEES_WRITE",
    /// Read gift cards and gift card activities.
    GiftcardsRead => "GIFTCARDS_READ",
    /// Create gift cards and gift card activities.
    GiftcardsWrite => "GIFTCARDS_WRITE",
    /// Read inventory counts.
    InventoryRead => "INVENTORY_READ",
    /// Modify inventory counts.
    InventoryWrite => "INVENTORY_WRITE",
    /// Read invoices.
    InvoicesRead => "INVOICES_READ",
    /// Create and publish invoices.
    InvoicesWrite => "INVOICES_WRITE",
    /// Read catalog items.
    ItemsRead => "ITEMS_READ",
    /// Modify catalog items.
    ItemsWrite => "ITEMS_WRITE",
    /// Read loyalty accounts and programs.
    LoyaltyRead => "LOYALTY_READ",
    /// Modify loyalty accounts.
    LoyaltyWrite => "LOYALTY_WRITE",
    /// Read merchant and location profiles.
    MerchantProfileRead => "MERCHANT_PROFILE_READ",
    /// Modify location profiles.
    MerchantProfileWrite => "MERCHANT_PROFILE_WRITE",
    /// Read online store sites.
    OnlineStoreSiteRead => "ONLINE_STORE_SITE_READ",
    /// Read online store snippets.
    OnlineStoreSnippetsRead => "ONLINE_STORE_SNIPPETS_READ",
    /// Modify online store snippets.
    OnlineStoreSnippetsWrite => "ONLINE_STORE_SNIPPETS_WRITE",
    /// Read orders.
    OrdersRead => "ORDERS_READ",
    /// Create and update orders, including checkout links.
    OrdersWrite => "ORDERS_WRITE",
    /// Read payments and refunds.
    PaymentsRead => "PAYMENTS_READ",
    /// Process payments and refunds.
    PaymentsWrite => "PAYMENTS_WRITE",
    /// Split payments with additional recipients.
    PaymentsWriteAdditionalRecipients => "PAYMENTS_WRITE_ADDITIONAL_RECIPIENTS",
    /// Process in-person payments.
    PaymentsWriteInPerson => "PAYMENTS_WRITE_IN_PERSON",
    /// Read payouts.
    PayoutsRead => "PAYOUTS_READ",
    /// Read subscriptions.
    SubscriptionsRead => "SUBSCRIPTIONS_READ",
    /// Create and modify subscriptions.
    SubscriptionsWrite => "SUBSCRIPTIONS_WRITE",
    /// Read timecards.
    TimecardsRead => "TIMECARDS_READ",
    /// Modify timecards.
    TimecardsWrite => "TIMECARDS_WRITE",
    /// Read timecard settings.
    TimecardsSettingsRead => "TIMECARDS_SETTINGS_READ",
    /// Modify timecard settings.
    TimecardsSettingsWrite => "TIMECARDS_SETTINGS_WRITE",
    /// Read vendors.
    VendorRead => "VENDOR_READ",
    /// Modify vendors.
    VendorWrite => "VENDOR_WRITE",
}

impl OAuthScope {
    /// The full Square scope catalog.
    #[must_use]
    pub fn available() -> Vec<Self> {
        Self::CATALOG.to_vec()
    }

    /// The subset of scopes this application requests when connecting a
    /// merchant: payments, customers, orders, gift cards, merchant profile
    /// and disputes.
    #[must_use]
    pub fn required() -> Vec<Self> {
        vec![
            Self::PaymentsRead,
            Self::PaymentsWrite,
            Self::CustomersRead,
            Self::CustomersWrite,
            Self::OrdersRead,
            Self::OrdersWrite,
            Self::GiftcardsRead,
            Self::GiftcardsWrite,
            Self::MerchantProfileRead,
            Self::DisputesRead,
        ]
    }
}

impl fmt::Display for OAuthScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OAuthScope {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim();
        if name.is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "scope",
                value: s.to_string(),
                reason: "scope cannot be empty".to_string(),
            });
        }
        if !name
            .chars()
            .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit() || c == '_')
        {
            return Err(ConfigError::InvalidValue {
                field: "scope",
                value: s.to_string(),
                reason: "scopes are upper-case identifiers such as PAYMENTS_READ".to_string(),
            });
        }
        Ok(Self::from_known(name).unwrap_or_else(|| Self::Custom(name.to_string())))
    }
}

/// An ordered, de-duplicated list of scopes.
///
/// Order is preserved so the generated `scope` parameter is stable.
/// `Display` joins with single spaces, the separator Square expects.
///
/// # Example
///
/// ```rust
/// use square_giftcard::auth::{OAuthScope, Scopes};
///
/// let scopes: Scopes = "PAYMENTS_READ ORDERS_READ PAYMENTS_READ".parse().unwrap();
/// assert_eq!(scopes.len(), 2);
/// assert_eq!(scopes.to_string(), "PAYMENTS_READ ORDERS_READ");
/// assert!(scopes.contains(&OAuthScope::OrdersRead));
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Scopes(Vec<OAuthScope>);

impl Scopes {
    /// Creates an empty scope list.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the full Square catalog.
    #[must_use]
    pub fn available() -> Self {
        OAuthScope::available().into_iter().collect()
    }

    /// Returns the scopes this application requests.
    #[must_use]
    pub fn required() -> Self {
        OAuthScope::required().into_iter().collect()
    }

    /// Appends a scope unless already present.
    pub fn push(&mut self, scope: OAuthScope) {
        if !self.0.contains(&scope) {
            self.0.push(scope);
        }
    }

    /// Returns `true` if the list contains `scope`.
    #[must_use]
    pub fn contains(&self, scope: &OAuthScope) -> bool {
        self.0.contains(scope)
    }

    /// Returns `true` if every scope in `other` is present in `self`.
    #[must_use]
    pub fn covers(&self, other: &Self) -> bool {
        other.0.iter().all(|s| self.0.contains(s))
    }

    /// Returns the number of scopes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if there are no scopes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns an iterator over the scopes.
    pub fn iter(&self) -> impl Iterator<Item = &OAuthScope> {
        self.0.iter()
    }
}

impl FromIterator<OAuthScope> for Scopes {
    fn from_iter<I: IntoIterator<Item = OAuthScope>>(iter: I) -> Self {
        let mut scopes = Self::new();
        for scope in iter {
            scopes.push(scope);
        }
        scopes
    }
}

impl From<Vec<OAuthScope>> for Scopes {
    fn from(scopes: Vec<OAuthScope>) -> Self {
        scopes.into_iter().collect()
    }
}

impl fmt::Display for Scopes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let joined = self
            .0
            .iter()
            .map(OAuthScope::as_str)
            .collect::<Vec<_>>()
            .join(" ");
        f.write_str(&joined)
    }
}

impl FromStr for Scopes {
    type Err = ConfigError;

    /// Parses a whitespace- or comma-separated scope list.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.split(|c: char| c.is_whitespace() || c == ',')
            .filter(|part| !part.is_empty())
            .map(str::parse)
            .collect()
    }
}

impl Serialize for Scopes {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_seq(self.0.iter().map(OAuthScope::as_str))
    }
}

impl<'de> Deserialize<'de> for Scopes {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let names = Vec::<String>::deserialize(deserializer)?;
        names
            .iter()
            .map(|name| name.parse::<OAuthScope>())
            .collect::<Result<Self, _>>()
            .map_err(de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_scope_round_trips() {
        let scope: OAuthScope = "GIFTCARDS_WRITE".parse().unwrap();
        assert_eq!(scope, OAuthScope::GiftcardsWrite);
        assert_eq!(scope.to_string(), "GIFTCARDS_WRITE");
    }

    #[test]
    fn test_unknown_scope_becomes_custom() {
        let scope: OAuthScope = "CHANNELS_READ".parse().unwrap();
        assert_eq!(scope, OAuthScope::Custom("CHANNELS_READ".to_string()));
        assert_eq!(scope.as_str(), "CHANNELS_READ");
    }

    #[test]
    fn test_rejects_lowercase_scope() {
        assert!("payments_read".parse::<OAuthScope>().is_err());
        assert!("".parse::<OAuthScope>().is_err());
    }

    #[test]
    fn test_required_is_subset_of_available() {
        let available = Scopes::available();
        let required = Scopes::required();
        assert!(available.covers(&required));
        assert!(required.len() < available.len());
        for scope in [
            OAuthScope::PaymentsRead,
            OAuthScope::CustomersRead,
            OAuthScope::OrdersWrite,
            OAuthScope::GiftcardsWrite,
            OAuthScope::MerchantProfileRead,
            OAuthScope::DisputesRead,
        ] {
            assert!(required.contains(&scope), "missing {scope}");
        }
    }

    #[test]
    fn test_catalog_has_no_duplicates() {
        let catalog = OAuthScope::available();
        let scopes: Scopes = catalog.clone().into();
        assert_eq!(scopes.len(), catalog.len());
    }

    #[test]
    fn test_display_joins_with_spaces_in_order() {
        let scopes: Scopes = vec![OAuthScope::PaymentsRead, OAuthScope::OrdersRead].into();
        assert_eq!(scopes.to_string(), "PAYMENTS_READ ORDERS_READ");
    }

    #[test]
    fn test_parse_accepts_commas_and_whitespace() {
        let scopes: Scopes = "PAYMENTS_READ, ORDERS_READ\tCUSTOMERS_READ".parse().unwrap();
        assert_eq!(scopes.len(), 3);
    }

    #[test]
    fn test_serde_uses_string_array() {
        let scopes: Scopes = "PAYMENTS_READ ORDERS_READ".parse().unwrap();
        let json = serde_json::to_string(&scopes).unwrap();
        assert_eq!(json, r#"["PAYMENTS_READ","ORDERS_READ"]"#);

        let restored: Scopes = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, scopes);
    }
}
