//! Idempotency keys for Payment Link creation.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::checkout::error::PaymentLinksError;

/// Longest key Square accepts.
pub const MAX_IDEMPOTENCY_KEY_LENGTH: usize = 192;

/// Key Square uses to deduplicate creation requests.
///
/// [`IdempotencyKey::new`] generates a fresh UUID v4. Reuse a key only for a
/// true retry of an identical request.
///
/// # Example
///
/// ```rust
/// use square_giftcard::checkout::IdempotencyKey;
///
/// let a = IdempotencyKey::new();
/// let b = IdempotencyKey::new();
/// assert_ne!(a, b);
///
/// let stored: IdempotencyKey = "order-1234-attempt".parse().unwrap();
/// assert_eq!(stored.as_ref(), "order-1234-attempt");
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IdempotencyKey(String);

impl IdempotencyKey {
    /// Generates a fresh random key.
    #[must_use]
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }
}

impl Default for IdempotencyKey {
    fn default() -> Self {
        Self::new()
    }
}

impl std::str::FromStr for IdempotencyKey {
    type Err = PaymentLinksError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = |reason: &str| PaymentLinksError::InvalidInput {
            field: "idempotency_key",
            reason: reason.to_string(),
        };

        if s.trim().is_empty() {
            return Err(invalid("must not be empty"));
        }
        if s.len() > MAX_IDEMPOTENCY_KEY_LENGTH {
            return Err(invalid("must be at most 192 characters"));
        }
        Ok(Self(s.to_string()))
    }
}

impl AsRef<str> for IdempotencyKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for IdempotencyKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
