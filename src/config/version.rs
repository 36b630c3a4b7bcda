//! Square API version definitions.
//!
//! Square versions its API by release date and selects the version per
//! request through the `Square-Version` header. This module provides the
//! [`SquareVersion`] type holding that header value.

use crate::error::ConfigError;
use std::fmt;
use std::str::FromStr;

/// A Square API version (`YYYY-MM-DD`).
///
/// # Example
///
/// ```rust
/// use square_giftcard::SquareVersion;
///
/// let version: SquareVersion = "2025-09-24".parse().unwrap();
/// assert_eq!(version, SquareVersion::latest());
/// assert_eq!(version.to_string(), "2025-09-24");
///
/// assert!("2025-9-24".parse::<SquareVersion>().is_err());
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SquareVersion(String);

impl SquareVersion {
    /// The newest version this SDK's request shapes were written against.
    const LATEST: &'static str = "2025-09-24";

    /// Returns the latest version known to this SDK.
    #[must_use]
    pub fn latest() -> Self {
        Self(Self::LATEST.to_string())
    }

    /// Returns the header value.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    fn is_valid(value: &str) -> bool {
        let bytes = value.as_bytes();
        if bytes.len() != 10 || bytes[4] != b'-' || bytes[7] != b'-' {
            return false;
        }
        let digits_ok = value
            .char_indices()
            .filter(|(i, _)| *i != 4 && *i != 7)
            .all(|(_, c)| c.is_ascii_digit());
        if !digits_ok {
            return false;
        }

        let month: u32 = value[5..7].parse().unwrap_or(0);
        let day: u32 = value[8..10].parse().unwrap_or(0);
        (1..=12).contains(&month) && (1..=31).contains(&day)
    }
}

impl Default for SquareVersion {
    fn default() -> Self {
        Self::latest()
    }
}

impl fmt::Display for SquareVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for SquareVersion {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if Self::is_valid(trimmed) {
            Ok(Self(trimmed.to_string()))
        } else {
            Err(ConfigError::InvalidSquareVersion {
                version: s.to_string(),
            })
        }
    }
}
