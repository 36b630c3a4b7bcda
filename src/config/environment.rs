//! Square environment selection.
//!
//! Square runs two fully separate stacks: a sandbox for development and the
//! production platform. Credentials, merchants and base URLs differ between
//! them, so the environment is fixed at configuration time.

use crate::error::ConfigError;
use std::fmt;
use std::str::FromStr;

/// The Square environment API calls are made against.
///
/// # Example
///
/// ```rust
/// use square_giftcard::Environment;
///
/// let env: Environment = "production".parse().unwrap();
/// assert_eq!(env.base_url(), "https://connect.squareup.com");
/// assert_eq!(Environment::default(), Environment::Sandbox);
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Environment {
    /// The Square sandbox (`connect.squareupsandbox.com`).
    #[default]
    Sandbox,
    /// The Square production platform (`connect.squareup.com`).
    Production,
}

impl Environment {
    /// Returns the API base URL for this environment.
    ///
    /// OAuth endpoints (`/oauth2/...`) and the Checkout API (`/v2/...`)
    /// share the same host.
    #[must_use]
    pub const fn base_url(&self) -> &'static str {
        match self {
            Self::Sandbox => "https://connect.squareupsandbox.com",
            Self::Production => "https://connect.squareup.com",
        }
    }

    /// Returns `true` for [`Environment::Production`].
    #[must_use]
    pub const fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sandbox => f.write_str("sandbox"),
            Self::Production => f.write_str("production"),
        }
    }
}

impl FromStr for Environment {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sandbox" => Ok(Self::Sandbox),
            "production" => Ok(Self::Production),
            _ => Err(ConfigError::InvalidEnvironment {
                value: s.to_string(),
            }),
        }
    }
}
