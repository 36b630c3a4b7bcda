//! Error types for the Square gift-card SDK.
//!
//! This module contains error types used throughout the SDK for configuration
//! and validation errors.
//!
//! # Error Handling
//!
//! All configuration constructors return `Result<T, ConfigError>` to enable
//! fail-fast validation. Error messages are designed to be clear and actionable.
//!
//! # Example
//!
//! ```rust
//! use square_giftcard::{ClientId, ConfigError};
//!
//! let result = ClientId::new("");
//! assert!(matches!(result, Err(ConfigError::EmptyClientId)));
//! ```

use thiserror::Error;

/// Errors that can occur during SDK configuration.
///
/// This enum represents all possible errors that can occur when creating
/// or validating configuration types. Each variant provides a clear,
/// actionable error message.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// OAuth client ID cannot be empty.
    #[error("OAuth client ID cannot be empty. Please provide the application ID from the Square Developer Dashboard.")]
    EmptyClientId,

    /// OAuth client secret cannot be empty.
    #[error("OAuth client secret cannot be empty. Please provide the application secret from the Square Developer Dashboard.")]
    EmptyClientSecret,

    /// Access token cannot be empty.
    #[error("Access token cannot be empty. Please provide a valid Square access token.")]
    EmptyAccessToken,

    /// Location ID cannot be empty.
    #[error("Location ID cannot be empty. Please provide the Square location that owns checkout orders.")]
    EmptyLocationId,

    /// Environment name is not recognized.
    #[error("Invalid Square environment '{value}'. Expected 'sandbox' or 'production'.")]
    InvalidEnvironment {
        /// The invalid environment string that was provided.
        value: String,
    },

    /// Square-Version value is invalid.
    #[error("Invalid Square-Version '{version}'. Expected format: 'YYYY-MM-DD' (e.g., '2025-09-24').")]
    InvalidSquareVersion {
        /// The invalid version string that was provided.
        version: String,
    },

    /// A URL is invalid.
    #[error("Invalid URL '{url}'. Please provide a valid URL with scheme (e.g., 'https://myapp.example.com/callback').")]
    InvalidUrl {
        /// The invalid URL that was provided.
        url: String,
    },

    /// A numeric setting could not be parsed.
    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidValue {
        /// The setting name.
        field: &'static str,
        /// The raw value that was provided.
        value: String,
        /// Why the value was rejected.
        reason: String,
    },

    /// A required field is missing.
    #[error("Missing required field: '{field}'. This field must be set before building the configuration.")]
    MissingRequiredField {
        /// The name of the missing field.
        field: &'static str,
    },

    /// A required environment variable is not set.
    #[error("Missing Square configuration: environment variable '{var}' is not set.")]
    MissingEnvVar {
        /// The name of the missing variable.
        var: &'static str,
    },
}
