//! Error types and failure classification for the market data crate.
//!
//! This module provides:
//! - [`MarketDataError`]: The error enum for every fetch and parse step
//! - [`ErrorCategory`]: Classification used by the adapters' degrade policy

mod category;

pub use category::ErrorCategory;

use thiserror::Error;

/// Errors that can occur while fetching or parsing an upstream document.
///
/// Adapters never hand these to their callers. Each variant is classified
/// into an [`ErrorCategory`] via [`category`](Self::category), which is what
/// gets logged before the adapter falls back to a degraded result.
#[derive(Error, Debug)]
pub enum MarketDataError {
    /// The request to the upstream timed out.
    #[error("Timeout: {provider}")]
    Timeout {
        /// The provider that timed out
        provider: String,
    },

    /// The upstream answered with a status other than 200.
    #[error("Unexpected status from {provider}: {status}")]
    HttpStatus {
        /// The provider that returned the status
        provider: String,
        /// The HTTP status code
        status: u16,
    },

    /// The response body was not valid JSON (or not the expected JSON shape).
    #[error("Failed to decode {provider} response: {message}")]
    Decode {
        /// The provider whose response failed to decode
        provider: String,
        /// The decoder's error message
        message: String,
    },

    /// A field or column the parser requires is absent.
    #[error("Missing expected field in {provider} response: {field}")]
    MissingField {
        /// The provider whose response is missing the field
        provider: String,
        /// Path of the missing field
        field: String,
    },

    /// A field that must be numeric holds something else.
    #[error("Invalid value for {field} in {provider} response: {value}")]
    InvalidValue {
        /// The provider whose response holds the bad value
        provider: String,
        /// Path of the offending field
        field: String,
        /// The raw value, rendered as JSON
        value: String,
    },

    /// A network error occurred while communicating with the upstream.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
}

impl MarketDataError {
    /// Returns the failure category for this error.
    ///
    /// - [`ErrorCategory::Transport`]: connection failure, timeout, non-200 status
    /// - [`ErrorCategory::Decode`]: the body is not valid JSON
    /// - [`ErrorCategory::Schema`]: an expected field or column is missing
    /// - [`ErrorCategory::Value`]: a field is not numeric
    ///
    /// # Examples
    ///
    /// ```
    /// use findash_market_data::errors::{ErrorCategory, MarketDataError};
    ///
    /// let error = MarketDataError::HttpStatus { provider: "CBR".to_string(), status: 503 };
    /// assert_eq!(error.category(), ErrorCategory::Transport);
    ///
    /// let error = MarketDataError::MissingField {
    ///     provider: "CBR".to_string(),
    ///     field: "Valute.USD.Previous".to_string(),
    /// };
    /// assert_eq!(error.category(), ErrorCategory::Schema);
    /// ```
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Timeout { .. } | Self::HttpStatus { .. } | Self::Network(_) => {
                ErrorCategory::Transport
            }
            Self::Decode { .. } => ErrorCategory::Decode,
            Self::MissingField { .. } => ErrorCategory::Schema,
            Self::InvalidValue { .. } => ErrorCategory::Value,
        }
    }
}
