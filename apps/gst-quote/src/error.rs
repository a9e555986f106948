//! # Quote Error Types
//!
//! Failures at the app boundary: configuration and arguments. Pricing
//! failures come up from tripund-core as [`CoreError`].

use thiserror::Error;
use tripund_core::CoreError;

/// Result type alias for gst-quote operations.
pub type QuoteResult<T> = Result<T, QuoteError>;

#[derive(Debug, Error)]
pub enum QuoteError {
    // =========================================================================
    // Configuration Errors
    // =========================================================================
    /// Invalid configuration value.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Config file exists but could not be read.
    #[error("Failed to read config: {0}")]
    Io(#[from] std::io::Error),

    /// Config file is not valid TOML for this schema.
    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    // =========================================================================
    // Argument Errors
    // =========================================================================
    /// State code not in the jurisdiction table.
    #[error("Unknown state code: '{0}'. Run `gst-quote states` for the list.")]
    UnknownState(String),

    // =========================================================================
    // Pricing Errors
    // =========================================================================
    #[error("Unable to calculate tax: {0}")]
    Pricing(#[from] CoreError),
}
