//! Core error types.

use thiserror::Error;

/// Errors raised while turning user input into a block rule.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RuleError {
    /// The URL input was empty.
    #[error("empty URL")]
    EmptyUrl,

    /// The URL input could not be parsed into a hostname.
    #[error("invalid URL: {0}")]
    InvalidUrl(String),

    /// The segment count is not one of the allowed values.
    #[error("invalid segment count: {0} (allowed: 2, 4, 6, 8, 12)")]
    InvalidSegments(u32),

    /// A persisted rule breaks one of the rule invariants.
    #[error("invalid rule for {url}: {reason}")]
    InvalidRule {
        /// Host of the offending rule.
        url: String,
        /// What was wrong with it.
        reason: String,
    },
}

impl RuleError {
    /// Returns true for both flavours of bad URL input.
    pub fn is_invalid_url(&self) -> bool {
        matches!(self, RuleError::EmptyUrl | RuleError::InvalidUrl(_))
    }
}

/// Errors delivering a rule update to the enforcement component.
#[derive(Debug, Error)]
pub enum SyncError {
    /// Nobody is listening for rule updates.
    #[error("no listener for rule updates")]
    NoListener,

    /// The update message could not be encoded.
    #[error("failed to encode rule update: {0}")]
    Encode(#[from] serde_json::Error),

    /// The update could not be written out.
    #[error("failed to write rule update: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for rule construction.
pub type Result<T> = std::result::Result<T, RuleError>;
