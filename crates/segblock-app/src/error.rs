//! Errors reported at the presentation boundary.

use segblock_core::RuleError;
use segblock_storage::StorageError;
use thiserror::Error;

/// Why a user action failed.
///
/// None of these are fatal: adapters turn them into a [`Notice`](crate::Notice)
/// and leave their state unchanged so the user can retry.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// The URL was empty or could not be parsed. Nothing was persisted.
    #[error(transparent)]
    InvalidUrl(RuleError),

    /// The rule values were rejected. Nothing was persisted.
    #[error(transparent)]
    InvalidRule(RuleError),

    /// Reading or writing the rule list failed. The prior state is kept.
    #[error("persistence failure: {0}")]
    Persistence(StorageError),

    /// The referenced rule does not exist (stale index or unknown host).
    #[error("not found: {0}")]
    NotFound(String),
}

impl From<RuleError> for ServiceError {
    fn from(err: RuleError) -> Self {
        if err.is_invalid_url() {
            ServiceError::InvalidUrl(err)
        } else {
            ServiceError::InvalidRule(err)
        }
    }
}

impl From<StorageError> for ServiceError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::NotFound(what) => ServiceError::NotFound(what),
            other => ServiceError::Persistence(other),
        }
    }
}

/// Result type for service operations.
pub type Result<T> = std::result::Result<T, ServiceError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn storage_not_found_maps_to_not_found() {
        let err: ServiceError = StorageError::NotFound("index 3".into()).into();
        assert!(matches!(err, ServiceError::NotFound(ref what) if what == "index 3"));
    }

    #[test]
    fn other_storage_errors_are_persistence() {
        let err: ServiceError = StorageError::Unavailable("quota".into()).into();
        assert!(matches!(err, ServiceError::Persistence(_)));
    }

    #[test]
    fn url_errors_are_invalid_url() {
        let err: ServiceError = RuleError::EmptyUrl.into();
        assert!(matches!(err, ServiceError::InvalidUrl(RuleError::EmptyUrl)));
        assert_eq!(err.to_string(), "empty URL");

        let err: ServiceError = RuleError::InvalidUrl("x".into()).into();
        assert!(matches!(err, ServiceError::InvalidUrl(_)));
    }

    #[test]
    fn other_rule_errors_are_invalid_rule() {
        let err: ServiceError = RuleError::InvalidSegments(5).into();
        assert!(matches!(err, ServiceError::InvalidRule(RuleError::InvalidSegments(5))));

        let err: ServiceError = RuleError::InvalidRule {
            url: "example.com".into(),
            reason: "bad".into(),
        }
        .into();
        assert!(matches!(err, ServiceError::InvalidRule(_)));
    }
}
