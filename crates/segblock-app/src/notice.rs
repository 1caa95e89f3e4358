//! Transient user-facing notices.
//!
//! Every outcome of a save or delete becomes one short message, the way the
//! popup shows a toast. Adapters decide how to render it.

use std::fmt;

use segblock_core::RuleError;

use crate::error::ServiceError;
use crate::service::Applied;

/// Whether a notice reports success or failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Success,
    Error,
}

/// A message for the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub message: String,
}

impl Notice {
    /// A success notice.
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Success,
            message: message.into(),
        }
    }

    /// An error notice.
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Error,
            message: message.into(),
        }
    }

    /// True for error notices.
    pub fn is_error(&self) -> bool {
        self.kind == NoticeKind::Error
    }

    /// Notice for the outcome of a save.
    pub fn for_save(result: &Result<Applied, ServiceError>) -> Self {
        match result {
            Ok(_) => Self::success("Block rule saved successfully!"),
            Err(e) => Self::for_error(e, "Failed to save block rule"),
        }
    }

    /// Notice for the outcome of clearing every rule.
    pub fn for_clear<T>(result: &Result<T, ServiceError>) -> Self {
        match result {
            Ok(_) => Self::success("All block rules cleared"),
            Err(e) => Self::for_error(e, "Failed to clear block rules"),
        }
    }

    /// Notice for the outcome of a delete.
    pub fn for_delete(result: &Result<Applied, ServiceError>) -> Self {
        match result {
            Ok(_) => Self::success("Block rule deleted"),
            Err(e) => Self::for_error(e, "Failed to delete block rule"),
        }
    }

    fn for_error(err: &ServiceError, failure_message: &str) -> Self {
        match err {
            ServiceError::InvalidUrl(RuleError::EmptyUrl) => {
                Self::error("Please enter a website URL")
            }
            ServiceError::InvalidUrl(_) => Self::error("Please enter a valid URL"),
            ServiceError::InvalidRule(_) | ServiceError::Persistence(_) => {
                Self::error(failure_message)
            }
            ServiceError::NotFound(_) => Self::error("Block rule not found"),
        }
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}
