//! Error taxonomy for the access-control core.

use thiserror::Error;

/// Failure of the underlying persistence layer. Fatal to the current
/// operation; the core never retries on its own.
#[derive(Debug, Clone, Error)]
#[error("store unavailable: {message}")]
pub struct StoreError {
    /// Description of the store-level failure.
    pub message: String,
}

impl StoreError {
    /// Create a store error.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// The core error type.
#[derive(Debug, Clone, Error)]
pub enum CoreError {
    /// Malformed input; carries the violated constraint.
    #[error("validation failed: {constraint}")]
    Validation {
        /// The specific constraint that was violated.
        constraint: String,
    },

    /// A referenced entity does not exist.
    #[error("{resource} not found: {key}")]
    NotFound {
        /// Kind of the missing entity.
        resource: &'static str,
        /// The key that failed to resolve.
        key: String,
    },

    /// The caller lacks the capability for this action.
    #[error("forbidden: {reason}")]
    Forbidden {
        /// Why the action was refused.
        reason: String,
    },

    /// The persistence layer failed.
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl CoreError {
    /// Create a validation error.
    pub fn validation(constraint: impl Into<String>) -> Self {
        Self::Validation {
            constraint: constraint.into(),
        }
    }

    /// Create a not-found error.
    pub fn not_found(resource: &'static str, key: impl Into<String>) -> Self {
        Self::NotFound {
            resource,
            key: key.into(),
        }
    }

    /// Create a forbidden error.
    pub fn forbidden(reason: impl Into<String>) -> Self {
        Self::Forbidden {
            reason: reason.into(),
        }
    }

    /// Transport-agnostic status classification for this error.
    pub fn status_hint(&self) -> crate::StatusHint {
        match self {
            Self::Validation { .. } => crate::StatusHint::Invalid,
            Self::NotFound { .. } => crate::StatusHint::NotFound,
            Self::Forbidden { .. } => crate::StatusHint::Forbidden,
            Self::Store(_) => crate::StatusHint::Unavailable,
        }
    }

    /// Whether the caller can recover by correcting its request.
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, Self::Store(_))
    }
}

/// Result alias using [`CoreError`].
pub type CoreResult<T> = Result<T, CoreError>;
