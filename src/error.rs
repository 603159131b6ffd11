// ⚠️ Errors - what a rejected operation looks like
//
// Every core operation is all-or-nothing: when one of these comes back,
// no state was touched.

use crate::friend::FriendId;
use thiserror::Error;

// ============================================================================
// VALIDATION ERROR
// ============================================================================

/// A single rejected input field
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{field}: {message}")]
pub struct ValidationError {
    pub field: String,
    pub message: String,
}

impl ValidationError {
    pub fn new(field: &str, message: impl Into<String>) -> Self {
        ValidationError {
            field: field.to_string(),
            message: message.into(),
        }
    }
}

// ============================================================================
// SPLIT ERROR
// ============================================================================

#[derive(Debug, Clone, PartialEq, Error)]
pub enum SplitError {
    /// User input rejected; recoverable by correcting the input
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationError),

    /// Balance update aimed at an id the registry never saw
    #[error("friend not found: {0}")]
    NotFound(FriendId),

    /// Split-form operation while no friend is selected
    #[error("no friend selected")]
    NoSelection,

    /// Add-friend submit while the form is not shown
    #[error("add friend form is closed")]
    FormClosed,
}

impl SplitError {
    pub fn validation(field: &str, message: impl Into<String>) -> Self {
        SplitError::Validation(ValidationError::new(field, message))
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, SplitError::Validation(_))
    }
}

pub type SplitResult<T> = Result<T, SplitError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error_display() {
        let err = ValidationError::new("name", "Friend name is required");
        assert_eq!(err.to_string(), "name: Friend name is required");
    }

    #[test]
    fn test_split_error_from_validation() {
        let err: SplitError = ValidationError::new("bill_total", "Bill value is required").into();
        assert!(err.is_validation());
        assert_eq!(
            err.to_string(),
            "validation failed: bill_total: Bill value is required"
        );
    }

    #[test]
    fn test_not_found_display() {
        let err = SplitError::NotFound(FriendId::from("42"));
        assert!(!err.is_validation());
        assert_eq!(err.to_string(), "friend not found: 42");
    }
}
