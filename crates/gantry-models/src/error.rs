//! Error types for model validation.

use thiserror::Error;

/// Result type for model operations.
pub type Result<T> = std::result::Result<T, ModelError>;

/// Errors produced when validating model types.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ModelError {
    /// Invalid scaling policy configuration.
    #[error("invalid scaling policy: {reason}")]
    InvalidPolicy {
        /// Description of why the policy is invalid.
        reason: String,
    },

    /// Invalid active schedule configuration.
    #[error("invalid active schedule: {reason}")]
    InvalidSchedule {
        /// Description of why the schedule is invalid.
        reason: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_invalid_policy() {
        let err = ModelError::InvalidPolicy {
            reason: "min > max".into(),
        };
        assert_eq!(err.to_string(), "invalid scaling policy: min > max");
    }

    #[test]
    fn error_display_invalid_schedule() {
        let err = ModelError::InvalidSchedule {
            reason: "max must be at least min".into(),
        };
        assert_eq!(
            err.to_string(),
            "invalid active schedule: max must be at least min"
        );
    }

    #[test]
    fn error_clone_and_eq() {
        let err1 = ModelError::InvalidPolicy {
            reason: "bad".into(),
        };
        let err2 = err1.clone();
        assert_eq!(err1, err2);
    }
}
