//! Error types for the decision engine.

use thiserror::Error;

/// Result type for engine operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors surfaced by the decision engine and its collaborators.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// The adjustment expression could not be parsed.
    #[error("invalid adjustment: {adjustment}")]
    BadAdjustment {
        /// The expression that failed to parse.
        adjustment: String,
    },

    /// Schedule removal targeted a schedule that is not active.
    #[error("active schedule not found")]
    ActiveScheduleNotFound,

    /// The platform instance-control client failed.
    #[error("platform error: {message}")]
    Platform {
        /// Description of the platform failure.
        message: String,
    },

    /// A policy or history store operation failed.
    #[error("store error: {message}")]
    Store {
        /// Description of the store failure.
        message: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_bad_adjustment() {
        let err = Error::BadAdjustment {
            adjustment: "abc".into(),
        };
        assert_eq!(err.to_string(), "invalid adjustment: abc");
    }

    #[test]
    fn error_display_active_schedule_not_found() {
        assert_eq!(
            Error::ActiveScheduleNotFound.to_string(),
            "active schedule not found"
        );
    }

    #[test]
    fn error_display_platform() {
        let err = Error::Platform {
            message: "connection refused".into(),
        };
        assert_eq!(err.to_string(), "platform error: connection refused");
    }

    #[test]
    fn error_clone_and_eq() {
        let err1 = Error::Store {
            message: "timeout".into(),
        };
        let err2 = err1.clone();
        assert_eq!(err1, err2);
    }
}
