//! # Error Types
//!
//! Validation failures raised by the validated constructors in this crate.
//! Higher layers wrap these in their own `thiserror` enums.

use thiserror::Error;

/// A domain primitive failed validation at construction time.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    /// An identifier was empty after trimming.
    #[error("{kind} identifier must not be empty")]
    EmptyIdentifier {
        /// Which identifier namespace was being constructed.
        kind: &'static str,
    },

    /// An identifier contained characters outside its allowed alphabet.
    #[error("{kind} identifier {value:?} is malformed")]
    MalformedIdentifier {
        /// Which identifier namespace was being constructed.
        kind: &'static str,
        /// The rejected input.
        value: String,
    },

    /// Reward amounts must be finite and non-negative.
    #[error("reward must be a finite, non-negative ETH amount, got {0}")]
    InvalidReward(f64),

    /// A deadline fell before the bounty's creation time.
    #[error("deadline {deadline} precedes creation time {created_at}")]
    DeadlineBeforeCreation {
        /// Rendered deadline.
        deadline: String,
        /// Rendered creation time.
        created_at: String,
    },

    /// A timestamp string could not be parsed.
    #[error("invalid timestamp: {0}")]
    InvalidTimestamp(String),
}
