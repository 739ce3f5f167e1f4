//! # Interpretation Errors
//!
//! Every failure a command can end in. None is fatal: the interpreter
//! renders each into a response string.

use thiserror::Error;

use nebula_core::BountyId;
use nebula_state::{BountyStatus, LifecycleError};
use nebula_store::StoreError;

use crate::authorization::Denial;
use crate::extract::ExtractionError;
use crate::intent::Intent;

/// Failure of one command.
#[derive(Error, Debug)]
pub enum InterpretError {
    /// A required parameter was missing or invalid.
    #[error(transparent)]
    Extraction(#[from] ExtractionError),

    /// The actor may not run this command against this target.
    #[error(transparent)]
    NotAuthorized(#[from] Denial),

    /// The lifecycle table or the committed status rejected the move.
    #[error("bounty {bounty_id} cannot move from {current} to {attempted}")]
    InvalidTransition {
        bounty_id: BountyId,
        title: String,
        current: BountyStatus,
        attempted: BountyStatus,
    },

    /// The intent is recognized but has no command-driven action.
    #[error("{intent} is not supported via commands")]
    Unsupported {
        intent: Intent,
        bounty_id: Option<BountyId>,
    },

    /// The store failed.
    #[error("store failure: {0}")]
    Internal(#[from] StoreError),
}

impl InterpretError {
    /// Stable machine-readable kind. Labels the `command refused` log line
    /// and `nebula_commands_refused_total`.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Extraction(_) => "extraction",
            Self::NotAuthorized(_) => "not_authorized",
            Self::InvalidTransition { .. } => "invalid_transition",
            Self::Unsupported { .. } => "unsupported",
            Self::Internal(_) => "internal",
        }
    }
}

/// Failure of a lifecycle transition committed through
/// [`crate::dispatch::transition_bounty`].
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TransitionError {
    /// No bounty with this id.
    #[error("bounty {0} not found")]
    NotFound(BountyId),

    /// The state machine refused the move.
    #[error(transparent)]
    Rejected(#[from] LifecycleError),

    /// The status changed between load and commit.
    #[error("bounty {id} is now {actual}, expected {expected}")]
    Stale {
        id: BountyId,
        expected: BountyStatus,
        actual: BountyStatus,
    },

    /// The store failed.
    #[error(transparent)]
    Store(StoreError),
}

impl From<StoreError> for TransitionError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::StatusChanged {
                id,
                expected,
                actual,
            } => Self::Stale {
                id,
                expected,
                actual,
            },
            StoreError::NotFound(id) => Self::NotFound(id),
            other => Self::Store(other),
        }
    }
}
