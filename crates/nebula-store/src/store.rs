//! # Store Contract
//!
//! The async interface the rest of the stack uses to load and commit
//! bounty and chat records.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::broadcast;

use nebula_core::{ActorId, BountyId, MessageId, Timestamp, ValidationError};
use nebula_state::{Bounty, BountyStatus, NewBounty};

// -- Errors -------------------------------------------------------------------

/// Errors returned by a [`BountyStore`].
#[derive(Error, Debug, Clone, PartialEq)]
pub enum StoreError {
    /// No bounty with this id.
    #[error("bounty {0} not found")]
    NotFound(BountyId),

    /// The persisted status no longer matches the status the caller
    /// observed when it validated the transition.
    #[error("bounty {id} changed status: expected {expected}, found {actual}")]
    StatusChanged {
        id: BountyId,
        expected: BountyStatus,
        actual: BountyStatus,
    },

    /// A write would leave an open bounty with an assigned worker.
    #[error("bounty {0} cannot be open with an assigned worker")]
    WorkerOnOpenBounty(BountyId),

    /// Chat messages must carry content.
    #[error("chat message content must not be empty")]
    EmptyMessage,

    /// The record failed domain validation.
    #[error("invalid record: {0}")]
    InvalidRecord(#[from] ValidationError),

    /// The backing store could not serve the request.
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

// -- Records ------------------------------------------------------------------

/// Which side of a bounty an actor is on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActorRole {
    /// Matches `creator_id`.
    Creator,
    /// Matches `worker_id`.
    Worker,
}

impl ActorRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Creator => "creator",
            Self::Worker => "worker",
        }
    }
}

impl std::fmt::Display for ActorRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ActorRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "creator" => Ok(Self::Creator),
            "worker" => Ok(Self::Worker),
            other => Err(format!("unknown actor role: {other:?}")),
        }
    }
}

/// A chat message attached to a bounty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: MessageId,
    pub bounty_id: BountyId,
    pub sender_id: ActorId,
    pub content: String,
    pub timestamp: Timestamp,
}

// -- Trait --------------------------------------------------------------------

/// Persistence contract for bounties and their chat.
///
/// Implementations must make every write atomic with respect to concurrent
/// readers and writers. A write whose precondition fails leaves the record
/// untouched.
#[async_trait]
pub trait BountyStore: Send + Sync {
    /// Load a single bounty. `Ok(None)` when the id is unknown.
    async fn load_bounty(&self, id: &BountyId) -> Result<Option<Bounty>, StoreError>;

    /// Bounties where `actor` holds `role`, in creation order.
    async fn load_bounties_for_actor(
        &self,
        actor: &ActorId,
        role: ActorRole,
    ) -> Result<Vec<Bounty>, StoreError>;

    /// Bounties currently in `status`, in creation order.
    async fn load_bounties_by_status(&self, status: BountyStatus)
        -> Result<Vec<Bounty>, StoreError>;

    /// Every bounty, in creation order.
    async fn list_bounties(&self) -> Result<Vec<Bounty>, StoreError>;

    /// Assign an id and creation time, and persist a new `open` bounty.
    async fn create_bounty(&self, new: NewBounty) -> Result<Bounty, StoreError>;

    /// Overwrite the status of a bounty. A `worker` of `None` keeps the
    /// existing worker.
    ///
    /// This is the unconditional write. Lifecycle moves go through
    /// [`BountyStore::commit_transition`].
    async fn update_bounty_status(
        &self,
        id: &BountyId,
        status: BountyStatus,
        worker: Option<ActorId>,
    ) -> Result<Bounty, StoreError>;

    /// Commit a validated transition, provided the persisted status still
    /// equals `expected`. Otherwise fails with [`StoreError::StatusChanged`]
    /// and leaves the record untouched.
    async fn commit_transition(
        &self,
        id: &BountyId,
        expected: BountyStatus,
        to: BountyStatus,
        worker: Option<ActorId>,
    ) -> Result<Bounty, StoreError>;

    /// Messages for a bounty, oldest first.
    async fn messages_for_bounty(&self, id: &BountyId) -> Result<Vec<ChatMessage>, StoreError>;

    /// Append a message to an existing bounty's chat and notify subscribers.
    async fn send_message(
        &self,
        bounty: &BountyId,
        sender: &ActorId,
        content: String,
    ) -> Result<ChatMessage, StoreError>;

    /// Receive every message written after this call.
    fn subscribe_messages(&self) -> broadcast::Receiver<ChatMessage>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn actor_role_parses() {
        assert_eq!("creator".parse::<ActorRole>().unwrap(), ActorRole::Creator);
        assert_eq!("worker".parse::<ActorRole>().unwrap(), ActorRole::Worker);
        assert!("owner".parse::<ActorRole>().is_err());
    }

    #[test]
    fn chat_message_serializes_ids_as_strings() {
        let message = ChatMessage {
            id: MessageId::new(),
            bounty_id: BountyId::new("bounty2").unwrap(),
            sender_id: ActorId::new("user1").unwrap(),
            content: "Preview is up.".into(),
            timestamp: Timestamp::parse("2025-01-16T10:42:00Z").unwrap(),
        };
        let json = serde_json::to_value(&message).unwrap();
        assert_eq!(json["bounty_id"], "bounty2");
        assert_eq!(json["sender_id"], "user1");
        assert_eq!(json["content"], "Preview is up.");

        let back: ChatMessage = serde_json::from_value(json).unwrap();
        assert_eq!(back, message);
        assert!(serde_json::from_str::<ActorRole>("\"worker\"").is_ok());
    }

    #[test]
    fn status_changed_names_both_states() {
        let err = StoreError::StatusChanged {
            id: BountyId::sequential(3),
            expected: BountyStatus::PendingReview,
            actual: BountyStatus::Completed,
        };
        assert_eq!(
            err.to_string(),
            "bounty bounty3 changed status: expected pending-review, found completed"
        );
    }
}
