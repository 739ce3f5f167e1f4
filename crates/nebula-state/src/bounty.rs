//! # Bounty Records
//!
//! The bounty entity and its pure transition function.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use nebula_core::{ActorId, BountyId, Reward, Timestamp, ValidationError};

use crate::lifecycle::{BountyStatus, Guard, SideEffect};

// ─── Errors ──────────────────────────────────────────────────────────

/// Errors produced by the lifecycle state machine.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LifecycleError {
    /// The `(from, to)` pair is not an edge of the transition table.
    #[error("invalid bounty transition: {from} -> {to}")]
    InvalidTransition {
        /// Current state.
        from: BountyStatus,
        /// Attempted target state.
        to: BountyStatus,
    },

    /// The edge exists but the acting actor does not satisfy its guard.
    #[error("{actor} may not move a bounty from {from} to {to}: requires {guard}")]
    GuardRejected {
        /// Current state.
        from: BountyStatus,
        /// Attempted target state.
        to: BountyStatus,
        /// The actor that attempted the transition.
        actor: ActorId,
        /// The guard that rejected it.
        guard: Guard,
    },
}

// ─── New Bounty ──────────────────────────────────────────────────────

/// The caller-supplied fields of a bounty. The store assigns `id` and
/// `created_at`; the status always starts at `open`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewBounty {
    pub title: String,
    pub description: String,
    pub reward: Reward,
    pub deadline: Option<Timestamp>,
    pub creator_id: ActorId,
    #[serde(default)]
    pub tags: BTreeSet<String>,
}

// ─── Bounty ──────────────────────────────────────────────────────────

/// A task record with a reward and a lifecycle status.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bounty {
    /// Unique identifier, assigned by the store.
    pub id: BountyId,
    pub title: String,
    pub description: String,
    pub reward: Reward,
    /// Current lifecycle state.
    pub status: BountyStatus,
    /// Immutable creation time.
    pub created_at: Timestamp,
    /// Optional deadline, never before `created_at`.
    pub deadline: Option<Timestamp>,
    /// Immutable creator reference.
    pub creator_id: ActorId,
    /// Set on the transition into `in-progress` and never cleared.
    pub worker_id: Option<ActorId>,
    pub tags: BTreeSet<String>,
}

impl Bounty {
    /// Build a freshly created bounty in the `open` state.
    ///
    /// Rejects a deadline that precedes `created_at`.
    pub fn open(id: BountyId, created_at: Timestamp, new: NewBounty) -> Result<Self, ValidationError> {
        if let Some(deadline) = new.deadline {
            if deadline < created_at {
                return Err(ValidationError::DeadlineBeforeCreation {
                    deadline: deadline.to_iso8601(),
                    created_at: created_at.to_iso8601(),
                });
            }
        }
        Ok(Self {
            id,
            title: new.title,
            description: new.description,
            reward: new.reward,
            status: BountyStatus::Open,
            created_at,
            deadline: new.deadline,
            creator_id: new.creator_id,
            worker_id: None,
            tags: new.tags,
        })
    }

    /// Apply the transition `self.status → to` on behalf of `actor`.
    ///
    /// Returns the updated bounty without touching `self`. Fails with
    /// [`LifecycleError::InvalidTransition`] for pairs outside the table and
    /// [`LifecycleError::GuardRejected`] when the actor lacks the role the
    /// edge requires.
    pub fn transition(&self, to: BountyStatus, actor: &ActorId) -> Result<Bounty, LifecycleError> {
        let from = self.status;
        let edge = from
            .edge_to(to)
            .ok_or(LifecycleError::InvalidTransition { from, to })?;

        if !edge
            .guard
            .permits(actor, &self.creator_id, self.worker_id.as_ref())
        {
            return Err(LifecycleError::GuardRejected {
                from,
                to,
                actor: actor.clone(),
                guard: edge.guard,
            });
        }

        let mut next = self.clone();
        next.status = to;
        if edge.effect == SideEffect::AssignWorker {
            next.worker_id = Some(actor.clone());
        }
        Ok(next)
    }

    /// Whether `actor` is the creator of this bounty.
    pub fn is_creator(&self, actor: &ActorId) -> bool {
        &self.creator_id == actor
    }

    /// Whether `actor` is the assigned worker.
    pub fn is_worker(&self, actor: &ActorId) -> bool {
        self.worker_id.as_ref() == Some(actor)
    }

    /// Whether the reward has been marked payable.
    pub fn reward_payable(&self) -> bool {
        self.status == BountyStatus::Completed
    }

    /// `worker_id` must be unset while the bounty is open.
    pub fn satisfies_worker_invariant(&self) -> bool {
        self.status != BountyStatus::Open || self.worker_id.is_none()
    }
}

// ─── Tests ───────────────────────────────────────────────────────────
