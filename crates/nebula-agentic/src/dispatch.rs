//! # Action Dispatch
//!
//! Executes extracted commands against the store. Every state change goes
//! through [`transition_bounty`]: the state machine validates the move,
//! then the store commits it with the observed status as precondition.

use std::collections::BTreeSet;

use nebula_core::{ActorId, BountyId};
use nebula_state::{Bounty, BountyStatus, LifecycleError, NewBounty};
use nebula_store::{ActorRole, BountyStore};

use crate::authorization::{require_actor, require_creator, Denial};
use crate::error::{InterpretError, TransitionError};
use crate::extract::{CreateParams, Parameters};
use crate::intent::Intent;

/// Tags attached to every command-created bounty.
pub const GENERATED_TAGS: [&str; 2] = ["generated", "nebula-ai"];

/// Result of a successfully dispatched command.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Created(Bounty),
    /// The actor's bounties, each list ordered by status.
    Status {
        created: Vec<Bounty>,
        working: Vec<Bounty>,
    },
    Approved(Bounty),
    Unrecognized,
}

// ---------------------------------------------------------------------------
// Transitions
// ---------------------------------------------------------------------------

/// Validate `bounty.status → to` for `actor` and commit it.
///
/// The commit fails with [`TransitionError::Stale`] if the persisted status
/// no longer equals the status `bounty` was loaded with.
pub async fn transition_bounty(
    store: &dyn BountyStore,
    bounty: &Bounty,
    to: BountyStatus,
    actor: &ActorId,
) -> Result<Bounty, TransitionError> {
    let next = bounty.transition(to, actor).map_err(|err| {
        tracing::warn!(bounty_id = %bounty.id, actor = %actor, error = %err, "transition rejected");
        err
    })?;
    let assigned = (next.worker_id != bounty.worker_id)
        .then(|| next.worker_id.clone())
        .flatten();

    let committed = store
        .commit_transition(&bounty.id, bounty.status, to, assigned)
        .await?;

    metrics::counter!("nebula_transitions_total", "to" => to.as_str()).increment(1);
    tracing::info!(
        bounty_id = %committed.id,
        actor = %actor,
        from = %bounty.status,
        to = %committed.status,
        "transition committed"
    );
    Ok(committed)
}

/// Load `id` and run [`transition_bounty`] on it.
pub async fn transition_by_id(
    store: &dyn BountyStore,
    id: &BountyId,
    to: BountyStatus,
    actor: &ActorId,
) -> Result<Bounty, TransitionError> {
    let bounty = store
        .load_bounty(id)
        .await?
        .ok_or_else(|| TransitionError::NotFound(id.clone()))?;
    transition_bounty(store, &bounty, to, actor).await
}

// ---------------------------------------------------------------------------
// Dispatcher
// ---------------------------------------------------------------------------

/// Runs one command's parameters against the store on behalf of an actor.
pub struct Dispatcher<'a> {
    store: &'a dyn BountyStore,
}

impl<'a> Dispatcher<'a> {
    pub fn new(store: &'a dyn BountyStore) -> Self {
        Self { store }
    }

    pub async fn dispatch(
        &self,
        input: &str,
        params: Parameters,
        actor: Option<&ActorId>,
    ) -> Result<Outcome, InterpretError> {
        match params {
            Parameters::Create(params) => self.create(input, params, actor).await,
            Parameters::Check => self.check(actor).await,
            Parameters::Approve { bounty_id } => self.approve(&bounty_id, actor).await,
            Parameters::Reject { bounty_id } => Err(InterpretError::Unsupported {
                intent: Intent::Reject,
                bounty_id,
            }),
            Parameters::Update => Err(InterpretError::Unsupported {
                intent: Intent::Update,
                bounty_id: None,
            }),
            Parameters::Other => Ok(Outcome::Unrecognized),
        }
    }

    async fn create(
        &self,
        input: &str,
        params: CreateParams,
        actor: Option<&ActorId>,
    ) -> Result<Outcome, InterpretError> {
        let actor = require_actor(actor, Intent::Create)?;
        let bounty = self
            .store
            .create_bounty(NewBounty {
                title: params.title,
                description: format!("Created via Nebula AI: \"{input}\""),
                reward: params.reward,
                deadline: Some(params.deadline),
                creator_id: actor.clone(),
                tags: GENERATED_TAGS.iter().map(|t| t.to_string()).collect::<BTreeSet<_>>(),
            })
            .await?;
        tracing::info!(bounty_id = %bounty.id, actor = %actor, reward = %bounty.reward, "bounty created");
        Ok(Outcome::Created(bounty))
    }

    async fn check(&self, actor: Option<&ActorId>) -> Result<Outcome, InterpretError> {
        let actor = require_actor(actor, Intent::Check)?;
        let mut created = self
            .store
            .load_bounties_for_actor(actor, ActorRole::Creator)
            .await?;
        let mut working = self
            .store
            .load_bounties_for_actor(actor, ActorRole::Worker)
            .await?;
        created.sort_by_key(|b| b.status);
        working.sort_by_key(|b| b.status);
        Ok(Outcome::Status { created, working })
    }

    async fn approve(
        &self,
        bounty_id: &BountyId,
        actor: Option<&ActorId>,
    ) -> Result<Outcome, InterpretError> {
        let actor = require_actor(actor, Intent::Approve)?;
        let loaded = self.store.load_bounty(bounty_id).await?;
        let bounty = require_creator(actor, bounty_id, loaded)?;

        let approved = transition_bounty(self.store, &bounty, BountyStatus::Completed, actor)
            .await
            .map_err(|err| approval_error(&bounty, err))?;
        Ok(Outcome::Approved(approved))
    }
}

fn approval_error(bounty: &Bounty, err: TransitionError) -> InterpretError {
    let mismatch = |current: BountyStatus| InterpretError::InvalidTransition {
        bounty_id: bounty.id.clone(),
        title: bounty.title.clone(),
        current,
        attempted: BountyStatus::Completed,
    };
    match err {
        TransitionError::Rejected(LifecycleError::InvalidTransition { from, .. }) => mismatch(from),
        TransitionError::Stale { actual, .. } => mismatch(actual),
        TransitionError::Rejected(LifecycleError::GuardRejected { .. })
        | TransitionError::NotFound(_) => Denial::NotOwner {
            bounty_id: bounty.id.clone(),
        }
        .into(),
        TransitionError::Store(err) => InterpretError::Internal(err),
    }
}
