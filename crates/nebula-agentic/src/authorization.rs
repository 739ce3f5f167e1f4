//! # Authorization
//!
//! Who may run which command. State-changing intents need a logged-in
//! actor; `approve` additionally needs the actor to be the target's
//! creator. Lifecycle guards are enforced again by the state machine at
//! dispatch.

use thiserror::Error;

use nebula_core::{ActorId, BountyId};
use nebula_state::Bounty;

use crate::intent::Intent;

/// Reason a command was refused before dispatch.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Denial {
    /// No actor is logged in.
    #[error("login required to {intent}")]
    NotLoggedIn { intent: Intent },

    /// The actor is not the creator of the target, or the target does not
    /// exist. The two are reported identically.
    #[error("bounty {bounty_id} is not owned by the caller or does not exist")]
    NotOwner { bounty_id: BountyId },
}

/// The acting actor, or [`Denial::NotLoggedIn`].
pub fn require_actor(actor: Option<&ActorId>, intent: Intent) -> Result<&ActorId, Denial> {
    actor.ok_or(Denial::NotLoggedIn { intent })
}

/// The target bounty, provided it exists and `actor` created it.
pub fn require_creator(
    actor: &ActorId,
    bounty_id: &BountyId,
    bounty: Option<Bounty>,
) -> Result<Bounty, Denial> {
    match bounty {
        Some(bounty) if bounty.is_creator(actor) => Ok(bounty),
        _ => Err(Denial::NotOwner {
            bounty_id: bounty_id.clone(),
        }),
    }
}
