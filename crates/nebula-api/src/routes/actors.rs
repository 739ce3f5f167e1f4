//! # Actor API
//!
//! Bounties an actor created or is working on.

use axum::extract::{Path, Query, State};
use axum::routing::get;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};

use nebula_core::ActorId;
use nebula_state::Bounty;
use nebula_store::ActorRole;

use crate::error::AppError;
use crate::state::AppState;

#[derive(Debug, Deserialize, Default)]
pub struct RoleParams {
    /// `creator` or `worker`. Both lists when absent.
    pub role: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ActorBounties {
    pub created: Vec<Bounty>,
    pub working: Vec<Bounty>,
}

pub fn router() -> Router<AppState> {
    Router::new().route("/v1/actors/{id}/bounties", get(actor_bounties))
}

/// GET /v1/actors/{id}/bounties?role=creator|worker
async fn actor_bounties(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(params): Query<RoleParams>,
) -> Result<Json<ActorBounties>, AppError> {
    let actor = ActorId::new(id)?;
    let role = params
        .role
        .as_deref()
        .map(str::parse::<ActorRole>)
        .transpose()
        .map_err(AppError::Validation)?;

    let created = match role {
        None | Some(ActorRole::Creator) => {
            state
                .store
                .load_bounties_for_actor(&actor, ActorRole::Creator)
                .await?
        }
        Some(ActorRole::Worker) => Vec::new(),
    };
    let working = match role {
        None | Some(ActorRole::Worker) => {
            state
                .store
                .load_bounties_for_actor(&actor, ActorRole::Worker)
                .await?
        }
        Some(ActorRole::Creator) => Vec::new(),
    };
    Ok(Json(ActorBounties { created, working }))
}
