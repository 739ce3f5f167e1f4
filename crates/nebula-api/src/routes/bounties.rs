//! # Bounty API
//!
//! Listing, lookup and creation of bounties, and lifecycle transitions.
//! Transitions use the same state machine and commit path as the command
//! interpreter, so an illegal move is refused the same way on both.

use std::collections::BTreeSet;

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;

use nebula_agentic::dispatch::transition_by_id;
use nebula_core::{BountyId, Reward, Timestamp};
use nebula_state::{Bounty, BountyStatus, NewBounty};

use crate::auth::CallerIdentity;
use crate::error::AppError;
use crate::extractors::{extract_validated_json, Validate};
use crate::state::AppState;

const MAX_TITLE_LEN: usize = 200;

/// Query parameters for `GET /v1/bounties`.
#[derive(Debug, Deserialize, Default)]
pub struct ListParams {
    /// Only bounties in this status (kebab-case).
    pub status: Option<String>,
}

/// Request to create a bounty directly.
#[derive(Debug, Deserialize)]
pub struct CreateBountyRequest {
    pub title: String,
    #[serde(default)]
    pub description: String,
    /// ETH amount.
    pub reward: f64,
    /// RFC 3339 deadline.
    pub deadline: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl Validate for CreateBountyRequest {
    fn validate(&self) -> Result<(), String> {
        if self.title.trim().is_empty() {
            return Err("title must not be empty".to_string());
        }
        if self.title.len() > MAX_TITLE_LEN {
            return Err(format!("title must not exceed {MAX_TITLE_LEN} characters"));
        }
        if self.tags.iter().any(|t| t.trim().is_empty()) {
            return Err("tags must not be empty".to_string());
        }
        Ok(())
    }
}

/// Request to move a bounty to another status.
#[derive(Debug, Deserialize)]
pub struct TransitionRequest {
    /// Target status name: in-progress, pending-review, completed, dispute, closed.
    pub to: String,
}

impl Validate for TransitionRequest {
    fn validate(&self) -> Result<(), String> {
        self.to.parse::<BountyStatus>().map(|_| ())
    }
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/v1/bounties", get(list_bounties).post(create_bounty))
        .route("/v1/bounties/{id}", get(get_bounty))
        .route("/v1/bounties/{id}/transitions", post(transition_bounty))
}

pub(crate) fn parse_bounty_id(raw: &str) -> Result<BountyId, AppError> {
    BountyId::new(raw).map_err(AppError::from)
}

/// GET /v1/bounties — All bounties in creation order, optionally by status.
async fn list_bounties(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Result<Json<Vec<Bounty>>, AppError> {
    let bounties = match params.status.as_deref() {
        Some(raw) => {
            let status = raw.parse::<BountyStatus>().map_err(AppError::Validation)?;
            state.store.load_bounties_by_status(status).await?
        }
        None => state.store.list_bounties().await?,
    };
    Ok(Json(bounties))
}

/// GET /v1/bounties/{id}
async fn get_bounty(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Bounty>, AppError> {
    let id = parse_bounty_id(&id)?;
    state
        .store
        .load_bounty(&id)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("bounty {id} not found")))
}

/// POST /v1/bounties — Create an open bounty owned by the caller.
async fn create_bounty(
    State(state): State<AppState>,
    caller: CallerIdentity,
    body: Result<Json<CreateBountyRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Bounty>), AppError> {
    let creator = caller.require_actor()?.clone();
    let req = extract_validated_json(body)?;

    let deadline = req
        .deadline
        .as_deref()
        .map(Timestamp::parse_lenient)
        .transpose()?;
    let new = NewBounty {
        title: req.title.trim().to_string(),
        description: req.description,
        reward: Reward::new(req.reward)?,
        deadline,
        creator_id: creator,
        tags: req.tags.into_iter().map(|t| t.trim().to_string()).collect::<BTreeSet<_>>(),
    };

    let bounty = state.store.create_bounty(new).await?;
    tracing::info!(bounty_id = %bounty.id, creator = %bounty.creator_id, "bounty created via api");
    Ok((StatusCode::CREATED, Json(bounty)))
}

/// POST /v1/bounties/{id}/transitions — Apply a lifecycle transition as the caller.
///
/// Illegal moves answer 409 with the legal targets; a caller failing the
/// edge's guard answers 403.
async fn transition_bounty(
    State(state): State<AppState>,
    caller: CallerIdentity,
    Path(id): Path<String>,
    body: Result<Json<TransitionRequest>, JsonRejection>,
) -> Result<Json<Bounty>, AppError> {
    let actor = caller.require_actor()?.clone();
    let id = parse_bounty_id(&id)?;
    let req = extract_validated_json(body)?;
    let to = req.to.parse::<BountyStatus>().map_err(AppError::Validation)?;

    let bounty = transition_by_id(state.store.as_ref(), &id, to, &actor).await?;
    Ok(Json(bounty))
}
