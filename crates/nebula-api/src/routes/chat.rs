//! # Chat API
//!
//! Messages attached to a bounty. Sending requires a logged-in actor and
//! an existing bounty; every stored message is pushed to the store's
//! subscribers.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;

use nebula_store::ChatMessage;

use crate::auth::CallerIdentity;
use crate::error::AppError;
use crate::extractors::{extract_validated_json, Validate};
use crate::routes::bounties::parse_bounty_id;
use crate::state::AppState;

const MAX_MESSAGE_LEN: usize = 4_000;

#[derive(Debug, Deserialize)]
pub struct SendMessageRequest {
    pub content: String,
}

impl Validate for SendMessageRequest {
    fn validate(&self) -> Result<(), String> {
        if self.content.trim().is_empty() {
            return Err("content must not be empty".to_string());
        }
        if self.content.len() > MAX_MESSAGE_LEN {
            return Err(format!("content must not exceed {MAX_MESSAGE_LEN} bytes"));
        }
        Ok(())
    }
}

pub fn router() -> Router<AppState> {
    Router::new().route(
        "/v1/bounties/{id}/messages",
        get(list_messages).post(send_message),
    )
}

/// GET /v1/bounties/{id}/messages — Oldest first.
async fn list_messages(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Vec<ChatMessage>>, AppError> {
    let id = parse_bounty_id(&id)?;
    if state.store.load_bounty(&id).await?.is_none() {
        return Err(AppError::NotFound(format!("bounty {id} not found")));
    }
    Ok(Json(state.store.messages_for_bounty(&id).await?))
}

/// POST /v1/bounties/{id}/messages
async fn send_message(
    State(state): State<AppState>,
    caller: CallerIdentity,
    Path(id): Path<String>,
    body: Result<Json<SendMessageRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<ChatMessage>), AppError> {
    let sender = caller.require_actor()?.clone();
    let id = parse_bounty_id(&id)?;
    let req = extract_validated_json(body)?;
    let message = state.store.send_message(&id, &sender, req.content).await?;
    tracing::debug!(bounty_id = %id, sender = %sender, "chat message stored");
    Ok((StatusCode::CREATED, Json(message)))
}
