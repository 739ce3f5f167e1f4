//! # Command API
//!
//! Runs free-form commands through the interpreter as the calling actor.
//! Refusals are ordinary responses: the interpreter always produces text,
//! so this endpoint answers 200 for every well-formed request.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};

use nebula_agentic::{Command, Intent};

use crate::auth::CallerIdentity;
use crate::error::AppError;
use crate::extractors::{extract_validated_json, Validate};
use crate::state::AppState;

/// Longest accepted command, in bytes.
const MAX_INPUT_LEN: usize = 2_000;

#[derive(Debug, Deserialize)]
pub struct CommandRequest {
    pub input: String,
}

impl Validate for CommandRequest {
    fn validate(&self) -> Result<(), String> {
        if self.input.trim().is_empty() {
            return Err("input must not be empty".to_string());
        }
        if self.input.len() > MAX_INPUT_LEN {
            return Err(format!("input must not exceed {MAX_INPUT_LEN} bytes"));
        }
        Ok(())
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CommandResponse {
    pub response: String,
    pub intent: Intent,
    pub processed: bool,
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/v1/commands", post(run_command))
        .route("/v1/commands/recent", get(recent_commands))
}

/// POST /v1/commands — Interpret a command as the caller.
async fn run_command(
    State(state): State<AppState>,
    caller: CallerIdentity,
    body: Result<Json<CommandRequest>, JsonRejection>,
) -> Result<Json<CommandResponse>, AppError> {
    let req = extract_validated_json(body)?;
    let report = state.interpreter.run(&req.input, caller.actor.as_ref()).await;
    Ok(Json(CommandResponse {
        response: report.response,
        intent: report.command.intent,
        processed: report.command.processed,
    }))
}

/// GET /v1/commands/recent — The last ten commands, newest first.
async fn recent_commands(State(state): State<AppState>) -> Json<Vec<Command>> {
    Json(state.interpreter.recent_commands())
}
