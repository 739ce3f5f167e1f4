//! # Response Synthesis
//!
//! Renders a dispatch result as the single response string shown to the
//! user. Refusals name the specific reason rather than a generic error.

use std::fmt::Write;

use nebula_state::{Bounty, BountyStatus};

use crate::authorization::Denial;
use crate::dispatch::Outcome;
use crate::error::InterpretError;
use crate::extract::ExtractionError;
use crate::intent::Intent;

pub const GUIDANCE: &str = "I'm not sure how to process that command. Try asking me to create a bounty, check status, or approve a submission.";

pub const INTERNAL_ERROR: &str =
    "Sorry, I encountered an error processing your command. Please try again.";

const SPECIFY_BOUNTY: &str = "Please specify a valid bounty ID and ensure you're logged in.";

const NOT_OWNER: &str =
    "You either don't have permission to approve this bounty, or the bounty ID is invalid.";

/// Render the result of one command.
pub fn render(result: &Result<Outcome, InterpretError>) -> String {
    match result {
        Ok(outcome) => render_outcome(outcome),
        Err(err) => render_error(err),
    }
}

fn render_outcome(outcome: &Outcome) -> String {
    match outcome {
        Outcome::Created(b) => format!(
            "Created a new bounty: \"{}\" with a reward of {} ETH. The bounty ID is {}.",
            b.title, b.reward, b.id
        ),
        Outcome::Status { created, working } => status_summary(created, working),
        Outcome::Approved(b) => format!(
            "Approved bounty \"{}\". The reward of {} ETH will be released to the worker.",
            b.title, b.reward
        ),
        Outcome::Unrecognized => GUIDANCE.to_string(),
    }
}

fn status_summary(created: &[Bounty], working: &[Bounty]) -> String {
    let mut out = format!(
        "You have {} created bounties and {} bounties you're working on.\n\n",
        created.len(),
        working.len()
    );
    if !created.is_empty() {
        out.push_str("Created bounties:\n");
        push_lines(&mut out, created);
        out.push('\n');
    }
    if !working.is_empty() {
        out.push_str("Working bounties:\n");
        push_lines(&mut out, working);
    }
    out
}

fn push_lines(out: &mut String, bounties: &[Bounty]) {
    for b in bounties {
        // Writing to a String cannot fail.
        let _ = writeln!(out, "- {} ({})", b.title, b.status);
    }
}

fn render_error(err: &InterpretError) -> String {
    match err {
        InterpretError::Extraction(ExtractionError::MissingBountyId) => SPECIFY_BOUNTY.to_string(),
        InterpretError::Extraction(ExtractionError::InvalidReward(raw)) => format!(
            "The reward \"{raw}\" is not a valid amount. Rewards must be a non-negative number of ETH."
        ),
        InterpretError::NotAuthorized(Denial::NotLoggedIn { intent }) => match intent {
            Intent::Create => "You need to be logged in to create bounties.".to_string(),
            Intent::Check => "You need to be logged in to check bounty status.".to_string(),
            Intent::Approve => SPECIFY_BOUNTY.to_string(),
            _ => "You need to be logged in to do that.".to_string(),
        },
        InterpretError::NotAuthorized(Denial::NotOwner { .. }) => NOT_OWNER.to_string(),
        InterpretError::InvalidTransition {
            title,
            current,
            attempted: BountyStatus::Completed,
            ..
        } => format!(
            "Cannot approve bounty \"{title}\" because it's not in the pending review state (current state: {current})."
        ),
        InterpretError::InvalidTransition {
            title,
            current,
            attempted,
            ..
        } => format!("Cannot move bounty \"{title}\" from {current} to {attempted}."),
        InterpretError::Unsupported {
            intent: Intent::Reject,
            bounty_id,
        } => match bounty_id {
            Some(id) => format!(
                "Rejecting submissions is not supported via commands. Open bounty {id} to raise a dispute instead."
            ),
            None => "Rejecting submissions is not supported via commands. Open the bounty to raise a dispute instead.".to_string(),
        },
        InterpretError::Unsupported { intent, .. } => {
            format!("The {intent} command is not supported via commands yet. Use the bounty page instead.")
        }
        InterpretError::Internal(_) => INTERNAL_ERROR.to_string(),
    }
}
