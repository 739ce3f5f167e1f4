//! # Parameter Extraction
//!
//! Pattern-based extraction of command parameters, conditioned on the
//! classified intent. Regexes are compiled once in [`Extractor::new`].

use regex::Regex;
use thiserror::Error;

use nebula_core::{BountyId, Reward, Timestamp};

/// Days between a command-created bounty's creation and its deadline.
pub const COMMAND_DEADLINE_DAYS: i64 = 14;

/// Title used when a create command names none.
pub const DEFAULT_TITLE: &str = "New Task";

/// Signature of the per-intent extractor in the rule table.
pub type ExtractFn = fn(&Extractor, &str, Timestamp) -> Result<Parameters, ExtractionError>;

/// A required parameter was missing or malformed.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ExtractionError {
    /// The intent targets a bounty but none was named.
    #[error("no bounty id found in command")]
    MissingBountyId,

    /// A reward was given but is not a non-negative ETH amount.
    #[error("invalid reward amount {0:?}")]
    InvalidReward(String),
}

/// Fields of a bounty requested through a create command.
#[derive(Debug, Clone, PartialEq)]
pub struct CreateParams {
    pub title: String,
    pub reward: Reward,
    pub deadline: Timestamp,
}

/// Extracted parameters, one variant per intent.
#[derive(Debug, Clone, PartialEq)]
pub enum Parameters {
    Create(CreateParams),
    Approve { bounty_id: BountyId },
    /// The id only names the bounty in the refusal.
    Reject { bounty_id: Option<BountyId> },
    Check,
    Update,
    Other,
}

/// Compiled extraction patterns.
#[derive(Debug, Clone)]
pub struct Extractor {
    title: Regex,
    reward: Regex,
    spaced_id: Regex,
    glued_id: Regex,
}

impl Extractor {
    pub fn new() -> Result<Self, regex::Error> {
        Ok(Self {
            title: Regex::new(r"(?i)\bfor\s+(?:a|an)\s+(.*?)(?:\b(?:with|having|of|for)\b|$)")?,
            reward: Regex::new(r"(?i)\breward\s+of\s+(-?[0-9.]+)\s*(?:eth|ethereum)")?,
            spaced_id: Regex::new(r"(?i)\bbounty\s+(?:id\s+)?([a-z0-9]+)")?,
            glued_id: Regex::new(r"(?i)\b(bounty[0-9]+)\b")?,
        })
    }

    /// Text after "for a"/"for an" up to the first terminator word.
    pub fn title(&self, input: &str) -> String {
        self.title
            .captures(input)
            .and_then(|c| c.get(1))
            .map(|m| m.as_str().trim())
            .filter(|t| !t.is_empty())
            .unwrap_or(DEFAULT_TITLE)
            .to_string()
    }

    /// The amount before "eth"/"ethereum" following "reward of".
    ///
    /// `Ok(None)` when no reward is stated.
    pub fn reward(&self, input: &str) -> Result<Option<Reward>, ExtractionError> {
        let Some(raw) = self.reward.captures(input).and_then(|c| c.get(1)) else {
            return Ok(None);
        };
        let raw = raw.as_str();
        raw.parse::<f64>()
            .ok()
            .and_then(|eth| Reward::new(eth).ok())
            .map(Some)
            .ok_or_else(|| ExtractionError::InvalidReward(raw.to_string()))
    }

    /// The bounty named after the word "bounty" (optionally "bounty id"),
    /// or a glued `bounty<digits>` token. Lowercased.
    pub fn bounty_id(&self, input: &str) -> Option<BountyId> {
        [&self.spaced_id, &self.glued_id]
            .into_iter()
            .find_map(|re| re.captures(input).and_then(|c| c.get(1)))
            .and_then(|m| BountyId::new(m.as_str().to_lowercase()).ok())
    }

    pub fn extract_create(&self, input: &str, now: Timestamp) -> Result<Parameters, ExtractionError> {
        Ok(Parameters::Create(CreateParams {
            title: self.title(input),
            reward: self.reward(input)?.unwrap_or_else(Reward::default_command_reward),
            deadline: now.plus_days(COMMAND_DEADLINE_DAYS),
        }))
    }

    pub fn extract_approve(&self, input: &str, _now: Timestamp) -> Result<Parameters, ExtractionError> {
        let bounty_id = self.bounty_id(input).ok_or(ExtractionError::MissingBountyId)?;
        Ok(Parameters::Approve { bounty_id })
    }

    pub fn extract_reject(&self, input: &str, _now: Timestamp) -> Result<Parameters, ExtractionError> {
        Ok(Parameters::Reject {
            bounty_id: self.bounty_id(input),
        })
    }

    pub fn extract_check(&self, _input: &str, _now: Timestamp) -> Result<Parameters, ExtractionError> {
        Ok(Parameters::Check)
    }

    pub fn extract_update(&self, _input: &str, _now: Timestamp) -> Result<Parameters, ExtractionError> {
        Ok(Parameters::Update)
    }

    pub fn extract_other(&self, _input: &str, _now: Timestamp) -> Result<Parameters, ExtractionError> {
        Ok(Parameters::Other)
    }
}
