//! # Command Classification
//!
//! An ordered table of keyword rules. Matching is case-insensitive
//! substring search over the whole input and the first matching row wins.
//! Each row also names the extractor that runs for its intent, so adding
//! an intent means appending a row.

use serde::{Deserialize, Serialize};

use crate::extract::{ExtractFn, Extractor};

// ---------------------------------------------------------------------------
// Intent
// ---------------------------------------------------------------------------

/// The classified kind of a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Intent {
    Create,
    Update,
    Check,
    Approve,
    Reject,
    Other,
}

impl Intent {
    /// Every intent.
    pub const ALL: [Intent; 6] = [
        Self::Create,
        Self::Update,
        Self::Check,
        Self::Approve,
        Self::Reject,
        Self::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Create => "create",
            Self::Update => "update",
            Self::Check => "check",
            Self::Approve => "approve",
            Self::Reject => "reject",
            Self::Other => "other",
        }
    }
}

impl std::fmt::Display for Intent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Rule table
// ---------------------------------------------------------------------------

/// One classification rule.
///
/// `all_of` is a conjunction of keyword groups; a group is satisfied when
/// the lowercased input contains any of its keywords. An empty `all_of`
/// always matches.
pub struct Rule {
    pub intent: Intent,
    pub all_of: &'static [&'static [&'static str]],
    pub extract: ExtractFn,
}

impl std::fmt::Debug for Rule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Rule")
            .field("intent", &self.intent)
            .field("all_of", &self.all_of)
            .finish_non_exhaustive()
    }
}

impl Rule {
    fn matches(&self, lowered: &str) -> bool {
        self.all_of
            .iter()
            .all(|group| group.iter().any(|keyword| lowered.contains(keyword)))
    }
}

/// Classification rules in priority order. The last row is the fallback.
pub static RULES: &[Rule] = &[
    Rule {
        intent: Intent::Create,
        all_of: &[&["create"], &["bounty"]],
        extract: Extractor::extract_create,
    },
    Rule {
        intent: Intent::Approve,
        all_of: &[&["approve", "accept"], &["bounty"]],
        extract: Extractor::extract_approve,
    },
    Rule {
        intent: Intent::Reject,
        all_of: &[&["reject", "decline"]],
        extract: Extractor::extract_reject,
    },
    Rule {
        intent: Intent::Check,
        all_of: &[&["check"], &["status"]],
        extract: Extractor::extract_check,
    },
    Rule {
        intent: Intent::Update,
        all_of: &[&["update", "change"]],
        extract: Extractor::extract_update,
    },
    Rule {
        intent: Intent::Other,
        all_of: &[],
        extract: Extractor::extract_other,
    },
];

/// The first rule matching `input`. Total: the fallback row always matches.
pub fn rule_for(input: &str) -> &'static Rule {
    let lowered = input.to_lowercase();
    RULES
        .iter()
        .find(|rule| rule.matches(&lowered))
        .unwrap_or(&RULES[RULES.len() - 1])
}

/// Classify a raw command.
pub fn classify(input: &str) -> Intent {
    rule_for(input).intent
}
