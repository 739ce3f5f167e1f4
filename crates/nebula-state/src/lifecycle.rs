//! # Lifecycle Table
//!
//! Bounty states and the edges between them. [`TRANSITIONS`] is the single
//! source of truth: any `(from, to)` pair not listed is invalid.

use serde::{Deserialize, Serialize};

use nebula_core::ActorId;

// ─── Bounty Status ───────────────────────────────────────────────────

/// The lifecycle state of a bounty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BountyStatus {
    /// Accepting applicants. No worker assigned.
    Open,
    /// A worker has taken the bounty.
    InProgress,
    /// The worker has submitted; the creator must review.
    PendingReview,
    /// Approved by the creator; the reward is payable.
    Completed,
    /// Creator and worker disagree.
    Dispute,
    /// Terminal.
    Closed,
}

impl BountyStatus {
    /// Every status, in lifecycle order.
    pub const ALL: [BountyStatus; 6] = [
        Self::Open,
        Self::InProgress,
        Self::PendingReview,
        Self::Completed,
        Self::Dispute,
        Self::Closed,
    ];

    /// The canonical string name of this state.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::InProgress => "in-progress",
            Self::PendingReview => "pending-review",
            Self::Completed => "completed",
            Self::Dispute => "dispute",
            Self::Closed => "closed",
        }
    }

    /// Whether no transition leaves this state.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Closed)
    }

    /// The states reachable from this one in a single transition.
    pub fn valid_transitions(&self) -> Vec<BountyStatus> {
        TRANSITIONS
            .iter()
            .filter(|edge| edge.from == *self)
            .map(|edge| edge.to)
            .collect()
    }

    /// Look up the edge `self → to`, if the table has one.
    pub fn edge_to(&self, to: BountyStatus) -> Option<&'static Edge> {
        TRANSITIONS
            .iter()
            .find(|edge| edge.from == *self && edge.to == to)
    }
}

impl std::fmt::Display for BountyStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for BountyStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| format!("unknown bounty status: {s:?}"))
    }
}

// ─── Guards ──────────────────────────────────────────────────────────

/// Who may invoke a transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Guard {
    /// Anyone except the bounty's creator.
    NonCreator,
    /// Only the assigned worker.
    Worker,
    /// Only the creator.
    Creator,
    /// The creator or the assigned worker.
    CreatorOrWorker,
}

impl Guard {
    /// Evaluate the guard for `actor` against a bounty's roles.
    pub fn permits(&self, actor: &ActorId, creator: &ActorId, worker: Option<&ActorId>) -> bool {
        let is_creator = actor == creator;
        let is_worker = worker == Some(actor);
        match self {
            Self::NonCreator => !is_creator,
            Self::Worker => is_worker,
            Self::Creator => is_creator,
            Self::CreatorOrWorker => is_creator || is_worker,
        }
    }

    /// Human-readable description used in error messages.
    pub fn describe(&self) -> &'static str {
        match self {
            Self::NonCreator => "any actor other than the creator",
            Self::Worker => "the assigned worker",
            Self::Creator => "the creator",
            Self::CreatorOrWorker => "the creator or the assigned worker",
        }
    }
}

impl std::fmt::Display for Guard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.describe())
    }
}

// ─── Edges ───────────────────────────────────────────────────────────

/// What a transition does besides changing `status`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SideEffect {
    /// Nothing beyond the status change.
    None,
    /// The acting actor becomes the worker.
    AssignWorker,
    /// The reward becomes payable. A label only; nothing is transferred.
    RewardPayable,
    /// The bounty enters its terminal state.
    Terminal,
}

/// One legal `(from, to)` pair with its guard and side effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Edge {
    pub from: BountyStatus,
    pub to: BountyStatus,
    pub guard: Guard,
    pub effect: SideEffect,
}

const fn edge(from: BountyStatus, to: BountyStatus, guard: Guard, effect: SideEffect) -> Edge {
    Edge {
        from,
        to,
        guard,
        effect,
    }
}

/// The complete transition table.
pub const TRANSITIONS: &[Edge] = &[
    edge(BountyStatus::Open, BountyStatus::InProgress, Guard::NonCreator, SideEffect::AssignWorker),
    edge(BountyStatus::InProgress, BountyStatus::PendingReview, Guard::Worker, SideEffect::None),
    edge(BountyStatus::PendingReview, BountyStatus::Completed, Guard::Creator, SideEffect::RewardPayable),
    edge(BountyStatus::PendingReview, BountyStatus::Dispute, Guard::CreatorOrWorker, SideEffect::None),
    edge(BountyStatus::Completed, BountyStatus::Dispute, Guard::CreatorOrWorker, SideEffect::None),
    edge(BountyStatus::Dispute, BountyStatus::Dispute, Guard::CreatorOrWorker, SideEffect::None),
    edge(BountyStatus::PendingReview, BountyStatus::Closed, Guard::Creator, SideEffect::Terminal),
    edge(BountyStatus::Completed, BountyStatus::Closed, Guard::Creator, SideEffect::Terminal),
    edge(BountyStatus::Dispute, BountyStatus::Closed, Guard::Creator, SideEffect::Terminal),
];

#[cfg(test)]
mod tests {
    use super::*;

    fn actor(id: &str) -> ActorId {
        ActorId::new(id).unwrap()
    }

    #[test]
    fn status_names_are_kebab_case() {
        assert_eq!(BountyStatus::InProgress.to_string(), "in-progress");
        assert_eq!(BountyStatus::PendingReview.as_str(), "pending-review");
        assert_eq!(
            serde_json::to_string(&BountyStatus::PendingReview).unwrap(),
            "\"pending-review\""
        );
    }

    #[test]
    fn status_parses_from_canonical_name() {
        for status in BountyStatus::ALL {
            assert_eq!(status.as_str().parse::<BountyStatus>(), Ok(status));
        }
        assert!("pending_review".parse::<BountyStatus>().is_err());
    }

    #[test]
    fn closed_has_no_outgoing_edges() {
        assert!(BountyStatus::Closed.is_terminal());
        assert!(BountyStatus::Closed.valid_transitions().is_empty());
    }

    #[test]
    fn open_only_moves_to_in_progress() {
        assert_eq!(
            BountyStatus::Open.valid_transitions(),
            vec![BountyStatus::InProgress]
        );
    }

    #[test]
    fn dispute_is_reentrant() {
        let edge = BountyStatus::Dispute.edge_to(BountyStatus::Dispute).unwrap();
        assert_eq!(edge.guard, Guard::CreatorOrWorker);
    }

    #[test]
    fn no_edge_returns_to_open() {
        assert!(TRANSITIONS.iter().all(|e| e.to != BountyStatus::Open));
    }

    #[test]
    fn guards_evaluate_roles() {
        let creator = actor("alice");
        let worker = actor("bob");
        let other = actor("carol");

        assert!(!Guard::NonCreator.permits(&creator, &creator, None));
        assert!(Guard::NonCreator.permits(&other, &creator, None));
        assert!(Guard::Worker.permits(&worker, &creator, Some(&worker)));
        assert!(!Guard::Worker.permits(&other, &creator, Some(&worker)));
        assert!(Guard::Creator.permits(&creator, &creator, Some(&worker)));
        assert!(Guard::CreatorOrWorker.permits(&worker, &creator, Some(&worker)));
        assert!(!Guard::CreatorOrWorker.permits(&other, &creator, Some(&worker)));
    }
}
