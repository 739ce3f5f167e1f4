//! End-to-end interpreter behaviour against the demo store.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::broadcast;

use nebula_agentic::response::{GUIDANCE, INTERNAL_ERROR};
use nebula_agentic::{Intent, Interpreter, SharedSession};
use nebula_core::{ActorId, BountyId};
use nebula_state::{Bounty, BountyStatus, NewBounty};
use nebula_store::{ActorRole, BountyStore, ChatMessage, InMemoryStore, StoreError};

fn actor(id: &str) -> ActorId {
    ActorId::new(id).unwrap()
}

fn id(s: &str) -> BountyId {
    BountyId::new(s).unwrap()
}

fn demo() -> (Arc<InMemoryStore>, Interpreter) {
    let store = Arc::new(InMemoryStore::with_demo_data().unwrap());
    let interpreter = Interpreter::new(store.clone()).unwrap();
    (store, interpreter)
}

async fn status_of(store: &InMemoryStore, bounty: &str) -> BountyStatus {
    store.load_bounty(&id(bounty)).await.unwrap().unwrap().status
}

// ── create ───────────────────────────────────────────────────────────

#[tokio::test]
async fn create_command_round_trip() {
    let (store, interpreter) = demo();
    let input = "Create a bounty for a landing page design with a reward of 0.5 ETH";

    let response = interpreter.interpret(input, Some(&actor("user1"))).await;
    assert_eq!(
        response,
        "Created a new bounty: \"landing page design\" with a reward of 0.5 ETH. The bounty ID is bounty7."
    );

    let created = store.load_bounty(&id("bounty7")).await.unwrap().unwrap();
    assert_eq!(created.title, "landing page design");
    assert_eq!(created.reward.eth(), 0.5);
    assert_eq!(created.status, BountyStatus::Open);
    assert_eq!(created.creator_id, actor("user1"));
    assert!(created.worker_id.is_none());
    assert_eq!(created.description, format!("Created via Nebula AI: \"{input}\""));
    assert!(created.tags.contains("generated") && created.tags.contains("nebula-ai"));
    let deadline = created.deadline.unwrap();
    assert!(deadline > created.created_at);
}

#[tokio::test]
async fn create_requires_login() {
    let (store, interpreter) = demo();
    let response = interpreter.interpret("create a bounty for a logo", None).await;
    assert_eq!(response, "You need to be logged in to create bounties.");
    assert_eq!(store.len(), 6);
}

#[tokio::test]
async fn negative_reward_creates_nothing() {
    let (store, interpreter) = demo();
    let response = interpreter
        .interpret(
            "create a bounty for a logo with a reward of -2 ETH",
            Some(&actor("user1")),
        )
        .await;
    assert!(response.contains("non-negative"));
    assert_eq!(store.len(), 6);
}

// ── approve ──────────────────────────────────────────────────────────

#[tokio::test]
async fn creator_approves_pending_review() {
    let (store, interpreter) = demo();
    let response = interpreter
        .interpret("approve bounty bounty3", Some(&actor("user4")))
        .await;
    assert_eq!(
        response,
        "Approved bounty \"Optimize Gas Usage in Existing Contract\". The reward of 0.5 ETH will be released to the worker."
    );
    let approved = store.load_bounty(&id("bounty3")).await.unwrap().unwrap();
    assert_eq!(approved.status, BountyStatus::Completed);
    assert_eq!(approved.worker_id, Some(actor("user1")));
}

#[tokio::test]
async fn repeated_approve_is_a_state_mismatch() {
    let (store, interpreter) = demo();
    let user4 = actor("user4");
    interpreter.interpret("approve bounty3", Some(&user4)).await;
    let second = interpreter.interpret("Accept bounty3", Some(&user4)).await;
    assert_eq!(
        second,
        "Cannot approve bounty \"Optimize Gas Usage in Existing Contract\" because it's not in the pending review state (current state: completed)."
    );
    assert_eq!(status_of(&store, "bounty3").await, BountyStatus::Completed);
}

#[tokio::test]
async fn approve_open_bounty_is_rejected_unchanged() {
    let (store, interpreter) = demo();
    let before = store.load_bounty(&id("bounty1")).await.unwrap();
    let response = interpreter
        .interpret("approve bounty bounty1", Some(&actor("user2")))
        .await;
    assert!(response.contains("not in the pending review state (current state: open)"));
    assert_eq!(store.load_bounty(&id("bounty1")).await.unwrap(), before);
}

#[tokio::test]
async fn approve_by_non_creator_is_rejected_unchanged() {
    let (store, interpreter) = demo();
    let response = interpreter
        .interpret("approve bounty bounty3", Some(&actor("user1")))
        .await;
    assert_eq!(
        response,
        "You either don't have permission to approve this bounty, or the bounty ID is invalid."
    );
    assert_eq!(status_of(&store, "bounty3").await, BountyStatus::PendingReview);
}

#[tokio::test]
async fn approve_unknown_id_reads_as_permission_failure() {
    let (_, interpreter) = demo();
    let response = interpreter
        .interpret("approve bounty id nope99", Some(&actor("user4")))
        .await;
    assert!(response.starts_with("You either don't have permission"));
}

#[tokio::test]
async fn approve_without_id_or_login() {
    let (_, interpreter) = demo();
    let expected = "Please specify a valid bounty ID and ensure you're logged in.";
    assert_eq!(
        interpreter.interpret("approve the bounty", Some(&actor("user4"))).await,
        expected
    );
    assert_eq!(interpreter.interpret("approve bounty3", None).await, expected);
}

// ── check ────────────────────────────────────────────────────────────

#[tokio::test]
async fn check_lists_only_own_bounties_grouped_by_status() {
    let (_, interpreter) = demo();
    let response = interpreter
        .interpret("Check the status of my bounties", Some(&actor("user1")))
        .await;
    assert!(response.starts_with("You have 0 created bounties and 4 bounties you're working on."));
    let lines: Vec<&str> = response.lines().filter(|l| l.starts_with("- ")).collect();
    assert_eq!(
        lines,
        [
            "- Design DeFi Dashboard UI/UX (in-progress)",
            "- Optimize Gas Usage in Existing Contract (pending-review)",
            "- Create Logo for Blockchain Startup (completed)",
            "- Write Technical Documentation (dispute)",
        ]
    );
    assert!(!response.contains("Created bounties:"));
}

#[tokio::test]
async fn check_line_count_matches_created_plus_working() {
    let (_, interpreter) = demo();
    let user3 = actor("user3");
    interpreter
        .interpret("create a bounty for a follow-up audit", Some(&user3))
        .await;
    let response = interpreter.interpret("check status", Some(&user3)).await;
    assert!(response.starts_with("You have 3 created bounties and 0 bounties you're working on."));
    assert_eq!(response.lines().filter(|l| l.starts_with("- ")).count(), 3);
    assert!(response.contains("Created bounties:\n- follow-up audit (open)\n"));
}

#[tokio::test]
async fn check_requires_login() {
    let (_, interpreter) = demo();
    assert_eq!(
        interpreter.interpret("check status", None).await,
        "You need to be logged in to check bounty status."
    );
}

// ── other intents ────────────────────────────────────────────────────

#[tokio::test]
async fn reject_and_update_are_not_silent() {
    let (store, interpreter) = demo();
    let user3 = actor("user3");
    let reject = interpreter.interpret("reject bounty6", Some(&user3)).await;
    assert!(reject.contains("not supported via commands"));
    let update = interpreter
        .interpret("change the reward on bounty2", Some(&user3))
        .await;
    assert!(update.contains("not supported via commands"));
    assert_eq!(status_of(&store, "bounty6").await, BountyStatus::Dispute);
}

#[tokio::test]
async fn unrecognized_gets_guidance() {
    let (_, interpreter) = demo();
    assert_eq!(interpreter.interpret("hello", None).await, GUIDANCE);
}

// ── log and session ──────────────────────────────────────────────────

#[tokio::test]
async fn recent_commands_are_capped_and_newest_first() {
    let (_, interpreter) = demo();
    for n in 0..12 {
        interpreter.interpret(&format!("hello {n}"), None).await;
    }
    let report = interpreter.run("check status", Some(&actor("user1"))).await;
    assert_eq!(report.command.intent, Intent::Check);
    assert!(report.command.processed);

    let recent = interpreter.recent_commands();
    assert_eq!(recent.len(), 10);
    assert_eq!(recent[0].input, "check status");
    assert_eq!(recent[1].input, "hello 11");
    assert!(recent.iter().all(|c| c.processed));
}

#[tokio::test]
async fn process_command_uses_session_actor() {
    let store = Arc::new(InMemoryStore::with_demo_data().unwrap());
    let session = Arc::new(SharedSession::default());
    let interpreter = Interpreter::new(store.clone())
        .unwrap()
        .with_session(session.clone());

    assert_eq!(
        interpreter.process_command("check status").await,
        "You need to be logged in to check bounty status."
    );
    session.login(actor("user4"));
    let response = interpreter.process_command("approve bounty3").await;
    assert!(response.starts_with("Approved bounty"));
}

// ── store failures and races ─────────────────────────────────────────

struct FailingStore {
    tx: broadcast::Sender<ChatMessage>,
}

impl FailingStore {
    fn new() -> Self {
        Self {
            tx: broadcast::channel(1).0,
        }
    }

    fn down<T>() -> Result<T, StoreError> {
        Err(StoreError::Unavailable("connection refused".into()))
    }
}

#[async_trait]
impl BountyStore for FailingStore {
    async fn load_bounty(&self, _: &BountyId) -> Result<Option<Bounty>, StoreError> {
        Self::down()
    }
    async fn load_bounties_for_actor(&self, _: &ActorId, _: ActorRole) -> Result<Vec<Bounty>, StoreError> {
        Self::down()
    }
    async fn load_bounties_by_status(&self, _: BountyStatus) -> Result<Vec<Bounty>, StoreError> {
        Self::down()
    }
    async fn list_bounties(&self) -> Result<Vec<Bounty>, StoreError> {
        Self::down()
    }
    async fn create_bounty(&self, _: NewBounty) -> Result<Bounty, StoreError> {
        Self::down()
    }
    async fn update_bounty_status(
        &self,
        _: &BountyId,
        _: BountyStatus,
        _: Option<ActorId>,
    ) -> Result<Bounty, StoreError> {
        Self::down()
    }
    async fn commit_transition(
        &self,
        _: &BountyId,
        _: BountyStatus,
        _: BountyStatus,
        _: Option<ActorId>,
    ) -> Result<Bounty, StoreError> {
        Self::down()
    }
    async fn messages_for_bounty(&self, _: &BountyId) -> Result<Vec<ChatMessage>, StoreError> {
        Self::down()
    }
    async fn send_message(&self, _: &BountyId, _: &ActorId, _: String) -> Result<ChatMessage, StoreError> {
        Self::down()
    }
    fn subscribe_messages(&self) -> broadcast::Receiver<ChatMessage> {
        self.tx.subscribe()
    }
}

#[tokio::test]
async fn store_failure_is_an_apology_not_a_panic() {
    let interpreter = Interpreter::new(Arc::new(FailingStore::new())).unwrap();
    let user1 = actor("user1");
    for input in ["check status", "approve bounty3", "create a bounty for a logo"] {
        assert_eq!(interpreter.interpret(input, Some(&user1)).await, INTERNAL_ERROR);
    }
    assert_eq!(interpreter.recent_commands().len(), 3);
}

/// Completes the bounty behind the caller's back right after it is loaded.
struct RacingStore {
    inner: InMemoryStore,
}

#[async_trait]
impl BountyStore for RacingStore {
    async fn load_bounty(&self, id: &BountyId) -> Result<Option<Bounty>, StoreError> {
        let snapshot = self.inner.load_bounty(id).await?;
        self.inner
            .update_bounty_status(id, BountyStatus::Completed, None)
            .await?;
        Ok(snapshot)
    }
    async fn load_bounties_for_actor(&self, a: &ActorId, r: ActorRole) -> Result<Vec<Bounty>, StoreError> {
        self.inner.load_bounties_for_actor(a, r).await
    }
    async fn load_bounties_by_status(&self, s: BountyStatus) -> Result<Vec<Bounty>, StoreError> {
        self.inner.load_bounties_by_status(s).await
    }
    async fn list_bounties(&self) -> Result<Vec<Bounty>, StoreError> {
        self.inner.list_bounties().await
    }
    async fn create_bounty(&self, new: NewBounty) -> Result<Bounty, StoreError> {
        self.inner.create_bounty(new).await
    }
    async fn update_bounty_status(
        &self,
        id: &BountyId,
        status: BountyStatus,
        worker: Option<ActorId>,
    ) -> Result<Bounty, StoreError> {
        self.inner.update_bounty_status(id, status, worker).await
    }
    async fn commit_transition(
        &self,
        id: &BountyId,
        expected: BountyStatus,
        to: BountyStatus,
        worker: Option<ActorId>,
    ) -> Result<Bounty, StoreError> {
        self.inner.commit_transition(id, expected, to, worker).await
    }
    async fn messages_for_bounty(&self, id: &BountyId) -> Result<Vec<ChatMessage>, StoreError> {
        self.inner.messages_for_bounty(id).await
    }
    async fn send_message(&self, b: &BountyId, s: &ActorId, c: String) -> Result<ChatMessage, StoreError> {
        self.inner.send_message(b, s, c).await
    }
    fn subscribe_messages(&self) -> broadcast::Receiver<ChatMessage> {
        self.inner.subscribe_messages()
    }
}

#[tokio::test]
async fn commit_revalidates_current_status() {
    let store = Arc::new(RacingStore {
        inner: InMemoryStore::with_demo_data().unwrap(),
    });
    let interpreter = Interpreter::new(store.clone()).unwrap();
    let response = interpreter.interpret("approve bounty3", Some(&actor("user4"))).await;
    assert!(
        response.contains("(current state: completed)"),
        "unexpected response: {response}"
    );
}
