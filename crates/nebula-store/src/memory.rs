//! # In-Memory Store
//!
//! Volatile [`BountyStore`] backed by a single `parking_lot::RwLock`.
//! The lock is never held across an `.await`, so every trait method runs
//! its critical section synchronously and the write either fully replaces
//! the record or returns an error without touching it.

use std::collections::HashMap;

use async_trait::async_trait;
use parking_lot::RwLock;
use tokio::sync::broadcast;

use nebula_core::{ActorId, BountyId, MessageId, Timestamp};
use nebula_state::{Bounty, BountyStatus, NewBounty};

use crate::store::{ActorRole, BountyStore, ChatMessage, StoreError};

/// Capacity of the chat broadcast channel. Lagging receivers skip ahead.
const MESSAGE_CHANNEL_CAPACITY: usize = 256;

#[derive(Debug, Default)]
struct Records {
    bounties: HashMap<BountyId, Bounty>,
    /// Creation order of `bounties`.
    order: Vec<BountyId>,
    /// Next `bounty<N>` sequence number to try.
    next_seq: u64,
    messages: Vec<ChatMessage>,
}

impl Records {
    fn ordered(&self, mut keep: impl FnMut(&Bounty) -> bool) -> Vec<Bounty> {
        self.order
            .iter()
            .filter_map(|id| self.bounties.get(id))
            .filter(|b| keep(b))
            .cloned()
            .collect()
    }

    fn next_id(&mut self) -> BountyId {
        loop {
            let id = BountyId::sequential(self.next_seq);
            self.next_seq += 1;
            if !self.bounties.contains_key(&id) {
                return id;
            }
        }
    }

    fn put(&mut self, bounty: Bounty) {
        if let Some(n) = bounty
            .id
            .as_str()
            .strip_prefix("bounty")
            .and_then(|n| n.parse::<u64>().ok())
        {
            self.next_seq = self.next_seq.max(n.saturating_add(1));
        }
        if !self.bounties.contains_key(&bounty.id) {
            self.order.push(bounty.id.clone());
        }
        self.bounties.insert(bounty.id.clone(), bounty);
    }
}

/// Thread-safe, volatile bounty and chat store.
///
/// Constructed once at process start and shared as `Arc<dyn BountyStore>`.
#[derive(Debug)]
pub struct InMemoryStore {
    records: RwLock<Records>,
    messages_tx: broadcast::Sender<ChatMessage>,
}

impl InMemoryStore {
    /// Create an empty store. The first created bounty is `bounty1`.
    pub fn new() -> Self {
        let (messages_tx, _) = broadcast::channel(MESSAGE_CHANNEL_CAPACITY);
        Self {
            records: RwLock::new(Records {
                next_seq: 1,
                ..Records::default()
            }),
            messages_tx,
        }
    }

    /// Insert a fully formed record, replacing any bounty with the same id.
    ///
    /// Used to load fixtures. Sequential id assignment continues after the
    /// highest `bounty<N>` inserted.
    pub fn insert_bounty(&self, bounty: Bounty) -> Result<(), StoreError> {
        if !bounty.satisfies_worker_invariant() {
            return Err(StoreError::WorkerOnOpenBounty(bounty.id));
        }
        self.records.write().put(bounty);
        Ok(())
    }

    /// Insert a historical chat message without notifying subscribers.
    pub fn insert_message(&self, message: ChatMessage) -> Result<(), StoreError> {
        let mut records = self.records.write();
        if !records.bounties.contains_key(&message.bounty_id) {
            return Err(StoreError::NotFound(message.bounty_id));
        }
        records.messages.push(message);
        Ok(())
    }

    /// Number of bounties held.
    pub fn len(&self) -> usize {
        self.records.read().bounties.len()
    }

    /// Whether the store holds no bounties.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BountyStore for InMemoryStore {
    async fn load_bounty(&self, id: &BountyId) -> Result<Option<Bounty>, StoreError> {
        Ok(self.records.read().bounties.get(id).cloned())
    }

    async fn load_bounties_for_actor(
        &self,
        actor: &ActorId,
        role: ActorRole,
    ) -> Result<Vec<Bounty>, StoreError> {
        let records = self.records.read();
        Ok(match role {
            ActorRole::Creator => records.ordered(|b| b.is_creator(actor)),
            ActorRole::Worker => records.ordered(|b| b.is_worker(actor)),
        })
    }

    async fn load_bounties_by_status(
        &self,
        status: BountyStatus,
    ) -> Result<Vec<Bounty>, StoreError> {
        Ok(self.records.read().ordered(|b| b.status == status))
    }

    async fn list_bounties(&self) -> Result<Vec<Bounty>, StoreError> {
        Ok(self.records.read().ordered(|_| true))
    }

    async fn create_bounty(&self, new: NewBounty) -> Result<Bounty, StoreError> {
        let mut records = self.records.write();
        let id = records.next_id();
        let bounty = Bounty::open(id, Timestamp::now(), new)?;
        records.put(bounty.clone());
        tracing::debug!(bounty_id = %bounty.id, creator = %bounty.creator_id, "bounty stored");
        Ok(bounty)
    }

    async fn update_bounty_status(
        &self,
        id: &BountyId,
        status: BountyStatus,
        worker: Option<ActorId>,
    ) -> Result<Bounty, StoreError> {
        let mut records = self.records.write();
        let current = records
            .bounties
            .get_mut(id)
            .ok_or_else(|| StoreError::NotFound(id.clone()))?;
        let mut next = current.clone();
        next.status = status;
        if worker.is_some() {
            next.worker_id = worker;
        }
        if !next.satisfies_worker_invariant() {
            return Err(StoreError::WorkerOnOpenBounty(id.clone()));
        }
        *current = next.clone();
        Ok(next)
    }

    async fn commit_transition(
        &self,
        id: &BountyId,
        expected: BountyStatus,
        to: BountyStatus,
        worker: Option<ActorId>,
    ) -> Result<Bounty, StoreError> {
        let mut records = self.records.write();
        let current = records
            .bounties
            .get_mut(id)
            .ok_or_else(|| StoreError::NotFound(id.clone()))?;
        if current.status != expected {
            return Err(StoreError::StatusChanged {
                id: id.clone(),
                expected,
                actual: current.status,
            });
        }
        let mut next = current.clone();
        next.status = to;
        if worker.is_some() {
            next.worker_id = worker;
        }
        if !next.satisfies_worker_invariant() {
            return Err(StoreError::WorkerOnOpenBounty(id.clone()));
        }
        *current = next.clone();
        Ok(next)
    }

    async fn messages_for_bounty(&self, id: &BountyId) -> Result<Vec<ChatMessage>, StoreError> {
        let records = self.records.read();
        let mut messages: Vec<ChatMessage> = records
            .messages
            .iter()
            .filter(|m| &m.bounty_id == id)
            .cloned()
            .collect();
        // Stable: equal timestamps keep insertion order.
        messages.sort_by_key(|m| m.timestamp);
        Ok(messages)
    }

    async fn send_message(
        &self,
        bounty: &BountyId,
        sender: &ActorId,
        content: String,
    ) -> Result<ChatMessage, StoreError> {
        let content = content.trim().to_string();
        if content.is_empty() {
            return Err(StoreError::EmptyMessage);
        }
        let message = {
            let mut records = self.records.write();
            if !records.bounties.contains_key(bounty) {
                return Err(StoreError::NotFound(bounty.clone()));
            }
            let message = ChatMessage {
                id: MessageId::new(),
                bounty_id: bounty.clone(),
                sender_id: sender.clone(),
                content,
                timestamp: Timestamp::now(),
            };
            records.messages.push(message.clone());
            message
        };
        // No receivers is not an error.
        let _ = self.messages_tx.send(message.clone());
        Ok(message)
    }

    fn subscribe_messages(&self) -> broadcast::Receiver<ChatMessage> {
        self.messages_tx.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use nebula_core::Reward;

    use super::*;

    fn actor(id: &str) -> ActorId {
        ActorId::new(id).unwrap()
    }

    fn draft(title: &str, creator: &str) -> NewBounty {
        NewBounty {
            title: title.into(),
            description: format!("{title} description"),
            reward: Reward::new(1.0).unwrap(),
            deadline: None,
            creator_id: actor(creator),
            tags: BTreeSet::new(),
        }
    }

    #[tokio::test]
    async fn create_assigns_sequential_ids() {
        let store = InMemoryStore::new();
        let a = store.create_bounty(draft("a", "alice")).await.unwrap();
        let b = store.create_bounty(draft("b", "alice")).await.unwrap();
        assert_eq!(a.id.as_str(), "bounty1");
        assert_eq!(b.id.as_str(), "bounty2");
        assert_eq!(a.status, BountyStatus::Open);
        assert!(a.worker_id.is_none());
    }

    #[tokio::test]
    async fn create_rejects_deadline_before_creation() {
        let store = InMemoryStore::new();
        let mut new = draft("late", "alice");
        new.deadline = Some(Timestamp::parse("2000-01-01T00:00:00Z").unwrap());
        let err = store.create_bounty(new).await.unwrap_err();
        assert!(matches!(err, StoreError::InvalidRecord(_)));
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn inserted_fixture_ids_advance_sequence() {
        let store = InMemoryStore::new();
        let fixture = Bounty::open(BountyId::sequential(6), Timestamp::now(), draft("f", "bob")).unwrap();
        store.insert_bounty(fixture).unwrap();
        let created = store.create_bounty(draft("next", "bob")).await.unwrap();
        assert_eq!(created.id.as_str(), "bounty7");
    }

    #[tokio::test]
    async fn list_preserves_creation_order() {
        let store = InMemoryStore::new();
        for title in ["one", "two", "three"] {
            store.create_bounty(draft(title, "alice")).await.unwrap();
        }
        let titles: Vec<String> = store
            .list_bounties()
            .await
            .unwrap()
            .into_iter()
            .map(|b| b.title)
            .collect();
        assert_eq!(titles, ["one", "two", "three"]);
    }

    #[tokio::test]
    async fn load_by_role_and_status() {
        let store = InMemoryStore::new();
        let a = store.create_bounty(draft("a", "alice")).await.unwrap();
        store.create_bounty(draft("b", "bob")).await.unwrap();
        store
            .commit_transition(&a.id, BountyStatus::Open, BountyStatus::InProgress, Some(actor("carol")))
            .await
            .unwrap();

        let created = store.load_bounties_for_actor(&actor("alice"), ActorRole::Creator).await.unwrap();
        assert_eq!(created.len(), 1);
        let working = store.load_bounties_for_actor(&actor("carol"), ActorRole::Worker).await.unwrap();
        assert_eq!(working[0].id, a.id);
        let open = store.load_bounties_by_status(BountyStatus::Open).await.unwrap();
        assert_eq!(open.len(), 1);
        assert_eq!(open[0].title, "b");
    }

    #[tokio::test]
    async fn commit_rejects_stale_precondition() {
        let store = InMemoryStore::new();
        let a = store.create_bounty(draft("a", "alice")).await.unwrap();
        let err = store
            .commit_transition(&a.id, BountyStatus::PendingReview, BountyStatus::Completed, None)
            .await
            .unwrap_err();
        assert_eq!(
            err,
            StoreError::StatusChanged {
                id: a.id.clone(),
                expected: BountyStatus::PendingReview,
                actual: BountyStatus::Open,
            }
        );
        let unchanged = store.load_bounty(&a.id).await.unwrap().unwrap();
        assert_eq!(unchanged, a);
    }

    #[tokio::test]
    async fn update_keeps_worker_when_none_given() {
        let store = InMemoryStore::new();
        let a = store.create_bounty(draft("a", "alice")).await.unwrap();
        store
            .update_bounty_status(&a.id, BountyStatus::InProgress, Some(actor("carol")))
            .await
            .unwrap();
        let b = store
            .update_bounty_status(&a.id, BountyStatus::PendingReview, None)
            .await
            .unwrap();
        assert_eq!(b.worker_id, Some(actor("carol")));
    }

    #[tokio::test]
    async fn update_refuses_open_with_worker() {
        let store = InMemoryStore::new();
        let a = store.create_bounty(draft("a", "alice")).await.unwrap();
        let err = store
            .update_bounty_status(&a.id, BountyStatus::Open, Some(actor("carol")))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::WorkerOnOpenBounty(_)));
        assert!(store.load_bounty(&a.id).await.unwrap().unwrap().worker_id.is_none());
    }

    #[tokio::test]
    async fn unknown_ids_are_not_found() {
        let store = InMemoryStore::new();
        let id = BountyId::sequential(42);
        assert!(store.load_bounty(&id).await.unwrap().is_none());
        assert!(matches!(
            store.update_bounty_status(&id, BountyStatus::Closed, None).await,
            Err(StoreError::NotFound(_))
        ));
        assert!(matches!(
            store.send_message(&id, &actor("alice"), "hi".into()).await,
            Err(StoreError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn send_message_pushes_to_subscribers() {
        let store = InMemoryStore::new();
        let a = store.create_bounty(draft("a", "alice")).await.unwrap();
        let mut rx = store.subscribe_messages();

        let sent = store.send_message(&a.id, &actor("alice"), "  hello  ".into()).await.unwrap();
        assert_eq!(sent.content, "hello");

        let received = rx.recv().await.unwrap();
        assert_eq!(received, sent);
        assert_eq!(store.messages_for_bounty(&a.id).await.unwrap(), vec![sent]);
    }

    #[tokio::test]
    async fn empty_message_rejected() {
        let store = InMemoryStore::new();
        let a = store.create_bounty(draft("a", "alice")).await.unwrap();
        let err = store.send_message(&a.id, &actor("alice"), "   ".into()).await.unwrap_err();
        assert_eq!(err, StoreError::EmptyMessage);
        assert!(store.messages_for_bounty(&a.id).await.unwrap().is_empty());
    }
}
