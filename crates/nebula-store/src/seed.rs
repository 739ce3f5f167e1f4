//! Demo fixtures: the marketplace as seen by `user1`.
//!
//! Six bounties across every non-terminal state plus two chat threads.
//! `user1` works on four bounties and created none, so a fresh
//! `check status` from `user1` reports `0` created and `4` working.

use std::collections::BTreeSet;

use nebula_core::{ActorId, BountyId, MessageId, Reward, Timestamp};
use nebula_state::{Bounty, BountyStatus};

use crate::memory::InMemoryStore;
use crate::store::{ChatMessage, StoreError};

/// The actor logged in by default when demo data is loaded.
pub const DEMO_CURRENT_USER: &str = "user1";

struct BountyFixture {
    id: &'static str,
    title: &'static str,
    description: &'static str,
    reward: f64,
    status: BountyStatus,
    created_at: &'static str,
    deadline: &'static str,
    creator: &'static str,
    worker: Option<&'static str>,
    tags: &'static [&'static str],
}

const BOUNTIES: &[BountyFixture] = &[
    BountyFixture {
        id: "bounty1",
        title: "Develop Smart Contract for NFT Marketplace",
        description: "Create a secure and gas-efficient smart contract for an NFT marketplace on the Mantle blockchain. The contract should handle listing, buying, selling, and royalties.",
        reward: 1.5,
        status: BountyStatus::Open,
        created_at: "2025-01-15T10:30:00Z",
        deadline: "2025-02-10T23:59:59Z",
        creator: "user2",
        worker: None,
        tags: &["smart-contract", "solidity", "nft", "blockchain"],
    },
    BountyFixture {
        id: "bounty2",
        title: "Design DeFi Dashboard UI/UX",
        description: "Design a modern and intuitive dashboard for a DeFi application. Focus on clear data visualization and smooth user experience.",
        reward: 0.8,
        status: BountyStatus::InProgress,
        created_at: "2025-01-10T14:20:00Z",
        deadline: "2025-01-25T23:59:59Z",
        creator: "user3",
        worker: Some("user1"),
        tags: &["design", "ui/ux", "defi", "dashboard"],
    },
    BountyFixture {
        id: "bounty3",
        title: "Optimize Gas Usage in Existing Contract",
        description: "Review and optimize gas usage in an existing DEX contract. Identify inefficiencies and implement improvements.",
        reward: 0.5,
        status: BountyStatus::PendingReview,
        created_at: "2025-01-05T09:15:00Z",
        deadline: "2025-01-20T23:59:59Z",
        creator: "user4",
        worker: Some("user1"),
        tags: &["optimization", "gas", "solidity", "dex"],
    },
    BountyFixture {
        id: "bounty4",
        title: "Create Logo for Blockchain Startup",
        description: "Design a unique and memorable logo for a new blockchain startup focused on decentralized identity solutions.",
        reward: 0.3,
        status: BountyStatus::Completed,
        created_at: "2024-12-28T11:45:00Z",
        deadline: "2025-01-10T23:59:59Z",
        creator: "user5",
        worker: Some("user1"),
        tags: &["design", "logo", "branding", "identity"],
    },
    BountyFixture {
        id: "bounty5",
        title: "Implement Multi-sig Wallet",
        description: "Develop a multi-signature wallet contract that requires M-of-N signatures to execute transactions.",
        reward: 1.2,
        status: BountyStatus::Open,
        created_at: "2025-01-17T16:40:00Z",
        deadline: "2025-02-15T23:59:59Z",
        creator: "user2",
        worker: None,
        tags: &["wallet", "multi-sig", "solidity", "security"],
    },
    BountyFixture {
        id: "bounty6",
        title: "Write Technical Documentation",
        description: "Create comprehensive technical documentation for a DeFi lending protocol, including architecture, API references, and examples.",
        reward: 0.6,
        status: BountyStatus::Dispute,
        created_at: "2025-01-08T13:25:00Z",
        deadline: "2025-01-22T23:59:59Z",
        creator: "user3",
        worker: Some("user1"),
        tags: &["documentation", "technical-writing", "defi", "lending"],
    },
];

/// `(bounty, sender, content, timestamp)`
const MESSAGES: &[(&str, &str, &str, &str)] = &[
    ("bounty2", "user3", "How is the dashboard design coming along?", "2025-01-16T10:30:00Z"),
    ("bounty2", "user1", "Going well! I've completed the main layout and working on the charts now.", "2025-01-16T10:35:00Z"),
    ("bounty2", "user3", "Great! Can you share a preview when you have something to show?", "2025-01-16T10:40:00Z"),
    ("bounty2", "user1", "Sure, I'll have a preview ready by tomorrow.", "2025-01-16T10:42:00Z"),
    ("bounty6", "user3", "The documentation is missing API examples and integration guides.", "2025-01-14T15:30:00Z"),
    ("bounty6", "user1", "The API examples were not part of the original requirements. I can add them but would need to adjust the timeline.", "2025-01-14T15:40:00Z"),
    ("bounty6", "user3", "They were definitely part of the requirements. I'm rejecting this submission.", "2025-01-14T16:30:00Z"),
    ("bounty6", "user1", "I'm initiating a dispute as this was not explicitly stated in the bounty description.", "2025-01-14T16:45:00Z"),
];

impl BountyFixture {
    fn build(&self) -> Result<Bounty, StoreError> {
        let worker_id = self.worker.map(ActorId::new).transpose()?;
        Ok(Bounty {
            id: BountyId::new(self.id)?,
            title: self.title.to_string(),
            description: self.description.to_string(),
            reward: Reward::new(self.reward)?,
            status: self.status,
            created_at: Timestamp::parse(self.created_at)?,
            deadline: Some(Timestamp::parse(self.deadline)?),
            creator_id: ActorId::new(self.creator)?,
            worker_id,
            tags: self.tags.iter().map(|t| t.to_string()).collect::<BTreeSet<_>>(),
        })
    }
}

/// Load the demo bounties and chat history into `store`.
pub fn seed_demo(store: &InMemoryStore) -> Result<(), StoreError> {
    for fixture in BOUNTIES {
        store.insert_bounty(fixture.build()?)?;
    }
    for (bounty, sender, content, timestamp) in MESSAGES {
        store.insert_message(ChatMessage {
            id: MessageId::new(),
            bounty_id: BountyId::new(*bounty)?,
            sender_id: ActorId::new(*sender)?,
            content: (*content).to_string(),
            timestamp: Timestamp::parse(timestamp)?,
        })?;
    }
    tracing::info!(
        bounties = BOUNTIES.len(),
        messages = MESSAGES.len(),
        "demo fixtures loaded"
    );
    Ok(())
}

impl InMemoryStore {
    /// A store pre-populated with [`seed_demo`].
    pub fn with_demo_data() -> Result<Self, StoreError> {
        let store = Self::new();
        seed_demo(&store)?;
        Ok(store)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{ActorRole, BountyStore};

    #[tokio::test]
    async fn demo_data_loads() {
        let store = InMemoryStore::with_demo_data().unwrap();
        assert_eq!(store.len(), 6);
        let user1 = ActorId::new(DEMO_CURRENT_USER).unwrap();
        let working = store.load_bounties_for_actor(&user1, ActorRole::Worker).await.unwrap();
        assert_eq!(working.len(), 4);
        let created = store.load_bounties_for_actor(&user1, ActorRole::Creator).await.unwrap();
        assert!(created.is_empty());
    }

    #[tokio::test]
    async fn demo_chat_is_chronological() {
        let store = InMemoryStore::with_demo_data().unwrap();
        let thread = store.messages_for_bounty(&BountyId::new("bounty6").unwrap()).await.unwrap();
        assert_eq!(thread.len(), 4);
        assert!(thread.windows(2).all(|w| w[0].timestamp <= w[1].timestamp));
        assert!(store
            .messages_for_bounty(&BountyId::new("bounty1").unwrap())
            .await
            .unwrap()
            .is_empty());
    }

    #[tokio::test]
    async fn created_bounties_follow_fixtures() {
        let store = InMemoryStore::with_demo_data().unwrap();
        let created = store
            .create_bounty(nebula_state::NewBounty {
                title: "New Task".into(),
                description: String::new(),
                reward: Reward::default_command_reward(),
                deadline: None,
                creator_id: ActorId::new("user1").unwrap(),
                tags: BTreeSet::new(),
            })
            .await
            .unwrap();
        assert_eq!(created.id.as_str(), "bounty7");
    }

    #[test]
    fn fixtures_satisfy_worker_invariant() {
        for fixture in BOUNTIES {
            assert!(fixture.build().unwrap().satisfies_worker_invariant());
        }
    }
}
