//! # nebula-store — Bounty and Chat Persistence
//!
//! The store exclusively owns bounty and chat records. Everything above
//! it (the command interpreter, the HTTP surface, the CLI) reaches the
//! records through the [`BountyStore`] trait, injected as
//! `Arc<dyn BountyStore>`.
//!
//! - [`store`]: the async contract, record types and [`StoreError`].
//! - [`memory`]: [`InMemoryStore`], a volatile implementation guarded by a
//!   single `parking_lot::RwLock`. Writes are atomic: a record is fully
//!   replaced or the write fails.
//! - [`seed`]: demo fixtures (six bounties, eight chat messages).
//!
//! Chat delivery is push-based. Every successful `send_message` is
//! broadcast to receivers obtained from [`BountyStore::subscribe_messages`].

pub mod memory;
pub mod seed;
pub mod store;

pub use memory::InMemoryStore;
pub use seed::DEMO_CURRENT_USER;
pub use store::{ActorRole, BountyStore, ChatMessage, StoreError};
