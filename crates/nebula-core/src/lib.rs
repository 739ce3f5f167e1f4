//! # nebula-core — Foundational Types for the Bounty Stack
//!
//! Leaf of the workspace dependency graph. Defines the primitives every
//! other crate speaks in: identifiers, timestamps, and reward amounts.
//!
//! ## Key Design Principles
//!
//! 1. **Newtype wrappers for domain primitives.** `BountyId`, `ActorId` and
//!    `MessageId` are distinct types. An actor id cannot be passed where a
//!    bounty id is expected.
//!
//! 2. **Validated constructors.** `Reward::new()` rejects negative and
//!    non-finite amounts, identifiers reject empty or whitespace-bearing
//!    input. Invalid economic data never enters the store.
//!
//! 3. **UTC-only timestamps.** `Timestamp` is UTC, truncated to seconds.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `nebula-*` crates.
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod error;
pub mod identity;
pub mod reward;
pub mod temporal;

// Re-export primary types for ergonomic imports.
pub use error::ValidationError;
pub use identity::{ActorId, BountyId, MessageId};
pub use reward::Reward;
pub use temporal::Timestamp;
