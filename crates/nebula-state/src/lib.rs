//! # nebula-state — Bounty Lifecycle State Machine
//!
//! Defines the states a bounty moves through, the guarded transition
//! table, and the pure transition function that every writer of
//! `status`/`worker_id` goes through.
//!
//! ```text
//! open ──▶ in-progress ──▶ pending-review ──┬──▶ completed ──┐
//!                                           │                ▼
//!                                           └──────────▶ dispute ◀─┐ (re-entrant)
//!                                                            └─────┘
//! pending-review / completed / dispute ──▶ closed (terminal)
//! ```
//!
//! ## Design
//!
//! The lifecycle uses an enum plus a static edge table rather than one
//! type per state. Bounties are loaded from a store at runtime, so the
//! state is only known at runtime; `Bounty::transition()` returns
//! `Result` and rejects non-edges and guard failures with structured
//! errors naming the attempted pair.
//!
//! The machine is pure. It returns an updated copy of the bounty and
//! performs no I/O; committing the result is the caller's job.

pub mod bounty;
pub mod lifecycle;

pub use bounty::{Bounty, LifecycleError, NewBounty};
pub use lifecycle::{BountyStatus, Edge, Guard, SideEffect, TRANSITIONS};
