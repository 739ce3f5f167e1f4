//! # API Route Modules
//!
//! - [`commands`]: natural-language commands through the interpreter.
//! - [`bounties`]: listing, lookup, creation and lifecycle transitions.
//! - [`chat`]: per-bounty messages.
//! - [`actors`]: bounties by actor and role.

pub mod actors;
pub mod bounties;
pub mod chat;
pub mod commands;
