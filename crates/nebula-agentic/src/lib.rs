//! # nebula-agentic — Natural-Language Command Interpreter
//!
//! Turns free-form commands ("create a bounty for a landing page with a
//! reward of 0.5 ETH", "approve bounty3") into lifecycle transitions on
//! the bounty store.
//!
//! ```text
//! input ─▶ classify ─▶ extract ─▶ authorize ─▶ dispatch ─▶ render ─▶ response
//!          (intent)    (params)   (actor,      (state       (text)
//!                                  target)      machine +
//!                                               store commit)
//! ```
//!
//! Interpretation is deterministic keyword and pattern matching over an
//! ordered rule table ([`intent::RULES`]). Every path ends in a response
//! string; failures are [`InterpretError`] values rendered by
//! [`response::render`], never panics.
//!
//! The [`Interpreter`] takes its store and session as injected
//! capabilities and serializes commands through an async gate, so one
//! command runs to completion before the next starts.

pub mod authorization;
pub mod command;
pub mod dispatch;
pub mod error;
pub mod extract;
pub mod intent;
pub mod interpreter;
pub mod response;
pub mod session;

// Re-export primary types.
pub use command::{Command, CommandLog};
pub use dispatch::{transition_bounty, Outcome};
pub use error::{InterpretError, TransitionError};
pub use extract::{ExtractionError, Extractor, Parameters};
pub use intent::{classify, Intent};
pub use interpreter::{CommandReport, Interpreter};
pub use session::{Session, SharedSession, StaticSession};
