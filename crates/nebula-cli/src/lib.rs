//! # nebula-cli — Command-Line Interface
//!
//! Library half of the `nebula` binary. Each subcommand lives in its own
//! module with an `Args` struct and a `run_*` handler returning an exit
//! code.
//!
//! Every invocation builds a fresh volatile store, optionally seeded with
//! the demo fixtures, so state does not persist between runs. The REPL is
//! the way to issue several commands against the same store.

pub mod bounty;
pub mod interpret;
pub mod repl;

use std::sync::Arc;

use anyhow::{Context as _, Result};

use nebula_agentic::{Interpreter, Session, SharedSession};
use nebula_core::ActorId;
use nebula_store::{InMemoryStore, DEMO_CURRENT_USER};

/// Store, session and interpreter shared by all subcommands.
pub struct Context {
    pub store: Arc<InMemoryStore>,
    pub session: Arc<SharedSession>,
    pub interpreter: Interpreter,
}

impl Context {
    /// Build the context.
    ///
    /// With `seed`, the demo fixtures are loaded and `user1` is logged in
    /// unless `actor` names someone else. Without `seed`, the session
    /// starts with `actor` or anonymous.
    pub fn build(seed: bool, actor: Option<&str>) -> Result<Self> {
        let store = if seed {
            InMemoryStore::with_demo_data().context("loading demo fixtures")?
        } else {
            InMemoryStore::new()
        };
        let actor = match actor {
            Some(id) => Some(ActorId::new(id).with_context(|| format!("invalid actor {id:?}"))?),
            None if seed => Some(ActorId::new(DEMO_CURRENT_USER)?),
            None => None,
        };

        let store = Arc::new(store);
        let session = Arc::new(SharedSession::new(actor));
        let interpreter = Interpreter::new(store.clone())
            .context("compiling command patterns")?
            .with_session(session.clone());
        Ok(Self {
            store,
            session,
            interpreter,
        })
    }

    /// The actor currently logged in.
    pub fn current_actor(&self) -> Option<ActorId> {
        self.session.current_actor()
    }
}
