//! Session capability: who is issuing commands.

use nebula_core::ActorId;
use parking_lot::RwLock;

/// Resolves the current actor. `None` means nobody is logged in.
pub trait Session: Send + Sync {
    fn current_actor(&self) -> Option<ActorId>;
}

/// A fixed actor, or permanently anonymous.
#[derive(Debug, Clone, Default)]
pub struct StaticSession(Option<ActorId>);

impl StaticSession {
    pub fn new(actor: Option<ActorId>) -> Self {
        Self(actor)
    }

    pub fn anonymous() -> Self {
        Self(None)
    }
}

impl Session for StaticSession {
    fn current_actor(&self) -> Option<ActorId> {
        self.0.clone()
    }
}

/// A session whose actor can log in and out at runtime.
#[derive(Debug, Default)]
pub struct SharedSession {
    actor: RwLock<Option<ActorId>>,
}

impl SharedSession {
    pub fn new(actor: Option<ActorId>) -> Self {
        Self {
            actor: RwLock::new(actor),
        }
    }

    /// Log `actor` in, returning whoever was logged in before.
    pub fn login(&self, actor: ActorId) -> Option<ActorId> {
        tracing::info!(actor = %actor, "session login");
        self.actor.write().replace(actor)
    }

    /// Log out, returning the actor that was logged in.
    pub fn logout(&self) -> Option<ActorId> {
        let previous = self.actor.write().take();
        if let Some(actor) = &previous {
            tracing::info!(actor = %actor, "session logout");
        }
        previous
    }
}

impl Session for SharedSession {
    fn current_actor(&self) -> Option<ActorId> {
        self.actor.read().clone()
    }
}
