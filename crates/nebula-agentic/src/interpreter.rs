//! # Interpreter
//!
//! Ties the pipeline together. One [`Interpreter`] is built at process
//! start with its store and session injected, and shared behind `Arc`.
//!
//! ## Concurrency
//!
//! Commands are serialized through a `tokio::sync::Mutex` gate held for
//! the whole pipeline, including store calls. A command runs to a
//! terminal response before the next one is classified. The command log
//! uses a `parking_lot::Mutex` because it is never held across `.await`.

use std::sync::Arc;

use parking_lot::Mutex;
use serde::Serialize;

use nebula_core::{ActorId, Timestamp};
use nebula_store::BountyStore;

use crate::command::{Command, CommandLog};
use crate::dispatch::{Dispatcher, Outcome};
use crate::error::InterpretError;
use crate::extract::Extractor;
use crate::intent::{rule_for, Rule};
use crate::response;
use crate::session::{Session, StaticSession};

/// A rendered response together with the recorded command.
#[derive(Debug, Clone, Serialize)]
pub struct CommandReport {
    pub response: String,
    pub command: Command,
}

/// The natural-language command interpreter.
pub struct Interpreter {
    store: Arc<dyn BountyStore>,
    session: Arc<dyn Session>,
    extractor: Extractor,
    log: Mutex<CommandLog>,
    gate: tokio::sync::Mutex<()>,
}

impl std::fmt::Debug for Interpreter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Interpreter")
            .field("recent_commands", &self.log.lock().len())
            .finish_non_exhaustive()
    }
}

impl Interpreter {
    /// Build an interpreter over `store` with an anonymous session.
    pub fn new(store: Arc<dyn BountyStore>) -> Result<Self, regex::Error> {
        Ok(Self {
            store,
            session: Arc::new(StaticSession::anonymous()),
            extractor: Extractor::new()?,
            log: Mutex::new(CommandLog::default()),
            gate: tokio::sync::Mutex::new(()),
        })
    }

    /// Replace the session consulted by [`Interpreter::process_command`].
    pub fn with_session(mut self, session: Arc<dyn Session>) -> Self {
        self.session = session;
        self
    }

    pub fn store(&self) -> &Arc<dyn BountyStore> {
        &self.store
    }

    pub fn session(&self) -> &Arc<dyn Session> {
        &self.session
    }

    /// Interpret `input` on behalf of `actor` and return the response text.
    pub async fn interpret(&self, input: &str, actor: Option<&ActorId>) -> String {
        self.run(input, actor).await.response
    }

    /// Interpret `input` as the session's current actor.
    pub async fn process_command(&self, input: &str) -> String {
        let actor = self.session.current_actor();
        self.interpret(input, actor.as_ref()).await
    }

    /// Interpret `input` and return the response with the recorded command.
    pub async fn run(&self, input: &str, actor: Option<&ActorId>) -> CommandReport {
        let _turn = self.gate.lock().await;
        let received_at = Timestamp::now();

        let rule = rule_for(input);
        let intent = rule.intent;
        metrics::counter!("nebula_commands_total", "intent" => intent.as_str()).increment(1);
        tracing::debug!(%intent, actor = actor.map(ActorId::as_str), "command classified");

        let result = self.execute(rule, input, actor, received_at).await;
        match &result {
            Ok(_) => {}
            Err(err @ InterpretError::Internal(_)) => {
                tracing::error!(%intent, error = %err, "command failed");
            }
            Err(err) => {
                metrics::counter!("nebula_commands_refused_total", "kind" => err.kind())
                    .increment(1);
                tracing::warn!(%intent, kind = err.kind(), error = %err, "command refused");
            }
        }

        let command = Command {
            input: input.to_string(),
            intent,
            processed: true,
            received_at,
        };
        self.log.lock().record(command.clone());

        CommandReport {
            response: response::render(&result),
            command,
        }
    }

    /// The last commands processed, most recent first.
    pub fn recent_commands(&self) -> Vec<Command> {
        self.log.lock().recent()
    }

    async fn execute(
        &self,
        rule: &Rule,
        input: &str,
        actor: Option<&ActorId>,
        now: Timestamp,
    ) -> Result<Outcome, InterpretError> {
        let params = (rule.extract)(&self.extractor, input, now)?;
        tracing::debug!(intent = %rule.intent, ?params, "parameters extracted");
        Dispatcher::new(self.store.as_ref())
            .dispatch(input, params, actor)
            .await
    }
}
