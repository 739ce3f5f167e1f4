//! # Command Log
//!
//! Ephemeral command records and the bounded recent-history ring buffer
//! kept for display. The log is not authoritative state.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use nebula_core::Timestamp;

use crate::intent::Intent;

/// Entries retained by a default [`CommandLog`].
pub const RECENT_COMMANDS: usize = 10;

/// One interpreted command.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Command {
    /// Raw input text.
    pub input: String,
    /// Classified intent.
    pub intent: Intent,
    /// Set once a terminal response was produced.
    pub processed: bool,
    pub received_at: Timestamp,
}

/// Most-recent-first log of commands, capped at a fixed capacity.
#[derive(Debug, Clone)]
pub struct CommandLog {
    entries: VecDeque<Command>,
    capacity: usize,
}

impl CommandLog {
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Record a command, evicting the oldest entry when full.
    pub fn record(&mut self, command: Command) {
        self.entries.push_front(command);
        self.entries.truncate(self.capacity);
    }

    /// Entries, most recent first.
    pub fn recent(&self) -> Vec<Command> {
        self.entries.iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for CommandLog {
    fn default() -> Self {
        Self::new(RECENT_COMMANDS)
    }
}
