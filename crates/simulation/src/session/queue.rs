use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::config::COMMAND_LOG_CAPACITY;
use crate::error::EvacError;

use super::commands::{CommandOutcome, SessionCommand, SessionParams};

/// Commands waiting for the next `PreSim` pass of a hosting `App`.
#[derive(Resource, Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CommandQueue {
    pending: Vec<SessionCommand>,
}

impl CommandQueue {
    pub fn push(&mut self, command: SessionCommand) {
        self.pending.push(command);
    }

    pub fn drain(&mut self) -> Vec<SessionCommand> {
        self.pending.drain(..).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }
}

/// Ring buffer of recently executed commands and their results.
#[derive(Resource, Debug, Clone, Default)]
pub struct CommandLog {
    entries: Vec<(SessionCommand, Result<CommandOutcome, EvacError>)>,
}

impl CommandLog {
    /// Record a result, evicting the oldest entry once full.
    pub fn push(&mut self, command: SessionCommand, result: Result<CommandOutcome, EvacError>) {
        if self.entries.len() >= COMMAND_LOG_CAPACITY {
            drop(self.entries.remove(0));
        }
        self.entries.push((command, result));
    }

    /// The most recent `n` entries (or fewer), oldest first.
    pub fn last_n(&self, n: usize) -> &[(SessionCommand, Result<CommandOutcome, EvacError>)] {
        let start = self.entries.len().saturating_sub(n);
        &self.entries[start..]
    }

    pub fn last(&self) -> Option<&(SessionCommand, Result<CommandOutcome, EvacError>)> {
        self.entries.last()
    }

    /// Number of rejected commands still held in the log.
    pub fn rejected_count(&self) -> usize {
        self.entries.iter().filter(|(_, r)| r.is_err()).count()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Drains all pending commands and applies them in order.
pub fn execute_queued_commands(
    mut queue: ResMut<CommandQueue>,
    mut log: ResMut<CommandLog>,
    mut params: SessionParams,
) {
    for command in queue.drain() {
        let result = params.apply(&command);
        if let Err(err) = &result {
            warn!("Command {:?} rejected: {}", command, err);
        }
        log.push(command, result);
    }
}
