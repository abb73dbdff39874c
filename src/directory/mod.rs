//! Agent Directory
//!
//! Process-wide, in-memory map from agent id to [`Agent`]. Many sessions read
//! and write it concurrently; a single readers-writer lock serialises writers
//! against everything else. The lock is only ever held for the map operation
//! itself, so a stalled connection can never block another session's access.

mod agent;

pub use agent::{Agent, Skill};

use crate::error::DirectoryError;
use crate::types::SessionId;
use parking_lot::RwLock;
use std::collections::HashMap;
use tracing::debug;

/// Shared directory of registered agents
///
/// Create one at startup and hand it to every session as `Arc<Directory>`.
#[derive(Debug, Default)]
pub struct Directory {
    agents: RwLock<HashMap<SessionId, Agent>>,
}

impl Directory {
    /// Create an empty directory
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a fully built agent
    ///
    /// An existing entry is never overwritten.
    pub fn register(&self, agent: Agent) -> Result<(), DirectoryError> {
        let mut agents = self.agents.write();
        if agents.contains_key(&agent.id) {
            return Err(DirectoryError::DuplicateId(agent.id));
        }

        debug!(agent_id = agent.id, name = %agent.name, skills = agent.skills.len(), "Registered agent");
        agents.insert(agent.id, agent);
        Ok(())
    }

    /// Remove an agent; absent ids are ignored
    pub fn unregister(&self, id: SessionId) -> Option<Agent> {
        let removed = self.agents.write().remove(&id);
        if removed.is_some() {
            debug!(agent_id = id, "Unregistered agent");
        }
        removed
    }

    /// Get a copy of an agent by id
    pub fn get_by_id(&self, id: SessionId) -> Result<Agent, DirectoryError> {
        self.agents
            .read()
            .get(&id)
            .cloned()
            .ok_or(DirectoryError::NotFound(id))
    }

    /// Point-in-time snapshot of every registered agent
    ///
    /// Order is unspecified. Later mutations do not affect the returned copy.
    pub fn list_all(&self) -> Vec<Agent> {
        self.agents.read().values().cloned().collect()
    }

    /// Number of registered agents
    pub fn len(&self) -> usize {
        self.agents.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.agents.read().is_empty()
    }
}
