//! Agent and skill records.

use crate::protocol::{HelloMessage, SkillMessage};
use crate::types::SessionId;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One named, typed capability announced by an agent
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Skill {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    /// Extra pairs, never `name` or `type`
    #[serde(default)]
    pub traits: HashMap<String, String>,
}

impl From<SkillMessage> for Skill {
    fn from(message: SkillMessage) -> Self {
        Self {
            name: message.name,
            kind: message.kind,
            traits: message.traits,
        }
    }
}

/// A connected agent and its declared capabilities
///
/// Built during the handshake and only visible in the directory once skill
/// enumeration has finished.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Agent {
    /// Same value as the owning session's id
    pub id: SessionId,
    pub name: String,
    /// Extra HELLO pairs, never `name`
    #[serde(default)]
    pub traits: HashMap<String, String>,
    /// Skills in announcement order
    #[serde(default)]
    pub skills: Vec<Skill>,
}

impl Agent {
    /// Create an agent with no skills yet
    pub fn new(id: SessionId, name: String, traits: HashMap<String, String>) -> Self {
        Self {
            id,
            name,
            traits,
            skills: Vec::new(),
        }
    }

    /// Create an agent from a decoded HELLO
    pub fn from_hello(id: SessionId, hello: HelloMessage) -> Self {
        Self::new(id, hello.name, hello.traits)
    }

    /// Append a skill; earlier skills are never modified
    pub fn add_skill(&mut self, skill: Skill) {
        self.skills.push(skill);
    }
}
