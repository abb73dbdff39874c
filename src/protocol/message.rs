//! Protocol messages
//!
//! Decoded inbound messages and the literal frames the server sends back.

use std::collections::HashMap;

/// Server reply to a valid HELLO
pub const HI: &str = "[HI]";

/// Sent on entry to skill enumeration
pub const TELL_ME_SKILLS: &str = "[TELLMESKILLS]";

/// Server reply to THATSALL, confirms registration
pub const THANKS: &str = "[THANKS]";

/// Farewell; sent by the server on termination and accepted from clients
pub const BYE: &str = "[BYE]";

pub(crate) const HELLO_PREFIX: &str = "[HELLO;";
pub(crate) const SKILL_PREFIX: &str = "[SKILL;";
pub(crate) const THATS_ALL: &str = "[THATSALL]";
pub(crate) const STILL_HERE: &str = "[IAMSTILLHERE]";

/// Decoded `[HELLO;name=...;k=v...]`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HelloMessage {
    pub name: String,
    /// Every pair except `name`
    pub traits: HashMap<String, String>,
}

/// Decoded `[SKILL;name=...;type=...;k=v...]`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkillMessage {
    pub name: String,
    pub kind: String,
    /// Every pair except `name` and `type`
    pub traits: HashMap<String, String>,
}
