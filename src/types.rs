//! Core types shared across roster components.

/// SessionId: per-connection identifier, also used as the registered agent's id
pub type SessionId = u64;

/// Frame: one complete bracketed protocol message, e.g. `[HELLO;name=a]`
pub type Frame = String;
