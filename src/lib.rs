//! Roster: Agent Directory Server
//!
//! Agents connect over TCP, introduce themselves and their skills using a
//! small bracketed text protocol, then keep the registration alive with
//! heartbeats. The server keeps every registered agent in a shared in-memory
//! [`directory::Directory`] until the agent leaves, misbehaves or goes silent.

pub mod config;
pub mod directory;
pub mod error;
pub mod logging;
pub mod protocol;
pub mod server;
pub mod session;
pub mod types;
