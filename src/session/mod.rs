//! Agent Sessions
//!
//! One session per accepted connection. [`Session`] owns the byte stream and
//! turns it into frames; the state machine in [`state`] decides what each
//! frame means, and [`run_session`] drives the two against the shared
//! directory until the session terminates.

pub mod connection;
mod machine;
pub mod state;

pub use connection::{Inbound, Session};
pub use machine::run_session;
pub use state::{transition, Effect, Event, SessionState, Transition};

use crate::types::SessionId;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

/// Default heartbeat deadline after registration
pub const DEFAULT_HEARTBEAT_TIMEOUT: Duration = Duration::from_secs(10);

/// Default transport read size
pub const DEFAULT_READ_CHUNK_SIZE: usize = 32;

/// Default upper bound for one frame before it is rejected
pub const DEFAULT_MAX_FRAME_LEN: usize = 4096;

/// Per-session tuning
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionSettings {
    /// How long a registered agent may stay silent
    pub heartbeat_timeout: Duration,
    /// Bytes requested from the transport per read
    pub read_chunk_size: usize,
    /// Buffered bytes without a closing ']' before the frame is cut off
    pub max_frame_len: usize,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            heartbeat_timeout: DEFAULT_HEARTBEAT_TIMEOUT,
            read_chunk_size: DEFAULT_READ_CHUNK_SIZE,
            max_frame_len: DEFAULT_MAX_FRAME_LEN,
        }
    }
}

/// Monotonic session id source
///
/// Ids are never reused for the lifetime of the generator; the listener owns
/// one for the whole process run.
#[derive(Debug, Default)]
pub struct SessionIds {
    next: AtomicU64,
}

impl SessionIds {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate the next id
    pub fn next_id(&self) -> SessionId {
        self.next.fetch_add(1, Ordering::Relaxed)
    }
}
