//! Integration tests for the roster agent server over real TCP connections

mod handshake;
mod heartbeat;
mod shutdown;
mod support;
