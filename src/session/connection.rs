//! Connection wrapper: frames in, frames out.
//!
//! Frames are delimited by their closing ']'. Bytes read past a frame stay
//! buffered for the next call, so several frames in one read, or a frame
//! split over many reads, both come out whole.

use super::SessionSettings;
use crate::error::TransportError;
use crate::types::{Frame, SessionId};
use std::fmt::Display;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info};

/// Result of waiting for the next frame
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Inbound {
    /// One complete frame
    Frame(Frame),
    /// The peer closed the connection or the read failed
    Closed,
}

/// One agent connection
pub struct Session<S> {
    id: SessionId,
    stream: S,
    buffer: Vec<u8>,
    chunk: Vec<u8>,
    max_frame_len: usize,
    open: bool,
    shutdown: CancellationToken,
}

impl<S> Session<S>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    pub fn new(
        id: SessionId,
        stream: S,
        settings: &SessionSettings,
        shutdown: CancellationToken,
    ) -> Self {
        Self {
            id,
            stream,
            buffer: Vec::with_capacity(256),
            chunk: vec![0; settings.read_chunk_size.max(1)],
            max_frame_len: settings.max_frame_len,
            open: true,
            shutdown,
        }
    }

    pub fn id(&self) -> SessionId {
        self.id
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    /// Process-wide shutdown signal this session observes
    pub fn shutdown_signal(&self) -> &CancellationToken {
        &self.shutdown
    }

    /// Wait for the next complete frame
    ///
    /// Cancellation safe: dropping the future never loses buffered bytes.
    /// A clean close is logged as info; any other read error is logged as an
    /// error. Both come back as [`Inbound::Closed`].
    pub async fn read_frame(&mut self) -> Inbound {
        loop {
            if let Some(frame) = self.take_buffered_frame() {
                debug!(session_id = self.id, frame = %frame, "Received frame");
                return Inbound::Frame(frame);
            }
            if !self.open {
                return Inbound::Closed;
            }

            match self.stream.read(&mut self.chunk).await {
                Ok(0) => {
                    self.log_info("Peer closed the connection");
                    return Inbound::Closed;
                }
                Ok(read) => self.buffer.extend_from_slice(&self.chunk[..read]),
                Err(e) => {
                    self.log_error(format!("Cannot read message: {}", e));
                    return Inbound::Closed;
                }
            }
        }
    }

    fn take_buffered_frame(&mut self) -> Option<Frame> {
        // Whitespace between frames (e.g. line endings from a terminal client)
        let leading = self
            .buffer
            .iter()
            .take_while(|b| b.is_ascii_whitespace())
            .count();
        self.buffer.drain(..leading);

        if let Some(end) = self.buffer.iter().position(|&b| b == b']') {
            let bytes: Vec<u8> = self.buffer.drain(..=end).collect();
            return Some(String::from_utf8_lossy(&bytes).into_owned());
        }

        if self.buffer.len() > self.max_frame_len {
            // Handed on unterminated so decoding rejects it
            self.log_error(format!(
                "Frame exceeds {} bytes without a closing ']'",
                self.max_frame_len
            ));
            let bytes = std::mem::take(&mut self.buffer);
            return Some(String::from_utf8_lossy(&bytes).into_owned());
        }

        None
    }

    /// Write one frame and flush it
    ///
    /// Failures are logged here; the error is returned so the caller can
    /// abort the session.
    pub async fn write_frame(&mut self, frame: &str) -> Result<(), TransportError> {
        if !self.open {
            self.log_error(format!("Could not send message '{}': connection closed", frame));
            return Err(TransportError::Closed);
        }

        let written = match self.stream.write_all(frame.as_bytes()).await {
            Ok(()) => self.stream.flush().await,
            Err(e) => Err(e),
        };

        if let Err(e) = written {
            self.log_error(format!("Could not send message '{}': {}", frame, e));
            return Err(TransportError::Io(e));
        }

        debug!(session_id = self.id, frame, "Sent frame");
        Ok(())
    }

    /// Shut the stream down; errors are logged, never returned
    pub async fn close(&mut self) {
        if !self.open {
            return;
        }
        self.open = false;
        self.buffer.clear();

        if let Err(e) = self.stream.shutdown().await {
            self.log_error(format!("Error while closing connection: {}", e));
        }
    }

    pub fn log_info(&self, message: impl Display) {
        info!(session_id = self.id, "{}", message);
    }

    pub fn log_error(&self, message: impl Display) {
        error!(session_id = self.id, "{}", message);
    }
}
