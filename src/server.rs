//! Agent listener
//!
//! Accepts TCP connections and runs one session task per connection until the
//! shutdown signal fires.

use crate::config::ServerSettings;
use crate::directory::Directory;
use crate::error::ApiError;
use crate::session::{run_session, Session, SessionIds, SessionSettings};
use std::io;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tokio_util::task::TaskTracker;
use tracing::{error, info};

/// Pause after a failed accept so a persistent error does not spin
const ACCEPT_BACKOFF: Duration = Duration::from_millis(100);

pub struct Listener {
    listener: TcpListener,
    settings: SessionSettings,
    directory: Arc<Directory>,
    ids: SessionIds,
    shutdown: CancellationToken,
    sessions: TaskTracker,
}

impl Listener {
    /// Bind the configured address
    pub async fn bind(
        settings: &ServerSettings,
        directory: Arc<Directory>,
        shutdown: CancellationToken,
    ) -> Result<Self, ApiError> {
        settings.validate()?;
        let listener = TcpListener::bind(settings.listen_addr.as_str())
            .await
            .map_err(|e| {
                io::Error::new(
                    e.kind(),
                    format!("Cannot listen on {}: {}", settings.listen_addr, e),
                )
            })?;

        Ok(Self {
            listener,
            settings: settings.session_settings(),
            directory,
            ids: SessionIds::new(),
            shutdown,
            sessions: TaskTracker::new(),
        })
    }

    pub fn local_addr(&self) -> Result<SocketAddr, ApiError> {
        Ok(self.listener.local_addr()?)
    }

    /// Every session task spawned by this listener
    ///
    /// Closed when [`Listener::run`] returns, so `wait()` resolves once the
    /// last session has finished.
    pub fn sessions(&self) -> TaskTracker {
        self.sessions.clone()
    }

    /// Accept connections until shutdown
    ///
    /// Returns as soon as the signal fires. Running sessions observe the same
    /// signal and wind down on their own; they are not awaited here.
    pub async fn run(self) {
        if let Ok(addr) = self.listener.local_addr() {
            info!(%addr, "Waiting for agents");
        }

        loop {
            tokio::select! {
                biased;
                () = self.shutdown.cancelled() => break,
                accepted = self.listener.accept() => match accepted {
                    Ok((stream, peer)) => self.spawn_session(stream, peer),
                    Err(e) => {
                        error!("Cannot accept connection: {}", e);
                        tokio::time::sleep(ACCEPT_BACKOFF).await;
                    }
                },
            }
        }

        self.sessions.close();
        info!(sessions = self.sessions.len(), "Listener stopped accepting connections");
    }

    fn spawn_session(&self, stream: tokio::net::TcpStream, peer: SocketAddr) {
        let id = self.ids.next_id();
        info!(session_id = id, %peer, "New session {} initiated", id);

        let session = Session::new(id, stream, &self.settings, self.shutdown.clone());
        self.sessions.spawn(run_session(
            session,
            self.directory.clone(),
            self.settings.heartbeat_timeout,
        ));
    }
}
