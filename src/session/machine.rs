//! Session runner: waits for events, applies transitions, performs effects.

use super::connection::Session;
use super::state::{transition, Effect, Event, SessionState};
use crate::directory::Directory;
use crate::protocol::BYE;
use std::mem::discriminant;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::time::timeout;
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// Upper bound on the farewell write; the peer may have stopped reading
const FAREWELL_TIMEOUT: Duration = Duration::from_secs(1);

/// Drive one session from HELLO to termination
///
/// Every exit path ends in the terminal state: the agent is unregistered
/// if this session registered it, BYE is attempted when the peer is
/// believed to still be listening, and the connection is closed.
pub async fn run_session<S>(
    mut session: Session<S>,
    directory: Arc<Directory>,
    heartbeat_timeout: Duration,
) where
    S: AsyncRead + AsyncWrite + Unpin,
{
    let shutdown = session.shutdown_signal().clone();
    let mut state = SessionState::Hello;
    let mut registered = false;

    loop {
        if let SessionState::Terminated { farewell } = state {
            terminate(&mut session, &directory, farewell, registered).await;
            return;
        }

        let event = next_event(&mut session, &shutdown, &state, heartbeat_timeout).await;

        let from = state.name();
        let previous = discriminant(&state);
        let step = transition(session.id(), state, event);
        let entered = discriminant(&step.next) != previous;

        state = perform(&mut session, &directory, step.next, step.effects, &mut registered).await;
        if entered && !state.is_terminal() {
            debug!(session_id = session.id(), from, to = state.name(), "Session state changed");
            state = enter(&mut session, state).await;
        }
    }
}

/// Next frame, end of stream, deadline or shutdown; whichever comes first
async fn next_event<S>(
    session: &mut Session<S>,
    shutdown: &CancellationToken,
    state: &SessionState,
    heartbeat_timeout: Duration,
) -> Event
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    if state.has_deadline() {
        // Re-armed on every wait, so each heartbeat renews the deadline
        tokio::select! {
            biased;
            () = shutdown.cancelled() => Event::Cancelled,
            inbound = session.read_frame() => inbound.into(),
            () = tokio::time::sleep(heartbeat_timeout) => Event::Deadline,
        }
    } else {
        tokio::select! {
            biased;
            () = shutdown.cancelled() => Event::Cancelled,
            inbound = session.read_frame() => inbound.into(),
        }
    }
}

async fn perform<S>(
    session: &mut Session<S>,
    directory: &Directory,
    next: SessionState,
    effects: Vec<Effect>,
    registered: &mut bool,
) -> SessionState
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    for effect in effects {
        match effect {
            Effect::LogInfo(message) => session.log_info(message),
            Effect::LogError(message) => session.log_error(message),
            Effect::Send(frame) => {
                if session.write_frame(frame).await.is_err() {
                    return SessionState::Terminated { farewell: true };
                }
            }
            Effect::Register(agent) => {
                if let Err(e) = directory.register(agent) {
                    session.log_error(format!("Registration rejected: {}", e));
                    return SessionState::Terminated { farewell: true };
                }
                *registered = true;
                session.log_info("Agent registered");
            }
        }
    }
    next
}

async fn enter<S>(session: &mut Session<S>, state: SessionState) -> SessionState
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    if let Some(frame) = state.entry_frame() {
        if session.write_frame(frame).await.is_err() {
            return SessionState::Terminated { farewell: true };
        }
    }
    state
}

async fn terminate<S>(
    session: &mut Session<S>,
    directory: &Directory,
    farewell: bool,
    registered: bool,
) where
    S: AsyncRead + AsyncWrite + Unpin,
{
    // A rejected registration leaves the current holder of the id alone
    if registered {
        directory.unregister(session.id());
    }

    if farewell {
        session.log_info("Sending [BYE]");
        // A failed farewell is already logged by the session
        if timeout(FAREWELL_TIMEOUT, session.write_frame(BYE)).await.is_err() {
            session.log_error("Timed out sending [BYE]");
        }
    }

    session.close().await;
    session.log_info("Session closed");
}
