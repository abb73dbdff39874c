//! Session state machine
//!
//! The protocol is a fixed sequence: identity (HELLO), capability
//! enumeration (SKILL... THATSALL), then heartbeats until the agent leaves.
//! [`transition`] is pure; it maps the current state and one event to the
//! next state plus the effects to perform, in order. The runner performs the
//! effects and the entry action of the new state.
//!
//! | State           | Event                 | Next                          | Effects               |
//! |-----------------|-----------------------|-------------------------------|-----------------------|
//! | Hello           | valid HELLO           | AwaitFirstSkill               | send HI               |
//! | AwaitFirstSkill | valid SKILL           | AwaitMoreSkills               |                       |
//! | AwaitMoreSkills | THATSALL              | Heartbeat                     | send THANKS, register |
//! | AwaitMoreSkills | valid SKILL           | AwaitMoreSkills               |                       |
//! | Heartbeat       | IAMSTILLHERE          | Heartbeat                     |                       |
//! | Heartbeat       | BYE                   | Terminated (no farewell)      |                       |
//! | any             | closed                | Terminated (no farewell)      |                       |
//! | any             | bad frame             | Terminated (farewell)         |                       |
//! | any             | deadline or cancel    | Terminated (farewell)         |                       |

use crate::directory::{Agent, Skill};
use crate::protocol::{self, HI, TELL_ME_SKILLS, THANKS};
use crate::types::{Frame, SessionId};

use super::connection::Inbound;

/// Where a session is in the protocol
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    /// Waiting for HELLO
    Hello,
    /// HELLO accepted, at least one SKILL required
    AwaitFirstSkill(Agent),
    /// Collecting further skills until THATSALL
    AwaitMoreSkills(Agent),
    /// Registered; IAMSTILLHERE must arrive before each deadline
    Heartbeat,
    /// Terminal: unregister, send BYE when `farewell`, close
    Terminated { farewell: bool },
}

impl SessionState {
    pub fn name(&self) -> &'static str {
        match self {
            SessionState::Hello => "hello",
            SessionState::AwaitFirstSkill(_) => "await_first_skill",
            SessionState::AwaitMoreSkills(_) => "await_more_skills",
            SessionState::Heartbeat => "heartbeat",
            SessionState::Terminated { .. } => "terminated",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, SessionState::Terminated { .. })
    }

    /// Waits in this state race a renewable deadline
    pub fn has_deadline(&self) -> bool {
        matches!(self, SessionState::Heartbeat)
    }

    /// Frame sent when the state is entered
    pub fn entry_frame(&self) -> Option<&'static str> {
        match self {
            SessionState::AwaitFirstSkill(_) => Some(TELL_ME_SKILLS),
            _ => None,
        }
    }
}

/// Something that happened to a session
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Frame(Frame),
    /// End of stream or read failure
    Closed,
    /// Heartbeat deadline elapsed
    Deadline,
    /// Process shutdown
    Cancelled,
}

impl From<Inbound> for Event {
    fn from(inbound: Inbound) -> Self {
        match inbound {
            Inbound::Frame(frame) => Event::Frame(frame),
            Inbound::Closed => Event::Closed,
        }
    }
}

/// Side effect requested by a transition
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Write a frame; failure terminates the session with a farewell
    Send(&'static str),
    /// Add the finished agent to the directory
    Register(Agent),
    LogInfo(String),
    LogError(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    pub next: SessionState,
    pub effects: Vec<Effect>,
}

impl Transition {
    fn to(next: SessionState) -> Self {
        Self {
            next,
            effects: Vec::new(),
        }
    }

    fn with(mut self, effect: Effect) -> Self {
        self.effects.push(effect);
        self
    }

    fn terminate(farewell: bool) -> Self {
        Self::to(SessionState::Terminated { farewell })
    }
}

/// Apply one event to a session state
pub fn transition(id: SessionId, state: SessionState, event: Event) -> Transition {
    if state.is_terminal() {
        return Transition::to(state);
    }

    let frame = match event {
        Event::Frame(frame) => frame,
        Event::Closed => {
            return Transition::terminate(false)
                .with(Effect::LogInfo("Reading failed, closing".to_string()))
        }
        Event::Deadline => {
            return Transition::terminate(true)
                .with(Effect::LogInfo("Session timed out".to_string()))
        }
        Event::Cancelled => {
            return Transition::terminate(true)
                .with(Effect::LogInfo("Closing session".to_string()))
        }
    };

    match state {
        SessionState::Hello => match protocol::decode_hello(&frame) {
            Ok(hello) => {
                let info = format!("Obtained HELLO {}: {:?}", hello.name, hello.traits);
                Transition::to(SessionState::AwaitFirstSkill(Agent::from_hello(id, hello)))
                    .with(Effect::LogInfo(info))
                    .with(Effect::Send(HI))
            }
            Err(e) => Transition::terminate(true).with(Effect::LogError(e.to_string())),
        },

        SessionState::AwaitFirstSkill(agent) => add_skill(agent, &frame),

        SessionState::AwaitMoreSkills(agent) => {
            if protocol::is_thats_all(&frame) {
                let info = format!("All {} skills obtained", agent.skills.len());
                return Transition::to(SessionState::Heartbeat)
                    .with(Effect::LogInfo(info))
                    .with(Effect::Send(THANKS))
                    .with(Effect::Register(agent));
            }
            add_skill(agent, &frame)
        }

        SessionState::Heartbeat => {
            if protocol::is_still_here(&frame) {
                Transition::to(SessionState::Heartbeat)
            } else if protocol::is_bye(&frame) {
                Transition::terminate(false).with(Effect::LogInfo("[BYE] received".to_string()))
            } else {
                Transition::terminate(true).with(Effect::LogError(format!(
                    "Unexpected message obtained: '{}'",
                    frame
                )))
            }
        }

        SessionState::Terminated { farewell } => Transition::terminate(farewell),
    }
}

fn add_skill(mut agent: Agent, frame: &str) -> Transition {
    match protocol::decode_skill(frame) {
        Ok(skill) => {
            let info = format!("Obtained SKILL {} ({})", skill.name, skill.kind);
            agent.add_skill(Skill::from(skill));
            Transition::to(SessionState::AwaitMoreSkills(agent)).with(Effect::LogInfo(info))
        }
        Err(e) => Transition::terminate(true).with(Effect::LogError(e.to_string())),
    }
}
