//! Agent Protocol
//!
//! Bracketed text frames exchanged between agents and the server. Inbound:
//! HELLO, SKILL, THATSALL, IAMSTILLHERE, BYE. Outbound: HI, TELLMESKILLS,
//! THANKS, BYE. Outbound frames are constants; only inbound frames are decoded.

pub mod codec;
pub mod message;

pub use codec::{decode_hello, decode_skill, is_bye, is_still_here, is_thats_all};
pub use message::{HelloMessage, SkillMessage, BYE, HI, TELL_ME_SKILLS, THANKS};
