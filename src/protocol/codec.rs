//! Frame decoding
//!
//! Frames look like `[TAG;k1=v1;k2=v2]` or a bare `[TAG]`. Marker frames are
//! recognised by prefix only; HELLO and SKILL carry a key/value body.

use super::message::{
    HelloMessage, SkillMessage, HELLO_PREFIX, SKILL_PREFIX, STILL_HERE, THATS_ALL,
};
use crate::error::DecodeError;
use std::collections::HashMap;

/// `[THATSALL]`: end of skill enumeration
pub fn is_thats_all(frame: &str) -> bool {
    frame.starts_with(THATS_ALL)
}

/// `[IAMSTILLHERE]`: heartbeat
pub fn is_still_here(frame: &str) -> bool {
    frame.starts_with(STILL_HERE)
}

/// `[BYE]`: client is leaving
pub fn is_bye(frame: &str) -> bool {
    frame.starts_with(super::message::BYE)
}

/// Decode a HELLO frame
///
/// Requires a `name` key; every other pair becomes a trait.
pub fn decode_hello(frame: &str) -> Result<HelloMessage, DecodeError> {
    let body = strip_boundaries(frame, HELLO_PREFIX)?;
    let mut pairs = parse_pairs(frame, body)?;

    let name = take_required(frame, &mut pairs, "name")?;

    Ok(HelloMessage {
        name,
        traits: pairs,
    })
}

/// Decode a SKILL frame
///
/// Requires `name` and `type` keys; every other pair becomes a trait.
pub fn decode_skill(frame: &str) -> Result<SkillMessage, DecodeError> {
    let body = strip_boundaries(frame, SKILL_PREFIX)?;
    let mut pairs = parse_pairs(frame, body)?;

    let name = take_required(frame, &mut pairs, "name")?;
    let kind = take_required(frame, &mut pairs, "type")?;

    Ok(SkillMessage {
        name,
        kind,
        traits: pairs,
    })
}

fn take_required(
    frame: &str,
    pairs: &mut HashMap<String, String>,
    key: &'static str,
) -> Result<String, DecodeError> {
    pairs.remove(key).ok_or_else(|| DecodeError::MissingKey {
        message: frame.to_string(),
        key,
    })
}

/// Body between the tag prefix and the first `]`
fn strip_boundaries<'a>(frame: &'a str, prefix: &'static str) -> Result<&'a str, DecodeError> {
    if !frame.starts_with(prefix) {
        return Err(DecodeError::MissingPrefix {
            message: frame.to_string(),
            prefix,
        });
    }

    // The prefix holds no ']', so the first one always lies past it
    let end = frame
        .find(']')
        .ok_or_else(|| DecodeError::Unterminated(frame.to_string()))?;

    Ok(&frame[prefix.len()..end])
}

/// Split `k1=v1;k2=v2` into a map
///
/// Each segment must split on '=' into exactly two parts, so values cannot
/// contain '='. An empty body is one empty segment and fails the same way.
fn parse_pairs(frame: &str, body: &str) -> Result<HashMap<String, String>, DecodeError> {
    let mut pairs = HashMap::new();

    for segment in body.split(';') {
        let mut parts = segment.split('=');
        let (key, value) = match (parts.next(), parts.next(), parts.next()) {
            (Some(key), Some(value), None) => (key, value),
            _ => {
                return Err(DecodeError::MalformedPair {
                    message: frame.to_string(),
                    segment: segment.to_string(),
                })
            }
        };

        if pairs.contains_key(key) {
            return Err(DecodeError::DuplicateKey {
                message: frame.to_string(),
                key: key.to_string(),
            });
        }
        pairs.insert(key.to_string(), value.to_string());
    }

    Ok(pairs)
}
