//! Validation for the configuration action: the roster and alarm typed into
//! the settings screen or passed on the command line.
use std::collections::HashSet;

use tracing::info;

use crate::error::{Error, Result};
use crate::game::Game;

pub const MIN_PARTICIPANTS: usize = 3;

/// A configuration that passed validation and may be applied to a game
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameSettings {
    pub participants: Vec<String>,
    pub alarm_secs: u64,
}

impl GameSettings {
    pub fn parse<S: AsRef<str>>(names: &[S], alarm: &str) -> Result<Self> {
        Ok(Self {
            participants: validate_participants(names)?,
            alarm_secs: parse_alarm(alarm)?,
        })
    }

    /// Install into `game`. An unchanged roster only updates the alarm so
    /// a running session is not thrown away.
    pub fn apply(&self, game: &mut Game) {
        if game.participants() != self.participants.as_slice() {
            game.configure(self.participants.iter().cloned());
        }
        game.set_alarm(self.alarm_secs);
        info!(alarm = self.alarm_secs, "settings applied");
    }
}

/// Trim, drop blanks, require at least three unique names.
pub fn validate_participants<S: AsRef<str>>(names: &[S]) -> Result<Vec<String>> {
    let names: Vec<String> = names
        .iter()
        .map(|name| name.as_ref().trim())
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .collect();

    if names.len() < MIN_PARTICIPANTS {
        return Err(Error::TooFewParticipants { found: names.len() });
    }

    let mut seen = HashSet::new();
    for name in &names {
        if !seen.insert(name.as_str()) {
            return Err(Error::DuplicateParticipant { name: name.clone() });
        }
    }

    Ok(names)
}

/// Accepts `MM:SS`, a bare number of seconds, or nothing (alarm off).
pub fn parse_alarm(input: &str) -> Result<u64> {
    let trimmed = input.trim();
    let invalid = || Error::InvalidAlarm {
        input: input.to_string(),
    };

    if trimmed.is_empty() {
        return Ok(0);
    }

    match trimmed.split_once(':') {
        Some((minutes, seconds)) => {
            let minutes = parse_digits(minutes).ok_or_else(invalid)?;
            let seconds = parse_digits(seconds).ok_or_else(invalid)?;
            if seconds >= 60 {
                return Err(invalid());
            }
            minutes
                .checked_mul(60)
                .and_then(|m| m.checked_add(seconds))
                .ok_or_else(invalid)
        }
        None => parse_digits(trimmed).ok_or_else(invalid),
    }
}

/// Parses ASCII digits only; `u64::from_str` would also take a leading `+`.
fn parse_digits(s: &str) -> Option<u64> {
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    s.parse().ok()
}
