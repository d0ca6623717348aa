use std::cmp::Ordering;

use chrono::{DateTime, Utc};
use itertools::Itertools;
use serde::{Deserialize, Serialize};

pub const PENALTY_SECS: u64 = 30;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, strum_macros::Display,
)]
pub enum Penalty {
    #[default]
    #[serde(rename = "none")]
    #[strum(serialize = "none")]
    None,
    #[serde(rename = "+30s")]
    #[strum(serialize = "+30s")]
    ThirtySeconds,
    #[serde(rename = "disqualified")]
    #[strum(serialize = "disqualified")]
    Disqualified,
}

impl Penalty {
    /// Time used for ranking. Disqualified entries keep their raw time.
    pub fn effective_time(self, time: u64) -> u64 {
        match self {
            Penalty::ThirtySeconds => time + PENALTY_SECS,
            _ => time,
        }
    }

    /// Applying the penalty that is already set clears it.
    pub fn toggled(self, requested: Penalty) -> Penalty {
        if self == requested {
            Penalty::None
        } else {
            requested
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultEntry {
    pub name: String,
    /// seconds on the clock when the turn ended
    pub time: u64,
    pub timestamp: DateTime<Utc>,
    #[serde(default)]
    pub penalty: Penalty,
}

impl ResultEntry {
    pub fn effective_time(&self) -> u64 {
        self.penalty.effective_time(self.time)
    }

    pub fn is_disqualified(&self) -> bool {
        self.penalty == Penalty::Disqualified
    }
}

/// Leaderboard ordering: disqualified last, then effective time ascending.
/// Disqualified entries compare by raw time among themselves.
pub fn compare_entries(a: &ResultEntry, b: &ResultEntry) -> Ordering {
    match (a.is_disqualified(), b.is_disqualified()) {
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (true, true) => a.time.cmp(&b.time),
        (false, false) => a.effective_time().cmp(&b.effective_time()),
    }
}

/// Finishing times keyed by participant name, in insertion order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Ledger {
    entries: Vec<ResultEntry>,
}

impl Ledger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_entries(entries: Vec<ResultEntry>) -> Self {
        let mut ledger = Ledger::new();
        for entry in entries {
            match ledger.position(&entry.name) {
                Some(idx) => ledger.entries[idx] = entry,
                None => ledger.entries.push(entry),
            }
        }
        ledger
    }

    pub fn add_result(&mut self, name: &str, time: u64) {
        self.add_result_at(name, time, Utc::now());
    }

    /// Upsert by name. Overwriting keeps the entry's position and clears
    /// any penalty, since the penalty was given against the old time.
    pub fn add_result_at(&mut self, name: &str, time: u64, timestamp: DateTime<Utc>) {
        let entry = ResultEntry {
            name: name.to_string(),
            time,
            timestamp,
            penalty: Penalty::None,
        };
        match self.position(name) {
            Some(idx) => self.entries[idx] = entry,
            None => self.entries.push(entry),
        }
    }

    /// Returns false when `name` has no result yet.
    pub fn set_penalty(&mut self, name: &str, penalty: Penalty) -> bool {
        match self.position(name) {
            Some(idx) => {
                self.entries[idx].penalty = penalty;
                true
            }
            None => false,
        }
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn get(&self, name: &str) -> Option<&ResultEntry> {
        self.entries.iter().find(|entry| entry.name == name)
    }

    pub fn entries(&self) -> &[ResultEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Stable, penalty-aware ranking. Ties keep insertion order.
    pub fn ranked(&self) -> Vec<&ResultEntry> {
        self.entries
            .iter()
            .sorted_by(|a, b| compare_entries(a, b))
            .collect()
    }

    /// Ranked entries followed by roster members who have not finished.
    pub fn standings<'a>(&'a self, roster: &'a [String]) -> Vec<Standing<'a>> {
        let mut rows: Vec<Standing<'a>> = self
            .ranked()
            .into_iter()
            .enumerate()
            .map(|(idx, entry)| Standing {
                rank: Some(idx + 1),
                name: &entry.name,
                entry: Some(entry),
            })
            .collect();

        rows.extend(
            roster
                .iter()
                .filter(|name| self.get(name).is_none())
                .map(|name| Standing {
                    rank: None,
                    name,
                    entry: None,
                }),
        );
        rows
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.entries.iter().position(|entry| entry.name == name)
    }
}

/// One leaderboard row
#[derive(Debug, Clone, PartialEq)]
pub struct Standing<'a> {
    pub rank: Option<usize>,
    pub name: &'a str,
    pub entry: Option<&'a ResultEntry>,
}

impl Standing<'_> {
    pub fn medal(&self) -> Option<&'static str> {
        match self.rank {
            Some(1) => Some("🥇"),
            Some(2) => Some("🥈"),
            Some(3) => Some("🥉"),
            _ => None,
        }
    }
}
