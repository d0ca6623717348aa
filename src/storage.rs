use std::collections::HashMap;
use std::fs;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{Error, Result};
use crate::game::Game;
use crate::participants::{ParticipantState, Registry};
use crate::results::{Ledger, ResultEntry};
use crate::timer::Timer;

pub const ROSTER_FILE: &str = "roster.json";
pub const TIMER_FILE: &str = "timer.json";
pub const RESULTS_FILE: &str = "results.json";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RosterRecord {
    pub participants: Vec<String>,
    pub states: HashMap<String, ParticipantState>,
    #[serde(default)]
    pub alarm_secs: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TimerRecord {
    pub elapsed: u64,
    pub running: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResultsRecord {
    pub results: Vec<ResultEntry>,
}

/// One JSON document on disk. A missing or unreadable file loads as the
/// default value.
#[derive(Debug, Clone)]
pub struct JsonRecord<T> {
    path: PathBuf,
    _kind: PhantomData<T>,
}

impl<T> JsonRecord<T>
where
    T: Serialize + DeserializeOwned + Default,
{
    pub fn with_path<P: AsRef<Path>>(p: P) -> Self {
        Self {
            path: p.as_ref().to_path_buf(),
            _kind: PhantomData,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn load(&self) -> T {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(_) => return T::default(),
        };
        match serde_json::from_slice::<T>(&bytes) {
            Ok(value) => value,
            Err(err) => {
                warn!(path = %self.path.display(), %err, "discarding unreadable record");
                T::default()
            }
        }
    }

    pub fn save(&self, value: &T) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| Error::io(parent, e))?;
        }
        let data = serde_json::to_vec_pretty(value)?;
        fs::write(&self.path, data).map_err(|e| Error::io(&self.path, e))
    }

    pub fn clear(&self) -> Result<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(Error::io(&self.path, e)),
        }
    }
}

/// The three independently keyed records that make up a saved session
#[derive(Debug, Clone)]
pub struct SessionStore {
    pub roster: JsonRecord<RosterRecord>,
    pub timer: JsonRecord<TimerRecord>,
    pub results: JsonRecord<ResultsRecord>,
}

impl SessionStore {
    pub fn in_dir<P: AsRef<Path>>(dir: P) -> Self {
        let dir = dir.as_ref();
        Self {
            roster: JsonRecord::with_path(dir.join(ROSTER_FILE)),
            timer: JsonRecord::with_path(dir.join(TIMER_FILE)),
            results: JsonRecord::with_path(dir.join(RESULTS_FILE)),
        }
    }

    pub fn load(&self) -> Game {
        restore_game(self.roster.load(), self.timer.load(), self.results.load())
    }

    pub fn save(&self, game: &Game) -> Result<()> {
        let (roster, timer, results) = snapshot(game);
        self.roster.save(&roster)?;
        self.timer.save(&timer)?;
        self.results.save(&results)
    }
}

pub fn snapshot(game: &Game) -> (RosterRecord, TimerRecord, ResultsRecord) {
    let registry = game.registry();
    let timer = game.timer();
    (
        RosterRecord {
            participants: registry.names().to_vec(),
            states: registry.states().clone(),
            alarm_secs: timer.alarm(),
        },
        TimerRecord {
            elapsed: timer.elapsed(),
            running: timer.is_running(),
        },
        ResultsRecord {
            results: game.ledger().entries().to_vec(),
        },
    )
}

/// Reassemble a game from records that may have been written at different
/// times. Results for names outside the roster are dropped, and a running
/// timer with nobody selected is paused.
pub fn restore_game(roster: RosterRecord, timer: TimerRecord, results: ResultsRecord) -> Game {
    let registry = Registry::restore(roster.participants, roster.states);
    let running = timer.running && registry.selected().is_some();
    let timer = Timer::restore(timer.elapsed, running, roster.alarm_secs);
    let ledger = Ledger::from_entries(
        results
            .results
            .into_iter()
            .filter(|entry| registry.contains(&entry.name))
            .collect(),
    );
    Game::from_parts(registry, timer, ledger)
}
