use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("at least 3 participants are required (found {found})")]
    TooFewParticipants { found: usize },

    #[error("participant names must be unique: {name:?} appears more than once")]
    DuplicateParticipant { name: String },

    #[error("invalid alarm {input:?}: expected MM:SS or a number of seconds")]
    InvalidAlarm { input: String },

    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

impl Error {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::Io {
            path: path.into(),
            source,
        }
    }

    /// Validation errors are shown to the user; everything else is logged.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Error::TooFewParticipants { .. }
                | Error::DuplicateParticipant { .. }
                | Error::InvalidAlarm { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, Error>;
