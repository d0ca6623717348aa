// Library surface for headless/integration tests and reuse.
// Keep this lean to avoid coupling to bin-only types in main.rs.
pub mod app_dirs;
pub mod config;
pub mod error;
pub mod game;
pub mod history;
pub mod logging;
pub mod participants;
pub mod results;
pub mod runtime;
pub mod settings;
pub mod storage;
pub mod timer;

pub use error::{Error, Result};
pub use game::{Game, Transition};
