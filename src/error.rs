use std::path::PathBuf;

use thiserror::Error;

use crate::stage::Stage;

/// Failures raised by the collaborators around the game core.
///
/// The per-frame loop itself never produces one of these; they come from
/// startup (word lists, assets, database) and from fire-and-forget writes
/// whose results the caller logs and drops.
#[derive(Debug, Error)]
pub enum GameError {
    #[error("highscore storage: {0}")]
    Storage(#[from] rusqlite::Error),

    #[error("io: {0}")]
    Io(#[from] std::io::Error),

    #[error("word list is not valid json: {0}")]
    WordList(#[from] serde_json::Error),

    #[error("no words available for {0}")]
    MissingWordList(Stage),

    #[error("asset {name} could not be read from {path}: {source}")]
    Asset {
        name: String,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[cfg(feature = "audio")]
    #[error("audio output: {0}")]
    Audio(String),
}

pub type Result<T> = std::result::Result<T, GameError>;
