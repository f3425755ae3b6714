// Library surface for headless/integration tests and reuse.
// The binary in main.rs only wires terminal, config and logging around it.
pub mod app;
pub mod app_dirs;
pub mod assets;
pub mod audio;
pub mod config;
pub mod dust;
pub mod error;
pub mod highscore;
pub mod input;
pub mod menu;
pub mod particles;
pub mod runtime;
pub mod session;
pub mod stage;
pub mod ui;
pub mod words;

pub use error::{GameError, Result};
