use std::fs;
use std::path::Path;

use chrono::Local;
use rusqlite::{params, Connection};

use crate::error::Result;
use crate::stage::Stage;

/// Ranks shown per stage in the highscore browser.
pub const TOP_LIMIT: usize = 10;

/// One row of a stage's ranking.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoreEntry {
    pub player_name: String,
    pub score: u32,
}

/// Append-only score log, queried per stage.
pub trait HighscoreStore {
    fn record(&mut self, stage: Stage, player_name: &str, score: u32) -> Result<()>;

    /// Best scores of `stage`, highest first. Ties keep insertion order.
    fn top_scores(&self, stage: Stage, limit: usize) -> Result<Vec<ScoreEntry>>;
}

/// Highscores kept in a SQLite table. Duplicate names and scores are allowed.
#[derive(Debug)]
pub struct SqliteHighscores {
    conn: Connection,
}

impl SqliteHighscores {
    /// Opens (creating if needed) the database at `path`.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        if let Some(parent) = path.as_ref().parent() {
            fs::create_dir_all(parent)?;
        }
        Self::init(Connection::open(path)?)
    }

    pub fn open_in_memory() -> Result<Self> {
        Self::init(Connection::open_in_memory()?)
    }

    fn init(conn: Connection) -> Result<Self> {
        conn.execute(
            r#"
            CREATE TABLE IF NOT EXISTS highscores (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                stage INTEGER NOT NULL,
                player_name TEXT NOT NULL,
                score INTEGER NOT NULL,
                recorded_at TEXT NOT NULL
            )
            "#,
            [],
        )?;
        conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_highscores_stage ON highscores(stage, score)",
            [],
        )?;
        Ok(Self { conn })
    }
}

impl HighscoreStore for SqliteHighscores {
    fn record(&mut self, stage: Stage, player_name: &str, score: u32) -> Result<()> {
        self.conn.execute(
            "INSERT INTO highscores (stage, player_name, score, recorded_at) VALUES (?1, ?2, ?3, ?4)",
            params![stage.number(), player_name, score, Local::now().to_rfc3339()],
        )?;
        Ok(())
    }

    fn top_scores(&self, stage: Stage, limit: usize) -> Result<Vec<ScoreEntry>> {
        let mut stmt = self.conn.prepare(
            r#"
            SELECT player_name, score FROM highscores
            WHERE stage = ?1
            ORDER BY score DESC, id ASC
            LIMIT ?2
            "#,
        )?;
        let rows = stmt.query_map(params![stage.number(), limit as i64], |row| {
            Ok(ScoreEntry {
                player_name: row.get(0)?,
                score: row.get(1)?,
            })
        })?;

        let mut entries = Vec::new();
        for row in rows {
            entries.push(row?);
        }
        Ok(entries)
    }
}
