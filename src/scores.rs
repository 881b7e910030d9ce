use crate::app_dirs::AppDirs;
use chrono::{DateTime, Local};
use rusqlite::{params, Connection, Result};
use std::path::{Path, PathBuf};

/// One finished playthrough.
#[derive(Debug, Clone, PartialEq)]
pub struct GameResult {
    pub player: String,
    pub category: String,
    pub score: u32,
    pub level: u32,
    pub finished_at: DateTime<Local>,
}

/// Local score history. Every call is best-effort from the game's point of
/// view; callers drop errors rather than interrupting play.
#[derive(Debug)]
pub struct ScoreDb {
    conn: Connection,
}

impl ScoreDb {
    /// Open (and if needed create) the database at the default state path.
    pub fn new() -> Result<Self> {
        let db_path = AppDirs::db_path().unwrap_or_else(|| PathBuf::from("wordfall_scores.db"));

        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                rusqlite::Error::SqliteFailure(
                    rusqlite::ffi::Error::new(rusqlite::ffi::SQLITE_CANTOPEN),
                    Some(format!("Failed to create directory: {}", e)),
                )
            })?;
        }

        Self::open(&db_path)
    }

    pub fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)?;

        conn.execute(
            r#"
            CREATE TABLE IF NOT EXISTS game_results (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                player TEXT NOT NULL,
                category TEXT NOT NULL,
                score INTEGER NOT NULL,
                level INTEGER NOT NULL,
                finished_at TEXT NOT NULL
            )
            "#,
            [],
        )?;

        conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_game_results_category ON game_results(category)",
            [],
        )?;

        Ok(ScoreDb { conn })
    }

    pub fn record(&self, result: &GameResult) -> Result<()> {
        self.conn.execute(
            "INSERT INTO game_results (player, category, score, level, finished_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                result.player,
                result.category,
                result.score,
                result.level,
                result.finished_at.to_rfc3339(),
            ],
        )?;
        Ok(())
    }

    /// Highest score ever recorded for a category, if any.
    pub fn best_score(&self, category: &str) -> Result<Option<u32>> {
        self.conn.query_row(
            "SELECT MAX(score) FROM game_results WHERE category = ?1",
            params![category],
            |row| row.get::<_, Option<u32>>(0),
        )
    }

    /// Most recent results, newest first.
    pub fn recent(&self, limit: usize) -> Result<Vec<GameResult>> {
        let mut stmt = self.conn.prepare(
            "SELECT player, category, score, level, finished_at
             FROM game_results ORDER BY id DESC LIMIT ?1",
        )?;

        let rows = stmt.query_map(params![limit as i64], |row| {
            let ts: String = row.get(4)?;
            let finished_at = DateTime::parse_from_rfc3339(&ts)
                .map(|dt| dt.with_timezone(&Local))
                .map_err(|_| {
                    rusqlite::Error::InvalidColumnType(
                        4,
                        "finished_at".to_string(),
                        rusqlite::types::Type::Text,
                    )
                })?;
            Ok(GameResult {
                player: row.get(0)?,
                category: row.get(1)?,
                score: row.get(2)?,
                level: row.get(3)?,
                finished_at,
            })
        })?;

        rows.collect()
    }
}
