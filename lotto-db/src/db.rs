use anyhow::{Context, Result};
use rusqlite::types::Type;
use rusqlite::{Connection, Row};
use std::path::Path;

use crate::models::Draw;

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS draws (
    id     INTEGER PRIMARY KEY AUTOINCREMENT,
    round  INTEGER UNIQUE,
    date   TEXT NOT NULL,
    n1     INTEGER NOT NULL,
    n2     INTEGER NOT NULL,
    n3     INTEGER NOT NULL,
    n4     INTEGER NOT NULL,
    n5     INTEGER NOT NULL,
    n6     INTEGER NOT NULL,
    bonus  INTEGER
);
CREATE INDEX IF NOT EXISTS idx_draws_date ON draws (date);
";

const SELECT_COLUMNS: &str = "SELECT round, date, n1, n2, n3, n4, n5, n6, bonus FROM draws";

pub fn db_path() -> std::path::PathBuf {
    let mut path = std::env::current_dir().unwrap_or_default();
    path.push("data");
    path.push("lotto.db");
    path
}

pub fn open_db(path: &Path) -> Result<Connection> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Unable to create directory {:?}", parent))?;
    }
    let conn = Connection::open(path)
        .with_context(|| format!("Unable to open database {:?}", path))?;
    Ok(conn)
}

pub fn migrate(conn: &Connection) -> Result<()> {
    conn.execute_batch(SCHEMA)
        .context("Migration failed")?;
    Ok(())
}

/// Inserts a draw, ignoring it when its round is already stored.
/// Returns `true` when a row was added.
pub fn insert_draw(conn: &Connection, draw: &Draw) -> Result<bool> {
    let changed = conn.execute(
        "INSERT OR IGNORE INTO draws (round, date, n1, n2, n3, n4, n5, n6, bonus)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
        rusqlite::params![
            draw.round,
            draw.date,
            draw.numbers[0],
            draw.numbers[1],
            draw.numbers[2],
            draw.numbers[3],
            draw.numbers[4],
            draw.numbers[5],
            draw.bonus,
        ],
    ).context("Insert failed")?;
    Ok(changed > 0)
}

/// Rows failing the draw invariants are reported as conversion errors, so a
/// hand-edited database never reaches the analysis.
fn draw_from_row(row: &Row<'_>) -> rusqlite::Result<Draw> {
    let numbers = (2..8)
        .map(|idx| row.get::<_, i64>(idx))
        .collect::<rusqlite::Result<Vec<_>>>()?;
    let bonus: Option<i64> = row.get(8)?;

    Draw::new(row.get(0)?, row.get(1)?, numbers.as_slice(), bonus).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(2, Type::Integer, Box::new(e))
    })
}

/// Full history in chronological order (oldest first).
pub fn fetch_history(conn: &Connection) -> Result<Vec<Draw>> {
    let mut stmt = conn.prepare(&format!("{SELECT_COLUMNS} ORDER BY date ASC, id ASC"))?;
    let draws = stmt
        .query_map([], draw_from_row)?
        .collect::<Result<Vec<_>, _>>()
        .context("Unable to read draw history")?;
    Ok(draws)
}

/// Most recent draws first.
pub fn fetch_last_draws(conn: &Connection, limit: u32) -> Result<Vec<Draw>> {
    let mut stmt = conn.prepare(&format!("{SELECT_COLUMNS} ORDER BY date DESC, id DESC LIMIT ?1"))?;
    let draws = stmt
        .query_map([limit], draw_from_row)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(draws)
}

pub fn count_draws(conn: &Connection) -> Result<u32> {
    let count: u32 = conn.query_row("SELECT COUNT(*) FROM draws", [], |row| row.get(0))?;
    Ok(count)
}
