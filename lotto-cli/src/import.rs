use anyhow::{Context, Result};
use lotto_db::rusqlite::Connection;
use std::path::Path;

use lotto_db::db::insert_draw;
use lotto_db::source::{LoadedDraws, read_file};

pub struct ImportResult {
    pub total_records: u32,
    pub inserted: u32,
    pub skipped: u32,
    pub errors: u32,
}

/// Loads a JSON or CSV draw file into the store. Malformed records are
/// logged and counted, the rest are inserted in a single transaction.
pub fn import_file(conn: &Connection, path: &Path) -> Result<ImportResult> {
    let loaded = read_file(path)?;
    let result = store_draws(conn, &loaded)?;
    log::info!(
        "import of {:?}: {} inserted, {} duplicates, {} errors",
        path,
        result.inserted,
        result.skipped,
        result.errors
    );
    Ok(result)
}

fn store_draws(conn: &Connection, loaded: &LoadedDraws) -> Result<ImportResult> {
    let tx = conn.unchecked_transaction()
        .context("Unable to start transaction")?;

    let mut result = ImportResult {
        total_records: loaded.total_records() as u32,
        inserted: 0,
        skipped: 0,
        errors: loaded.rejected.len() as u32,
    };

    for draw in &loaded.draws {
        match insert_draw(&tx, draw) {
            Ok(true) => result.inserted += 1,
            Ok(false) => result.skipped += 1,
            Err(e) => {
                log::warn!("insert failed for draw of {}: {}", draw.date, e);
                result.errors += 1;
            }
        }
    }

    tx.commit().context("Commit failed")?;
    Ok(result)
}
