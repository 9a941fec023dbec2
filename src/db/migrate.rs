//! Schema setup for the movie store.
//!
//! The schema ships inside the binary. `schema_migrations` records the highest
//! version a database file has received, so reopening an existing file only
//! applies what is new.

use rusqlite::{params, Connection};

use crate::error::{MovieGraphError, Result};

struct Migration {
    version: u32,
    name: &'static str,
    sql: &'static str,
}

const MIGRATIONS: &[Migration] = &[Migration {
    version: 1,
    name: "movie_tables",
    sql: include_str!("../../migrations/001_movie_tables.sql"),
}];

/// Bring the movie store schema up to date. Returns how many versions were applied.
pub fn run_migrations(conn: &mut Connection) -> Result<usize> {
    apply(conn, MIGRATIONS)
}

fn schema_version(conn: &Connection) -> Result<u32> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS schema_migrations (
            version INTEGER PRIMARY KEY,
            name TEXT NOT NULL,
            applied_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP
        )",
    )?;
    let version: Option<u32> =
        conn.query_row("SELECT MAX(version) FROM schema_migrations", [], |row| row.get(0))?;
    Ok(version.unwrap_or(0))
}

/// Each version runs in its own transaction; a failing one leaves the
/// schema at the previous version.
fn apply(conn: &mut Connection, migrations: &[Migration]) -> Result<usize> {
    let current = schema_version(conn)?;
    let mut applied = 0;

    for migration in migrations.iter().filter(|m| m.version > current) {
        log::info!("Applying schema version {} ({})", migration.version, migration.name);

        let tx = conn.transaction()?;
        tx.execute_batch(migration.sql)
            .map_err(|source| MovieGraphError::Migration {
                version: migration.version,
                source,
            })?;
        tx.execute(
            "INSERT INTO schema_migrations (version, name) VALUES (?1, ?2)",
            params![migration.version, migration.name],
        )?;
        tx.commit()?;
        applied += 1;
    }

    if applied == 0 {
        log::debug!("Schema already at version {}", current);
    }
    Ok(applied)
}
