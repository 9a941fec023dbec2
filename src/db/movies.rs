//! Movie record repository: the bulk read the graph is built from, plus the
//! writes that make actor insertions survive the next rebuild.

use std::collections::HashMap;

use rusqlite::{params, Connection, OptionalExtension, TransactionBehavior};

use crate::db::Db;
use crate::error::Result;
use crate::model::{MovieRecord, PersonRecord};

/// Movie records stored in SQLite.
#[derive(Debug, Clone)]
pub struct MovieRepository {
    db: Db,
}

impl MovieRepository {
    pub fn new(db: Db) -> Self {
        Self { db }
    }

    /// Fetch every movie with its ordered actor and director lists.
    ///
    /// Movies come back in insertion order. Failures propagate; there is no retry.
    pub async fn find_all(&self) -> Result<Vec<MovieRecord>> {
        self.db.with_connection(|conn| load_all(conn)).await
    }

    /// Upsert a batch of records in one transaction.
    /// Returns the number of movies that were not already stored.
    pub async fn import(&self, records: Vec<MovieRecord>) -> Result<usize> {
        self.db
            .with_connection(move |conn| {
                let tx = conn.transaction()?;
                let mut inserted = 0;
                for movie in &records {
                    inserted += tx.execute(
                        "INSERT OR IGNORE INTO movies (title) VALUES (?1)",
                        params![movie.title],
                    )?;
                    insert_credits(&tx, "acted_in", &movie.title, &movie.actors)?;
                    insert_credits(&tx, "directed", &movie.title, &movie.directors)?;
                }
                tx.commit()?;
                log::info!("Imported {} movie record(s), {} new", records.len(), inserted);
                Ok(inserted)
            })
            .await
    }

    /// Persist a new actor credited on `titles`.
    ///
    /// Returns `None` without writing anything if the name is already known
    /// to the store (as a credited person or a movie title), otherwise the
    /// number of credits written.
    pub async fn add_actor(&self, name: &str, titles: &[String]) -> Result<Option<usize>> {
        let name = name.to_string();
        let titles = titles.to_vec();
        self.db
            .with_connection(move |conn| {
                // Immediate: take the write lock before the existence check.
                let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

                let taken: Option<i64> = tx
                    .query_row(
                        "SELECT 1 FROM acted_in WHERE person_name = ?1 \
                         UNION ALL SELECT 1 FROM directed WHERE person_name = ?1 \
                         UNION ALL SELECT 1 FROM movies WHERE title = ?1 \
                         LIMIT 1",
                        params![name],
                        |row| row.get(0),
                    )
                    .optional()?;
                if taken.is_some() {
                    return Ok(None);
                }

                tx.execute("INSERT OR IGNORE INTO people (name) VALUES (?1)", params![name])?;
                let mut written = 0;
                for title in &titles {
                    written += tx.execute(
                        "INSERT OR IGNORE INTO acted_in (person_name, movie_title, position) \
                         SELECT ?1, title, \
                                (SELECT COALESCE(MAX(position) + 1, 0) FROM acted_in WHERE movie_title = ?2) \
                         FROM movies WHERE title = ?2",
                        params![name, title],
                    )?;
                }
                tx.commit()?;
                Ok(Some(written))
            })
            .await
    }
}

fn insert_credits(conn: &Connection, table: &str, title: &str, people: &[PersonRecord]) -> Result<()> {
    let sql = format!(
        "INSERT OR IGNORE INTO {} (person_name, movie_title, position) VALUES (?1, ?2, ?3)",
        table
    );
    for (position, person) in people.iter().enumerate() {
        conn.execute("INSERT OR IGNORE INTO people (name) VALUES (?1)", params![person.name])?;
        conn.execute(&sql, params![person.name, title, position as i64])?;
    }
    Ok(())
}

fn load_all(conn: &Connection) -> Result<Vec<MovieRecord>> {
    let mut stmt = conn.prepare("SELECT title FROM movies ORDER BY rowid")?;
    let mut movies: Vec<MovieRecord> = stmt
        .query_map([], |row| row.get::<_, String>(0))?
        .map(|title| title.map(MovieRecord::new))
        .collect::<std::result::Result<Vec<_>, rusqlite::Error>>()?;

    let index: HashMap<String, usize> = movies
        .iter()
        .enumerate()
        .map(|(i, m)| (m.title.clone(), i))
        .collect();

    for (table, is_actor) in [("acted_in", true), ("directed", false)] {
        let mut stmt = conn.prepare(&format!(
            "SELECT movie_title, person_name FROM {} ORDER BY movie_title, position, rowid",
            table
        ))?;
        let rows = stmt.query_map([], |row| Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?)))?;
        for row in rows {
            let (title, name) = row?;
            let Some(&i) = index.get(&title) else {
                log::warn!("Credit for unknown movie '{}' in {}, skipping", title, table);
                continue;
            };
            let person = PersonRecord::new(name);
            if is_actor {
                movies[i].actors.push(person);
            } else {
                movies[i].directors.push(person);
            }
        }
    }

    log::debug!("Loaded {} movie record(s)", movies.len());
    Ok(movies)
}
