use rusqlite::Connection;
use std::path::Path;
use tokio::task;
use crate::error::{Result, MovieGraphError};

pub mod migrate;
pub mod movies;

pub use movies::MovieRepository;

/// WAL for concurrent readers during a write, foreign keys for the credit tables.
const CONNECTION_PRAGMAS: &str = "PRAGMA journal_mode = WAL; \
     PRAGMA synchronous = NORMAL; \
     PRAGMA foreign_keys = ON; \
     PRAGMA temp_store = MEMORY;";

/// Database connection wrapper
#[derive(Debug, Clone)]
pub struct Db {
    path: std::path::PathBuf,
}

impl Db {
    /// Create a new database connection manager
    pub fn new<P: AsRef<Path>>(db_path: P) -> Self {
        Self {
            path: db_path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Execute a closure with a database connection in a blocking task
    pub async fn with_connection<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&mut Connection) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let path = self.path.clone();
        task::spawn_blocking(move || {
            let mut conn = open(&path)?;
            f(&mut conn)
        })
        .await
        .map_err(|e| {
            MovieGraphError::Io(std::io::Error::new(
                std::io::ErrorKind::Other,
                format!("database task failed: {}", e),
            ))
        })?
    }
}

fn open(path: &Path) -> Result<Connection> {
    let conn = Connection::open(path).map_err(MovieGraphError::Database)?;
    conn.execute_batch(CONNECTION_PRAGMAS)?;
    Ok(conn)
}
