use thiserror::Error;

/// Main error type for MovieGraph
#[derive(Error, Debug)]
pub enum MovieGraphError {
    /// Backing data store errors
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// File system I/O errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// A schema version that failed to apply
    #[error("Migration {version} failed: {source}")]
    Migration {
        version: u32,
        source: rusqlite::Error,
    },

    /// Malformed movie import file
    #[error("Parse error: {0}")]
    Parse(String),
}

/// Convenient Result type using MovieGraphError
pub type Result<T> = std::result::Result<T, MovieGraphError>;
