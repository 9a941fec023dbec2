//! Movie and person records as supplied by the backing data store.

use serde::{Deserialize, Serialize};

use crate::error::{MovieGraphError, Result};

/// A person credited on a movie (actor or director). Identity is the name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PersonRecord {
    pub name: String,
}

impl PersonRecord {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// A movie with its ordered cast and director lists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MovieRecord {
    pub title: String,
    #[serde(default)]
    pub actors: Vec<PersonRecord>,
    #[serde(default)]
    pub directors: Vec<PersonRecord>,
}

impl MovieRecord {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            actors: Vec::new(),
            directors: Vec::new(),
        }
    }

    pub fn with_actors<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.actors.extend(names.into_iter().map(PersonRecord::new));
        self
    }

    pub fn with_directors<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.directors.extend(names.into_iter().map(PersonRecord::new));
        self
    }
}

/// Parse an import file: a JSON array of movie objects.
pub fn parse_movie_records(json: &str) -> Result<Vec<MovieRecord>> {
    serde_json::from_str(json).map_err(|e| MovieGraphError::Parse(e.to_string()))
}
