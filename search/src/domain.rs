//! Domain entities handed to callers. No wire or storage types leak here.

use chrono::{DateTime, NaiveDate, Utc};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Genre {
    Adventure,
    ScienceFiction,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Movie {
    pub id: String,
    pub title: Option<String>,
    pub genre: Option<Genre>,
    pub poster_path: Option<String>,
    pub overview: Option<String>,
    pub release_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoviesPage {
    pub page: u32,
    pub total_pages: u32,
    pub movies: Vec<Movie>,
}

/// A past search term.
///
/// Two queries are the same search when their text matches exactly; the
/// timestamp only records when it was last issued.
#[derive(Debug, Clone)]
pub struct MovieQuery {
    pub query: String,
    pub created_at: DateTime<Utc>,
}

impl MovieQuery {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            created_at: Utc::now(),
        }
    }
}

impl PartialEq for MovieQuery {
    fn eq(&self, other: &Self) -> bool {
        self.query == other.query
    }
}

impl Eq for MovieQuery {}
