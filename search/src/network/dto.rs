//! Wire payloads of the movies API and their mapping into domain types.
//!
//! The response cache stores these DTOs, not domain values, so mapping runs
//! the same way whether a page came from the cache or from the network.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::{Genre, Movie, MoviesPage};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoviesRequestDto {
    pub query: String,
    pub page: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoviesResponseDto {
    pub page: u32,
    pub total_pages: u32,
    #[serde(rename = "results")]
    pub movies: Vec<MovieDto>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MovieDto {
    pub id: u64,
    #[serde(default)]
    pub title: Option<String>,
    /// Kept as the raw code so unknown genres don't fail the whole page.
    #[serde(default)]
    pub genre: Option<String>,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub overview: Option<String>,
    #[serde(default)]
    pub release_date: Option<String>,
}

const RELEASE_DATE_FORMAT: &str = "%Y-%m-%d";

impl MoviesResponseDto {
    pub fn to_domain(&self) -> MoviesPage {
        MoviesPage {
            page: self.page,
            total_pages: self.total_pages,
            movies: self.movies.iter().map(MovieDto::to_domain).collect(),
        }
    }
}

impl MovieDto {
    pub fn to_domain(&self) -> Movie {
        Movie {
            id: self.id.to_string(),
            title: self.title.clone(),
            genre: self.genre.as_deref().and_then(genre_from_code),
            poster_path: self.poster_path.clone(),
            overview: self.overview.clone(),
            release_date: self
                .release_date
                .as_deref()
                .and_then(|s| NaiveDate::parse_from_str(s, RELEASE_DATE_FORMAT).ok()),
        }
    }
}

fn genre_from_code(code: &str) -> Option<Genre> {
    match code {
        "adventure" => Some(Genre::Adventure),
        "science_fiction" => Some(Genre::ScienceFiction),
        _ => None,
    }
}
