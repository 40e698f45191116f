//! Recent search terms, most recent first, unique by text and bounded in size.

use std::path::PathBuf;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use log::debug;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

use crate::{
    domain::MovieQuery,
    error::StorageError,
    storage::{read_json, write_json_atomic},
};

#[async_trait]
pub trait MoviesQueriesStorage: Send + Sync {
    /// Up to `max_count` queries, most recent first. An empty store is not an
    /// error.
    async fn fetch_recents_queries(&self, max_count: usize) -> Result<Vec<MovieQuery>, StorageError>;

    /// Records `query` as the most recent one and returns it.
    async fn save_recent_query(&self, query: MovieQuery) -> Result<MovieQuery, StorageError>;
}

/// Moves `query` to the head of `queries`, dropping any older copy of the
/// same text and everything beyond `limit`.
fn record_query(queries: &mut Vec<MovieQuery>, query: MovieQuery, limit: usize) {
    queries.retain(|q| q.query != query.query);
    queries.insert(0, query);
    queries.truncate(limit);
}

fn most_recent(queries: &[MovieQuery], max_count: usize) -> Vec<MovieQuery> {
    queries.iter().take(max_count).cloned().collect()
}

/// Process-local store.
pub struct InMemoryMoviesQueriesStorage {
    max_storage_limit: usize,
    queries: Mutex<Vec<MovieQuery>>,
}

impl InMemoryMoviesQueriesStorage {
    pub fn new(max_storage_limit: usize) -> Self {
        Self {
            max_storage_limit,
            queries: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl MoviesQueriesStorage for InMemoryMoviesQueriesStorage {
    async fn fetch_recents_queries(&self, max_count: usize) -> Result<Vec<MovieQuery>, StorageError> {
        Ok(most_recent(&self.queries.lock().await, max_count))
    }

    async fn save_recent_query(&self, query: MovieQuery) -> Result<MovieQuery, StorageError> {
        let mut queries = self.queries.lock().await;
        record_query(&mut queries, query.clone(), self.max_storage_limit);
        Ok(query)
    }
}

/// Persisted shape: one named slot holding the ordered list.
#[derive(Debug, Default, Serialize, Deserialize)]
struct QueriesFile {
    #[serde(rename = "recentsMoviesQueries", default)]
    list: Vec<MovieQueryRecord>,
}

#[derive(Debug, Serialize, Deserialize)]
struct MovieQueryRecord {
    query: String,
    #[serde(default)]
    created_at: Option<DateTime<Utc>>,
}

impl From<&MovieQuery> for MovieQueryRecord {
    fn from(query: &MovieQuery) -> Self {
        Self {
            query: query.query.clone(),
            created_at: Some(query.created_at),
        }
    }
}

impl MovieQueryRecord {
    fn into_domain(self) -> MovieQuery {
        MovieQuery {
            query: self.query,
            created_at: self.created_at.unwrap_or(DateTime::<Utc>::UNIX_EPOCH),
        }
    }
}

/// Store persisted as a JSON file. Saves are serialized through an internal
/// lock and written atomically.
pub struct FileMoviesQueriesStorage {
    path: PathBuf,
    max_storage_limit: usize,
    write_lock: Mutex<()>,
}

impl FileMoviesQueriesStorage {
    pub fn new(path: impl Into<PathBuf>, max_storage_limit: usize) -> Self {
        Self {
            path: path.into(),
            max_storage_limit,
            write_lock: Mutex::new(()),
        }
    }

    async fn load(&self) -> Result<Vec<MovieQuery>, StorageError> {
        let file: Option<QueriesFile> = read_json(&self.path).await?;
        Ok(file
            .unwrap_or_default()
            .list
            .into_iter()
            .map(MovieQueryRecord::into_domain)
            .collect())
    }
}

#[async_trait]
impl MoviesQueriesStorage for FileMoviesQueriesStorage {
    async fn fetch_recents_queries(&self, max_count: usize) -> Result<Vec<MovieQuery>, StorageError> {
        Ok(most_recent(&self.load().await?, max_count))
    }

    async fn save_recent_query(&self, query: MovieQuery) -> Result<MovieQuery, StorageError> {
        let _guard = self.write_lock.lock().await;
        let mut queries = self.load().await?;
        record_query(&mut queries, query.clone(), self.max_storage_limit);

        let file = QueriesFile {
            list: queries.iter().map(MovieQueryRecord::from).collect(),
        };
        write_json_atomic(&self.path, &file).await?;
        debug!("saved recent query {:?} ({} stored)", query.query, file.list.len());
        Ok(query)
    }
}
