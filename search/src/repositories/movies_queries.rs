use std::sync::Arc;

use async_trait::async_trait;

use crate::{domain::MovieQuery, error::SearchError, storage::MoviesQueriesStorage};

#[async_trait]
pub trait MoviesQueriesRepository: Send + Sync {
    async fn fetch_recents_queries(&self, max_count: usize) -> Result<Vec<MovieQuery>, SearchError>;
    async fn save_recent_query(&self, query: MovieQuery) -> Result<MovieQuery, SearchError>;
}

pub struct DefaultMoviesQueriesRepository {
    storage: Arc<dyn MoviesQueriesStorage>,
}

impl DefaultMoviesQueriesRepository {
    pub fn new(storage: Arc<dyn MoviesQueriesStorage>) -> Self {
        Self { storage }
    }
}

#[async_trait]
impl MoviesQueriesRepository for DefaultMoviesQueriesRepository {
    async fn fetch_recents_queries(&self, max_count: usize) -> Result<Vec<MovieQuery>, SearchError> {
        Ok(self.storage.fetch_recents_queries(max_count).await?)
    }

    async fn save_recent_query(&self, query: MovieQuery) -> Result<MovieQuery, SearchError> {
        Ok(self.storage.save_recent_query(query).await?)
    }
}
