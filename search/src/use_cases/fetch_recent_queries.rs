use std::sync::Arc;

use async_trait::async_trait;

use crate::{domain::MovieQuery, error::SearchError, repositories::MoviesQueriesRepository};

#[async_trait]
pub trait FetchRecentMovieQueriesUseCase: Send + Sync {
    async fn execute(&self, max_count: usize) -> Result<Vec<MovieQuery>, SearchError>;
}

pub struct DefaultFetchRecentMovieQueriesUseCase {
    queries_repository: Arc<dyn MoviesQueriesRepository>,
}

impl DefaultFetchRecentMovieQueriesUseCase {
    pub fn new(queries_repository: Arc<dyn MoviesQueriesRepository>) -> Self {
        Self { queries_repository }
    }
}

#[async_trait]
impl FetchRecentMovieQueriesUseCase for DefaultFetchRecentMovieQueriesUseCase {
    async fn execute(&self, max_count: usize) -> Result<Vec<MovieQuery>, SearchError> {
        self.queries_repository.fetch_recents_queries(max_count).await
    }
}
