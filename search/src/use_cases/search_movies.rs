use std::sync::Arc;

use async_trait::async_trait;
use log::info;

use crate::{
    domain::{MovieQuery, MoviesPage},
    error::SearchError,
    repositories::{MoviesQueriesRepository, MoviesRepository},
};

#[derive(Debug, Clone)]
pub struct SearchMoviesRequest {
    pub query: MovieQuery,
    pub page: u32,
}

impl SearchMoviesRequest {
    pub fn new(query: impl Into<String>, page: u32) -> Self {
        Self {
            query: MovieQuery::new(query),
            page,
        }
    }
}

#[async_trait]
pub trait SearchMoviesUseCase: Send + Sync {
    async fn execute(&self, request: SearchMoviesRequest) -> Result<MoviesPage, SearchError>;
}

/// Fetches a page, then records the query.
///
/// The query is recorded only after a successful fetch, and a failure to
/// record it fails the whole search.
pub struct DefaultSearchMoviesUseCase {
    movies_repository: Arc<dyn MoviesRepository>,
    queries_repository: Arc<dyn MoviesQueriesRepository>,
}

impl DefaultSearchMoviesUseCase {
    pub fn new(
        movies_repository: Arc<dyn MoviesRepository>,
        queries_repository: Arc<dyn MoviesQueriesRepository>,
    ) -> Self {
        Self {
            movies_repository,
            queries_repository,
        }
    }
}

#[async_trait]
impl SearchMoviesUseCase for DefaultSearchMoviesUseCase {
    async fn execute(&self, request: SearchMoviesRequest) -> Result<MoviesPage, SearchError> {
        let page = self
            .movies_repository
            .fetch_movies_list(&request.query, request.page)
            .await?;
        info!(
            "search {:?} page {}/{}: {} movies",
            request.query.query,
            page.page,
            page.total_pages,
            page.movies.len()
        );

        self.queries_repository.save_recent_query(request.query).await?;
        Ok(page)
    }
}

#[cfg(test)]
mod tests {
    use std::{
        path::PathBuf,
        sync::{
            atomic::{AtomicUsize, Ordering},
            Mutex,
        },
    };

    use movies_client::{DataTransferError, NetworkError};

    use super::*;
    use crate::error::StorageError;

    struct ScriptedMoviesRepository {
        fail: bool,
    }

    #[async_trait]
    impl MoviesRepository for ScriptedMoviesRepository {
        async fn fetch_movies_list(&self, _query: &MovieQuery, page: u32) -> Result<MoviesPage, SearchError> {
            if self.fail {
                return Err(DataTransferError::NetworkFailure(NetworkError::NotConnected).into());
            }
            Ok(MoviesPage {
                page,
                total_pages: 4,
                movies: Vec::new(),
            })
        }
    }

    #[derive(Default)]
    struct RecordingQueriesRepository {
        saved: Mutex<Vec<String>>,
        save_calls: AtomicUsize,
        fail_saves: bool,
    }

    #[async_trait]
    impl MoviesQueriesRepository for RecordingQueriesRepository {
        async fn fetch_recents_queries(&self, _max_count: usize) -> Result<Vec<MovieQuery>, SearchError> {
            Ok(Vec::new())
        }

        async fn save_recent_query(&self, query: MovieQuery) -> Result<MovieQuery, SearchError> {
            self.save_calls.fetch_add(1, Ordering::SeqCst);
            if self.fail_saves {
                return Err(StorageError::Save {
                    path: PathBuf::from("queries.json"),
                    source: std::io::Error::other("disk full"),
                }
                .into());
            }
            self.saved.lock().unwrap().push(query.query.clone());
            Ok(query)
        }
    }

    fn use_case(
        fail_fetch: bool,
        queries: Arc<RecordingQueriesRepository>,
    ) -> DefaultSearchMoviesUseCase {
        DefaultSearchMoviesUseCase::new(Arc::new(ScriptedMoviesRepository { fail: fail_fetch }), queries)
    }

    #[tokio::test]
    async fn failed_fetch_never_records_the_query() {
        let queries = Arc::new(RecordingQueriesRepository::default());
        let result = use_case(true, queries.clone())
            .execute(SearchMoviesRequest::new("batman", 1))
            .await;

        assert!(matches!(result, Err(SearchError::Transfer(_))));
        assert_eq!(queries.save_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn successful_fetch_records_the_query_once() {
        let queries = Arc::new(RecordingQueriesRepository::default());
        let page = use_case(false, queries.clone())
            .execute(SearchMoviesRequest::new("batman", 2))
            .await
            .unwrap();

        assert_eq!(page.page, 2);
        assert_eq!(queries.save_calls.load(Ordering::SeqCst), 1);
        assert_eq!(*queries.saved.lock().unwrap(), vec!["batman".to_string()]);
    }

    #[tokio::test]
    async fn failed_save_fails_the_search() {
        let queries = Arc::new(RecordingQueriesRepository {
            fail_saves: true,
            ..Default::default()
        });
        let result = use_case(false, queries)
            .execute(SearchMoviesRequest::new("batman", 1))
            .await;

        assert!(matches!(result, Err(SearchError::Storage(StorageError::Save { .. }))));
    }
}
