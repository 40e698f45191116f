use std::sync::Arc;

use async_trait::async_trait;
use log::{debug, warn};
use movies_client::{DataTransferService, Requestable};

use crate::{
    cache::ResponseCache,
    domain::{MovieQuery, MoviesPage},
    error::SearchError,
    network::{api_endpoints, MoviesRequestDto, MoviesResponseDto},
};

#[async_trait]
pub trait MoviesRepository: Send + Sync {
    async fn fetch_movies_list(&self, query: &MovieQuery, page: u32) -> Result<MoviesPage, SearchError>;
}

/// Read-through repository: a cached page is served without touching the
/// network, a fresh one is cached before it is returned.
pub struct DefaultMoviesRepository {
    transfer: DataTransferService,
    cache: Arc<dyn ResponseCache<MoviesResponseDto>>,
}

impl DefaultMoviesRepository {
    pub fn new(transfer: DataTransferService, cache: Arc<dyn ResponseCache<MoviesResponseDto>>) -> Self {
        Self { transfer, cache }
    }
}

#[async_trait]
impl MoviesRepository for DefaultMoviesRepository {
    async fn fetch_movies_list(&self, query: &MovieQuery, page: u32) -> Result<MoviesPage, SearchError> {
        let endpoint = api_endpoints::get_movies(&MoviesRequestDto {
            query: query.query.clone(),
            page,
        });

        if !endpoint.is_cacheable() {
            return Ok(self.transfer.request(&endpoint).await?.to_domain());
        }

        let fingerprint = endpoint.fingerprint();
        if let Some(cached) = self.cache.get(&fingerprint).await {
            debug!("cache hit for {fingerprint}");
            return Ok(cached.to_domain());
        }

        let response = self.transfer.request(&endpoint).await?;
        if let Err(e) = self.cache.put(fingerprint, response.clone()).await {
            warn!("failed to cache movies page: {e}");
        }
        Ok(response.to_domain())
    }
}
