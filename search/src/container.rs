//! Wires concrete implementations together from an [`AppConfiguration`].

use std::{sync::Arc, time::Duration};

use log::info;
use movies_client::{DataTransferService, DefaultNetworkService, NetworkConfig, NetworkService};
use reqwest::{Client, Url};

use crate::{
    cache::{CachePolicy, FileResponseCache, InMemoryResponseCache, ResponseCache},
    config::AppConfiguration,
    error::ConfigError,
    network::MoviesResponseDto,
    poster_slot::PosterImageSlot,
    repositories::{
        DefaultMoviesQueriesRepository, DefaultMoviesRepository, DefaultPosterImagesRepository,
        MoviesQueriesRepository, MoviesRepository, PosterImagesRepository,
    },
    storage::{FileMoviesQueriesStorage, InMemoryMoviesQueriesStorage, MoviesQueriesStorage},
    use_cases::{
        DefaultFetchRecentMovieQueriesUseCase, DefaultSearchMoviesUseCase,
        FetchRecentMovieQueriesUseCase, SearchMoviesUseCase,
    },
};

pub struct AppContainer {
    api_transfer: DataTransferService,
    images_transfer: DataTransferService,
    cache: Arc<dyn ResponseCache<MoviesResponseDto>>,
    queries_storage: Arc<dyn MoviesQueriesStorage>,
}

impl AppContainer {
    pub fn new(config: &AppConfiguration) -> Result<Self, ConfigError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.network.timeout_seconds))
            .build()?;

        let api_config = NetworkConfig::new(parse_url(&config.api.base_url)?)
            .with_query_parameter("api_key", &config.api.api_key)
            .with_query_parameter("language", &config.api.language);
        let images_config = NetworkConfig::new(parse_url(&config.images.base_url)?);

        let api_network: Arc<dyn NetworkService> =
            Arc::new(DefaultNetworkService::with_client(client.clone(), api_config));
        let images_network: Arc<dyn NetworkService> =
            Arc::new(DefaultNetworkService::with_client(client, images_config));

        Self::with_services(
            config,
            DataTransferService::new(api_network),
            DataTransferService::new(images_network),
        )
    }

    /// Builds the container around already constructed transfer services.
    pub fn with_services(
        config: &AppConfiguration,
        api_transfer: DataTransferService,
        images_transfer: DataTransferService,
    ) -> Result<Self, ConfigError> {
        let storage = &config.storage;
        let policy = cache_policy(storage.cache_max_age_seconds)?;

        let cache: Arc<dyn ResponseCache<MoviesResponseDto>> = match &storage.cache_path {
            Some(path) => {
                info!("caching responses in {}", path.display());
                Arc::new(FileResponseCache::<MoviesResponseDto>::new(path, policy))
            }
            None => Arc::new(InMemoryResponseCache::<MoviesResponseDto>::new(policy)),
        };

        let queries_storage: Arc<dyn MoviesQueriesStorage> = match &storage.queries_path {
            Some(path) => Arc::new(FileMoviesQueriesStorage::new(path, storage.max_recent_queries)),
            None => Arc::new(InMemoryMoviesQueriesStorage::new(storage.max_recent_queries)),
        };

        Ok(Self {
            api_transfer,
            images_transfer,
            cache,
            queries_storage,
        })
    }

    pub fn movies_repository(&self) -> Arc<dyn MoviesRepository> {
        Arc::new(DefaultMoviesRepository::new(
            self.api_transfer.clone(),
            self.cache.clone(),
        ))
    }

    pub fn movies_queries_repository(&self) -> Arc<dyn MoviesQueriesRepository> {
        Arc::new(DefaultMoviesQueriesRepository::new(self.queries_storage.clone()))
    }

    pub fn poster_images_repository(&self) -> Arc<dyn PosterImagesRepository> {
        Arc::new(DefaultPosterImagesRepository::new(self.images_transfer.clone()))
    }

    pub fn search_movies_use_case(&self) -> Arc<dyn SearchMoviesUseCase> {
        Arc::new(DefaultSearchMoviesUseCase::new(
            self.movies_repository(),
            self.movies_queries_repository(),
        ))
    }

    pub fn fetch_recent_queries_use_case(&self) -> Arc<dyn FetchRecentMovieQueriesUseCase> {
        Arc::new(DefaultFetchRecentMovieQueriesUseCase::new(
            self.movies_queries_repository(),
        ))
    }

    pub fn poster_image_slot(&self) -> PosterImageSlot {
        PosterImageSlot::new(self.poster_images_repository())
    }
}

fn parse_url(url: &str) -> Result<Url, ConfigError> {
    Url::parse(url).map_err(|e| ConfigError::Invalid(vec![format!("invalid base URL {url}: {e}")]))
}

/// Maps the configured maximum age to a policy. Ages chrono cannot
/// represent are rejected.
pub(crate) fn cache_policy(max_age_seconds: Option<u64>) -> Result<CachePolicy, ConfigError> {
    let Some(seconds) = max_age_seconds else {
        return Ok(CachePolicy::NeverExpire);
    };
    i64::try_from(seconds)
        .ok()
        .and_then(chrono::Duration::try_seconds)
        .map(CachePolicy::MaxAge)
        .ok_or_else(|| {
            ConfigError::Invalid(vec![format!(
                "cache_max_age_seconds {seconds} is out of range"
            )])
        })
}
