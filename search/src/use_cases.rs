pub mod fetch_recent_queries;
pub mod search_movies;

pub use fetch_recent_queries::{DefaultFetchRecentMovieQueriesUseCase, FetchRecentMovieQueriesUseCase};
pub use search_movies::{DefaultSearchMoviesUseCase, SearchMoviesRequest, SearchMoviesUseCase};
