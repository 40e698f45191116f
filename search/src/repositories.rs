//! Repositories hide where data comes from (network, cache, disk) and hand
//! out domain values.

pub mod movies;
pub mod movies_queries;
pub mod poster_images;

pub use movies::{DefaultMoviesRepository, MoviesRepository};
pub use movies_queries::{DefaultMoviesQueriesRepository, MoviesQueriesRepository};
pub use poster_images::{DefaultPosterImagesRepository, PosterImagesRepository};
