//! Movie search on top of `movies-client`: repositories with a read-through
//! response cache, a bounded store of recent queries, the search use cases
//! and a poster image slot.

pub mod cache;
pub mod cli;
pub mod config;
pub mod config_manager;
pub mod container;
pub mod domain;
pub mod error;
pub mod network;
pub mod poster_slot;
pub mod repositories;
pub mod storage;
pub mod use_cases;

pub use container::AppContainer;
pub use domain::{Genre, Movie, MovieQuery, MoviesPage};
pub use error::{ConfigError, SearchError, StorageError};
