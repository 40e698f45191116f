pub mod api_endpoints;
pub mod dto;

pub use dto::{MovieDto, MoviesRequestDto, MoviesResponseDto};
