use bytes::Bytes;
use movies_client::{ApiEndpoint, ResponseDecoderKind};

use super::dto::{MoviesRequestDto, MoviesResponseDto};

/// Poster widths served by the image endpoint.
pub const POSTER_WIDTHS: [u32; 6] = [92, 154, 185, 342, 500, 780];

/// Cacheable search request for one page of results.
pub fn get_movies(request: &MoviesRequestDto) -> ApiEndpoint<MoviesResponseDto> {
    ApiEndpoint::get("search/movie")
        .query("query", request.query.as_str())
        .query("page", request.page.to_string())
        .cacheable(true)
}

/// Poster image at the supported width closest to `width`.
pub fn get_movie_poster(path: &str, width: u32) -> ApiEndpoint<Bytes> {
    ApiEndpoint::get(format!(
        "w{}/{}",
        closest_poster_width(width),
        path.trim_start_matches('/')
    ))
    .decoder(ResponseDecoderKind::RawBytes)
}

pub fn closest_poster_width(width: u32) -> u32 {
    POSTER_WIDTHS
        .iter()
        .copied()
        .min_by_key(|w| w.abs_diff(width))
        .unwrap_or(POSTER_WIDTHS[0])
}
