use async_trait::async_trait;
use bytes::Bytes;
use log::debug;
use movies_client::DataTransferService;

use crate::{error::SearchError, network::api_endpoints};

#[async_trait]
pub trait PosterImagesRepository: Send + Sync {
    /// Raw image bytes for `image_path` at the supported width closest to
    /// `width`. Images are never cached.
    async fn fetch_image(&self, image_path: &str, width: u32) -> Result<Bytes, SearchError>;
}

pub struct DefaultPosterImagesRepository {
    transfer: DataTransferService,
}

impl DefaultPosterImagesRepository {
    pub fn new(transfer: DataTransferService) -> Self {
        Self { transfer }
    }
}

#[async_trait]
impl PosterImagesRepository for DefaultPosterImagesRepository {
    async fn fetch_image(&self, image_path: &str, width: u32) -> Result<Bytes, SearchError> {
        let endpoint = api_endpoints::get_movie_poster(image_path, width);
        let image = self.transfer.request(&endpoint).await?;
        debug!("fetched poster {image_path} ({} bytes)", image.len());
        Ok(image)
    }
}
