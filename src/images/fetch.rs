use crate::error::{Error, Result};
use image::RgbaImage;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;
use url::Url;

pub type ProfileImage = Arc<RgbaImage>;

/// Stateless HTTP image service. Every call fetches independently; nothing is cached.
#[derive(Clone)]
pub struct ImageFetcher {
    client: reqwest::Client,
}

impl ImageFetcher {
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| Error::ImageFetch(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self::with_client(client))
    }

    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }

    pub async fn fetch(&self, url: &str) -> Result<ProfileImage> {
        let url = parse_image_url(url)?;
        debug!("Fetching profile image: {}", url);

        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| Error::ImageFetch(format!("Request to {url} failed: {e}")))?;

        if !response.status().is_success() {
            return Err(Error::ImageFetch(format!(
                "Failed to download {}: HTTP {}",
                url,
                response.status()
            )));
        }

        let data = response
            .bytes()
            .await
            .map_err(|e| Error::ImageFetch(format!("Failed to read image body: {e}")))?;

        decode_image(&data)
    }
}

fn parse_image_url(raw: &str) -> Result<Url> {
    let url = Url::parse(raw.trim())
        .map_err(|e| Error::ImageFetch(format!("Invalid image URL {raw:?}: {e}")))?;

    match url.scheme() {
        "http" | "https" => Ok(url),
        scheme => Err(Error::ImageFetch(format!(
            "Unsupported image URL scheme: {scheme}"
        ))),
    }
}

/// Decodes PNG, JPEG, GIF, WebP and the other raster formats `image` recognises.
pub fn decode_image(data: &[u8]) -> Result<ProfileImage> {
    let decoded = image::load_from_memory(data)
        .map_err(|e| Error::ImageFetch(format!("Failed to decode image: {e}")))?;
    Ok(Arc::new(decoded.to_rgba8()))
}
