use super::source::FeedSource;
use crate::{
    config::AssetsConfig,
    error::{Error, Result},
    models::{Comment, Video},
};
use async_trait::async_trait;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

#[derive(Deserialize)]
struct VideoFeed {
    #[serde(default)]
    videos: Option<Vec<Video>>,
}

#[derive(Deserialize)]
struct CommentFeed {
    #[serde(default)]
    comments: Option<Vec<Comment>>,
}

/// Reads the bundled JSON assets from a local directory.
pub struct AssetRepository {
    videos_path: PathBuf,
    comments_path: PathBuf,
}

impl AssetRepository {
    pub fn new(videos_path: impl Into<PathBuf>, comments_path: impl Into<PathBuf>) -> Self {
        Self {
            videos_path: videos_path.into(),
            comments_path: comments_path.into(),
        }
    }

    pub fn from_config(config: &AssetsConfig) -> Self {
        Self::new(config.videos_path(), config.comments_path())
    }

    async fn read_asset(path: &Path) -> Result<Vec<u8>> {
        debug!("Reading asset: {}", path.display());

        tokio::fs::read(path).await.map_err(|source| {
            if source.kind() == std::io::ErrorKind::NotFound {
                Error::NotFound {
                    path: path.to_path_buf(),
                }
            } else {
                Error::Io {
                    path: path.to_path_buf(),
                    source,
                }
            }
        })
    }
}

#[async_trait]
impl FeedSource for AssetRepository {
    fn name(&self) -> &'static str {
        "bundled assets"
    }

    async fn load_videos(&self) -> Result<Vec<Video>> {
        let data = Self::read_asset(&self.videos_path).await?;
        let feed: VideoFeed = serde_json::from_slice(&data).map_err(|source| Error::Decode {
            path: self.videos_path.clone(),
            source,
        })?;

        let videos = feed.videos.unwrap_or_default();
        info!(
            "Loaded {} videos from {}",
            videos.len(),
            self.videos_path.display()
        );
        Ok(videos)
    }

    async fn load_comments(&self) -> Result<Vec<Comment>> {
        let data = Self::read_asset(&self.comments_path).await?;
        let feed: CommentFeed = serde_json::from_slice(&data).map_err(|source| Error::Decode {
            path: self.comments_path.clone(),
            source,
        })?;

        let comments = feed.comments.unwrap_or_default();
        info!(
            "Loaded {} comments from {}",
            comments.len(),
            self.comments_path.display()
        );
        Ok(comments)
    }
}
