use super::source::FeedSource;
use crate::{
    error::Result,
    models::{Comment, Video},
};
use async_trait::async_trait;

/// Serves a fixed feed held in memory.
#[derive(Debug, Clone, Default)]
pub struct StaticSource {
    videos: Vec<Video>,
    comments: Vec<Comment>,
}

impl StaticSource {
    pub fn new(videos: Vec<Video>, comments: Vec<Comment>) -> Self {
        Self { videos, comments }
    }
}

#[async_trait]
impl FeedSource for StaticSource {
    fn name(&self) -> &'static str {
        "static"
    }

    async fn load_videos(&self) -> Result<Vec<Video>> {
        Ok(self.videos.clone())
    }

    async fn load_comments(&self) -> Result<Vec<Comment>> {
        Ok(self.comments.clone())
    }
}
