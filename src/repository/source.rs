use crate::error::Result;
use crate::models::{Comment, Video};
use async_trait::async_trait;

#[async_trait]
pub trait FeedSource: Send + Sync {
    /// Human-readable name of the source
    fn name(&self) -> &'static str;

    /// Load the ordered video feed
    async fn load_videos(&self) -> Result<Vec<Video>>;

    /// Load the comments shown under the active video
    async fn load_comments(&self) -> Result<Vec<Comment>>;
}
