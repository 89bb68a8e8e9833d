use serde::{Deserialize, Serialize};

use crate::utils::format_count;

const UNKNOWN_USER: &str = "unknown";

/// A single feed entry as it appears in `video_data.json`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Video {
    pub id: Option<i64>,
    #[serde(rename = "userID")]
    pub user_id: Option<i64>,
    pub username: Option<String>,
    #[serde(rename = "profilePicURL")]
    pub profile_pic_url: Option<String>,
    pub description: Option<String>,
    pub topic: Option<String>,
    pub viewers: Option<u64>,
    pub likes: Option<u64>,
    pub video: Option<String>,
    #[serde(rename = "thumbnailURL")]
    pub thumbnail_url: Option<String>,
}

impl Video {
    pub fn display_username(&self) -> &str {
        self.username.as_deref().unwrap_or(UNKNOWN_USER)
    }

    pub fn display_description(&self) -> &str {
        self.description.as_deref().unwrap_or_default()
    }

    pub fn display_topic(&self) -> &str {
        self.topic.as_deref().unwrap_or_default()
    }

    pub fn viewers_label(&self) -> String {
        format_count(self.viewers.unwrap_or(0))
    }

    pub fn likes_label(&self) -> String {
        format_count(self.likes.unwrap_or(0))
    }
}

/// A comment as it appears in `comments_data.json`, or one typed locally.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    pub id: Option<i64>,
    pub username: Option<String>,
    #[serde(rename = "picURL")]
    pub pic_url: Option<String>,
    pub comment: Option<String>,
}

impl Comment {
    pub fn display_username(&self) -> &str {
        self.username.as_deref().unwrap_or(UNKNOWN_USER)
    }

    pub fn text(&self) -> &str {
        self.comment.as_deref().unwrap_or_default()
    }
}
