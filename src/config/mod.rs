use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct LoggingConfig {
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            format: "json".to_string(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct AssetsConfig {
    pub dir: PathBuf,
    pub videos_file: String,
    pub comments_file: String,
}

impl Default for AssetsConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("assets"),
            videos_file: "video_data.json".to_string(),
            comments_file: "comments_data.json".to_string(),
        }
    }
}

impl AssetsConfig {
    pub fn videos_path(&self) -> PathBuf {
        self.dir.join(&self.videos_file)
    }

    pub fn comments_path(&self) -> PathBuf {
        self.dir.join(&self.comments_file)
    }
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct ImagesConfig {
    pub timeout_secs: u64,
}

impl Default for ImagesConfig {
    fn default() -> Self {
        Self { timeout_secs: 30 }
    }
}

/// Author shown on comments typed in this session.
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct CommentsConfig {
    pub local_author: String,
    pub local_pic_url: Option<String>,
}

impl Default for CommentsConfig {
    fn default() -> Self {
        Self {
            local_author: "You".to_string(),
            local_pic_url: None,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct AnimationConfig {
    pub like_duration_ms: u64,
    pub like_rise: f32,
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            like_duration_ms: 1000,
            like_rise: 120.0,
        }
    }
}

impl AnimationConfig {
    pub fn like_duration(&self) -> Duration {
        Duration::from_millis(self.like_duration_ms)
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Default)]
#[serde(default)]
pub struct Config {
    pub logging: LoggingConfig,
    pub assets: AssetsConfig,
    pub images: ImagesConfig,
    pub comments: CommentsConfig,
    pub animation: AnimationConfig,
}

impl Config {
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        Self::from_toml(&raw).with_context(|| format!("Invalid config in {}", path.display()))
    }

    pub fn from_toml(raw: &str) -> Result<Self> {
        let config: Config = toml::from_str(raw).context("Failed to parse TOML")?;
        Ok(config)
    }

    pub fn get_logging_format(&self) -> &str {
        &self.logging.format
    }

    pub fn image_timeout(&self) -> Duration {
        Duration::from_secs(self.images.timeout_secs)
    }
}
