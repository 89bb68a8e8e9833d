//! View state for a vertically paged short-video feed with an overlaid comment list.
//!
//! The state machines here know nothing about any UI toolkit: a host renders
//! [`screen::FeedScreen`] and its [`cell::VideoCell`]s and reports visibility and gestures
//! back into them.

pub mod cell;
pub mod comments;
pub mod config;
pub mod error;
pub mod feed;
pub mod images;
pub mod models;
pub mod player;
pub mod repository;
pub mod screen;
pub mod utils;

pub use error::{Error, Result};
