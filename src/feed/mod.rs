use crate::models::Video;
use tracing::{debug, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackState {
    Playing,
    Paused,
}

/// A playback change the screen has to apply to the cell at `index`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlaybackTransition {
    pub index: usize,
    pub state: PlaybackState,
}

/// Ordered feed plus the one page that currently fills the viewport.
///
/// At most one index is ever `Playing`: the active one.
#[derive(Debug, Default)]
pub struct FeedState {
    videos: Vec<Video>,
    active_index: Option<usize>,
}

impl FeedState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the feed. The active index is clamped into the new range, cleared for an
    /// empty feed, and starts at the first page when nothing was active before.
    pub fn set_videos(&mut self, videos: Vec<Video>) {
        self.videos = videos;
        self.active_index = match (self.videos.len(), self.active_index) {
            (0, _) => None,
            (len, Some(index)) => Some(index.min(len - 1)),
            (_, None) => Some(0),
        };
        debug!(
            "Feed replaced with {} videos, active index {:?}",
            self.videos.len(),
            self.active_index
        );
    }

    /// Records that `index` became fully visible or fully hidden and returns the playback
    /// changes that follow from it.
    pub fn on_visibility_changed(
        &mut self,
        index: usize,
        visible: bool,
    ) -> Vec<PlaybackTransition> {
        if index >= self.videos.len() {
            warn!(
                "Ignoring visibility change for index {} (feed has {} videos)",
                index,
                self.videos.len()
            );
            return Vec::new();
        }

        let mut transitions = Vec::new();

        if visible {
            if self.active_index == Some(index) {
                return transitions;
            }
            if let Some(previous) = self.active_index.replace(index) {
                transitions.push(PlaybackTransition {
                    index: previous,
                    state: PlaybackState::Paused,
                });
            }
            transitions.push(PlaybackTransition {
                index,
                state: PlaybackState::Playing,
            });
        } else if self.active_index == Some(index) {
            self.active_index = None;
            transitions.push(PlaybackTransition {
                index,
                state: PlaybackState::Paused,
            });
        }

        transitions
    }

    pub fn playback_state(&self, index: usize) -> PlaybackState {
        if self.active_index == Some(index) {
            PlaybackState::Playing
        } else {
            PlaybackState::Paused
        }
    }

    pub fn active_index(&self) -> Option<usize> {
        self.active_index
    }

    pub fn active_video(&self) -> Option<&Video> {
        self.active_index.and_then(|index| self.videos.get(index))
    }

    pub fn videos(&self) -> &[Video] {
        &self.videos
    }

    pub fn get(&self, index: usize) -> Option<&Video> {
        self.videos.get(index)
    }

    pub fn len(&self) -> usize {
        self.videos.len()
    }

    pub fn is_empty(&self) -> bool {
        self.videos.is_empty()
    }
}
