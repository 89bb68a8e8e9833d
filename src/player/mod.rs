mod headless;

pub use headless::{BackendCall, HeadlessBackend};

use tracing::debug;

/// Platform media player driven by [`LoopingPlayer`].
pub trait MediaBackend: Send {
    /// Human-readable name of the backend
    fn name(&self) -> &'static str;

    /// Bind the player to a media URL
    fn load(&mut self, url: &str);

    fn play(&mut self);

    fn pause(&mut self);

    fn seek_to_start(&mut self);
}

/// Events the backend raises back into the player wrapper.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerEvent {
    ReachedEnd,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerStatus {
    /// No media bound; play requests are ignored.
    Empty,
    Playing,
    Paused,
}

/// Wraps a backend so that playback restarts from the beginning whenever it reaches the
/// end, unless it was explicitly paused.
pub struct LoopingPlayer {
    backend: Box<dyn MediaBackend>,
    status: PlayerStatus,
    loops: u64,
}

impl LoopingPlayer {
    pub fn new(mut backend: Box<dyn MediaBackend>, url: Option<&str>) -> Self {
        let status = match url.map(str::trim).filter(|url| !url.is_empty()) {
            Some(url) => {
                backend.load(url);
                PlayerStatus::Paused
            }
            None => {
                debug!("No media URL for {} player", backend.name());
                PlayerStatus::Empty
            }
        };

        Self {
            backend,
            status,
            loops: 0,
        }
    }

    pub fn play(&mut self) {
        if self.status == PlayerStatus::Paused {
            self.backend.play();
            self.status = PlayerStatus::Playing;
        }
    }

    pub fn pause(&mut self) {
        if self.status == PlayerStatus::Playing {
            self.backend.pause();
            self.status = PlayerStatus::Paused;
        }
    }

    /// Flips between playing and paused. Returns whether the player is now playing.
    pub fn toggle(&mut self) -> bool {
        match self.status {
            PlayerStatus::Playing => self.pause(),
            PlayerStatus::Paused => self.play(),
            PlayerStatus::Empty => {}
        }
        self.is_playing()
    }

    pub fn handle_event(&mut self, event: PlayerEvent) {
        match event {
            PlayerEvent::ReachedEnd if self.status == PlayerStatus::Playing => {
                self.backend.seek_to_start();
                self.backend.play();
                self.loops += 1;
            }
            PlayerEvent::ReachedEnd => {
                debug!("End of media while {:?}, not looping", self.status);
            }
        }
    }

    pub fn status(&self) -> PlayerStatus {
        self.status
    }

    pub fn is_playing(&self) -> bool {
        self.status == PlayerStatus::Playing
    }

    /// Number of times playback wrapped around to the start.
    pub fn loops(&self) -> u64 {
        self.loops
    }
}
