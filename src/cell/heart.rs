use crate::config::AnimationConfig;
use std::time::{Duration, Instant};

/// One frame of a floating heart: fully opaque at its origin, transparent at the top.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeartFrame {
    pub opacity: f32,
    pub rise: f32,
}

/// Hearts spawned by double taps. Purely cosmetic, they never touch the like count.
#[derive(Debug)]
pub struct HeartAnimation {
    duration: Duration,
    rise: f32,
    started: Vec<Instant>,
}

impl HeartAnimation {
    pub fn new(duration: Duration, rise: f32) -> Self {
        Self {
            duration,
            rise,
            started: Vec::new(),
        }
    }

    pub fn from_config(config: &AnimationConfig) -> Self {
        Self::new(config.like_duration(), config.like_rise)
    }

    pub fn spawn(&mut self, now: Instant) {
        self.started.push(now);
    }

    /// Drops finished hearts and returns the frames of the ones still on screen.
    pub fn tick(&mut self, now: Instant) -> Vec<HeartFrame> {
        let duration = self.duration;
        self.started
            .retain(|started| now.saturating_duration_since(*started) < duration);

        self.started
            .iter()
            .map(|started| {
                let progress = if duration.is_zero() {
                    1.0
                } else {
                    now.saturating_duration_since(*started).as_secs_f32() / duration.as_secs_f32()
                };
                HeartFrame {
                    opacity: 1.0 - progress,
                    rise: self.rise * progress,
                }
            })
            .collect()
    }

    pub fn active(&self) -> usize {
        self.started.len()
    }
}
