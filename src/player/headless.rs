use super::MediaBackend;
use std::sync::{Arc, Mutex};
use tracing::trace;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendCall {
    Load(String),
    Play,
    Pause,
    SeekToStart,
}

/// Backend without any output that records what it was asked to do. Clones share the
/// same call log.
#[derive(Debug, Clone, Default)]
pub struct HeadlessBackend {
    calls: Arc<Mutex<Vec<BackendCall>>>,
}

impl HeadlessBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> Vec<BackendCall> {
        self.calls
            .lock()
            .map(|calls| calls.clone())
            .unwrap_or_default()
    }

    fn record(&self, call: BackendCall) {
        trace!("headless backend: {:?}", call);
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(call);
        }
    }
}

impl MediaBackend for HeadlessBackend {
    fn name(&self) -> &'static str {
        "headless"
    }

    fn load(&mut self, url: &str) {
        self.record(BackendCall::Load(url.to_string()));
    }

    fn play(&mut self) {
        self.record(BackendCall::Play);
    }

    fn pause(&mut self) {
        self.record(BackendCall::Pause);
    }

    fn seek_to_start(&mut self) {
        self.record(BackendCall::SeekToStart);
    }
}
