//! Progress reporting for remote loads.

use crate::error::UrlSyncError;
use parking_lot::Mutex;
use tracing::{info, warn};

/// Receives the lifecycle of each remote load.
pub trait StatusReporter: Send + Sync {
    fn loading(&self, url: &str);
    fn loaded(&self, url: &str);
    fn failed(&self, url: &str, error: &UrlSyncError);
}

/// Reports through `tracing`.
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingStatus;

impl StatusReporter for TracingStatus {
    fn loading(&self, url: &str) {
        info!(url, "Loading state");
    }

    fn loaded(&self, url: &str) {
        info!(url, "Loaded state");
    }

    fn failed(&self, url: &str, error: &UrlSyncError) {
        warn!(url, %error, "Error loading state");
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StatusEvent {
    Loading(String),
    Loaded(String),
    Failed(String, UrlSyncError),
}

/// Keeps every status event in order.
#[derive(Debug, Default)]
pub struct RecordingStatus {
    events: Mutex<Vec<StatusEvent>>,
}

impl RecordingStatus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<StatusEvent> {
        self.events.lock().clone()
    }
}

impl StatusReporter for RecordingStatus {
    fn loading(&self, url: &str) {
        self.events.lock().push(StatusEvent::Loading(url.to_string()));
    }

    fn loaded(&self, url: &str) {
        self.events.lock().push(StatusEvent::Loaded(url.to_string()));
    }

    fn failed(&self, url: &str, error: &UrlSyncError) {
        self.events
            .lock()
            .push(StatusEvent::Failed(url.to_string(), error.clone()));
    }
}
