//! State machine behind the upload screen
//!
//! The screen is either idle or uploading. A trigger moves it to uploading and
//! allocates a new attempt id; exactly one terminal callback for that attempt
//! moves it back to idle. Callbacks carrying any other attempt id, or arriving
//! after the screen was torn down, are dropped without touching the state.

use std::fmt;

use crate::model::error::UploadError;
use crate::model::upload_event::{AttemptId, UploadEvent, UploadEventKind, UploadResponse};

/// Human readable state of the last attempt, rendered in the status label
#[derive(Debug, Clone, PartialEq, Default)]
pub enum UploadStatus {
    #[default]
    Idle,
    Uploading,
    Succeeded,
    Failed(String),
}

impl fmt::Display for UploadStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UploadStatus::Idle => write!(f, "Idle"),
            UploadStatus::Uploading => write!(f, "Uploading…"),
            UploadStatus::Succeeded => write!(f, "Succeeded"),
            UploadStatus::Failed(reason) => write!(f, "Failed: {}", reason),
        }
    }
}

/// Upload state owned by one instance of the upload screen
#[derive(Debug, Clone, PartialEq, Default)]
pub struct UploadScreen {
    instance: u64,
    attempts: u64,
    current: Option<AttemptId>,
    progress: f64,
    status: UploadStatus,
    last_response: Option<UploadResponse>,
    torn_down: bool,
}

impl UploadScreen {
    pub fn new(instance: u64) -> Self {
        UploadScreen {
            instance,
            ..UploadScreen::default()
        }
    }

    pub fn instance(&self) -> u64 {
        self.instance
    }

    pub fn is_uploading(&self) -> bool {
        self.current.is_some()
    }

    /// Fraction of the current (or last) attempt that was sent, in `[0, 1]`
    pub fn progress(&self) -> f64 {
        self.progress
    }

    pub fn status(&self) -> &UploadStatus {
        &self.status
    }

    pub fn status_text(&self) -> String {
        self.status.to_string()
    }

    pub fn last_response(&self) -> Option<&UploadResponse> {
        self.last_response.as_ref()
    }

    pub fn current_attempt(&self) -> Option<AttemptId> {
        self.current
    }

    pub fn is_torn_down(&self) -> bool {
        self.torn_down
    }

    pub fn button_enabled(&self) -> bool {
        !self.is_uploading()
    }

    /// Spinner and progress bar are shown only while an attempt is in flight
    pub fn indicators_visible(&self) -> bool {
        self.is_uploading()
    }

    /// Starts a new attempt.
    ///
    /// Returns `None` while an attempt is already in flight or after teardown;
    /// that is a no-op, not an error.
    pub fn on_upload_triggered(&mut self) -> Option<AttemptId> {
        if self.torn_down || self.is_uploading() {
            return None;
        }
        self.attempts += 1;
        let attempt = AttemptId {
            screen: self.instance,
            seq: self.attempts,
        };
        self.current = Some(attempt);
        self.progress = 0.0;
        self.status = UploadStatus::Uploading;
        Some(attempt)
    }

    /// Records transfer progress. An unknown or zero `total` is indeterminate
    /// and keeps the previous value; progress never moves backwards.
    pub fn on_progress(&mut self, attempt: AttemptId, sent: u64, total: Option<u64>) -> bool {
        if !self.accepts(attempt) {
            return false;
        }
        match total {
            Some(total) if total > 0 => {
                let fraction = (sent as f64 / total as f64).clamp(0.0, 1.0);
                if fraction > self.progress {
                    self.progress = fraction;
                }
                true
            }
            _ => false,
        }
    }

    pub fn on_success(&mut self, attempt: AttemptId, response: UploadResponse) -> bool {
        if !self.accepts(attempt) {
            return false;
        }
        self.current = None;
        self.status = UploadStatus::Succeeded;
        self.last_response = Some(response);
        true
    }

    pub fn on_failure(&mut self, attempt: AttemptId, error: &UploadError) -> bool {
        if !self.accepts(attempt) {
            return false;
        }
        self.current = None;
        self.status = UploadStatus::Failed(error.reason());
        true
    }

    /// Routes a marshaled callback to the matching handler
    pub fn apply(&mut self, event: UploadEvent) -> bool {
        match event.kind {
            UploadEventKind::Progress { sent, total } => self.on_progress(event.attempt, sent, total),
            UploadEventKind::Succeeded(response) => self.on_success(event.attempt, response),
            UploadEventKind::Failed(error) => self.on_failure(event.attempt, &error),
        }
    }

    /// Ends this screen instance; any callback arriving later is ignored
    pub fn tear_down(&mut self) {
        self.torn_down = true;
        self.current = None;
    }

    fn accepts(&self, attempt: AttemptId) -> bool {
        !self.torn_down && self.current == Some(attempt)
    }
}
