//! Callback contract between the upload screen and whatever performs the transfer
//!
//! A [`RequestClient`] starts the transfer and reports back through an
//! [`UploadDelegate`]. The delegate never touches screen state itself: every
//! callback becomes an [`UploadEvent`] on a channel drained by the task that
//! owns the state, so all mutations happen in one place.

use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::sync::mpsc::UnboundedSender;
use tokio::task::AbortHandle;
use url::Url;

use crate::model::error::{UploadError, UploadResult};
use crate::model::upload_event::{AttemptId, UploadEvent, UploadEventKind, UploadResponse};

/// Performs a multipart upload of a local resource
pub trait RequestClient: Send + Sync {
    /// Begins an asynchronous upload and returns immediately.
    ///
    /// Fails synchronously with [`UploadError::ResourceMissing`], without any
    /// callback, when `resource_path` is not a readable file.
    fn start_multipart_upload(
        &self,
        resource_path: &Path,
        destination: &Url,
        delegate: UploadDelegate,
    ) -> UploadResult<UploadHandle>;
}

/// Liveness flag shared by all delegates of one screen instance
#[derive(Debug, Clone)]
pub struct CallbackRegistration {
    live: Arc<AtomicBool>,
}

impl CallbackRegistration {
    pub fn new() -> Self {
        CallbackRegistration {
            live: Arc::new(AtomicBool::new(true)),
        }
    }

    pub fn is_live(&self) -> bool {
        self.live.load(Ordering::SeqCst)
    }

    /// Stops every delegate holding this registration from sending anything
    pub fn invalidate(&self) {
        self.live.store(false, Ordering::SeqCst);
    }
}

impl Default for CallbackRegistration {
    fn default() -> Self {
        Self::new()
    }
}

/// Cloneable progress side of a delegate, for use inside body streams
#[derive(Debug, Clone)]
pub struct ProgressReporter {
    attempt: AttemptId,
    events_tx: UnboundedSender<UploadEvent>,
    registration: CallbackRegistration,
}

impl ProgressReporter {
    pub fn report(&self, sent: u64, total: Option<u64>) {
        if !self.registration.is_live() {
            return;
        }
        let _ = self.events_tx.send(UploadEvent {
            attempt: self.attempt,
            kind: UploadEventKind::Progress { sent, total },
        });
    }
}

/// Receives the lifecycle callbacks of one upload attempt.
///
/// `succeeded` and `failed` consume the delegate, so at most one terminal
/// callback can be issued. Dropping a delegate without either reports a failure.
#[derive(Debug)]
pub struct UploadDelegate {
    reporter: ProgressReporter,
    finished: bool,
}

impl UploadDelegate {
    pub fn new(
        attempt: AttemptId,
        events_tx: UnboundedSender<UploadEvent>,
        registration: CallbackRegistration,
    ) -> Self {
        UploadDelegate {
            reporter: ProgressReporter {
                attempt,
                events_tx,
                registration,
            },
            finished: false,
        }
    }

    pub fn attempt(&self) -> AttemptId {
        self.reporter.attempt
    }

    pub fn is_live(&self) -> bool {
        self.reporter.registration.is_live()
    }

    pub fn progress(&self, sent: u64, total: Option<u64>) {
        self.reporter.report(sent, total)
    }

    pub fn progress_reporter(&self) -> ProgressReporter {
        self.reporter.clone()
    }

    pub fn succeeded(mut self, response: UploadResponse) {
        self.finish(UploadEventKind::Succeeded(response));
    }

    pub fn failed(mut self, error: UploadError) {
        self.finish(UploadEventKind::Failed(error));
    }

    /// Retires the delegate without any callback, for failures reported synchronously
    pub fn dismiss(mut self) {
        self.finished = true;
    }

    fn finish(&mut self, kind: UploadEventKind) {
        self.finished = true;
        if !self.reporter.registration.is_live() {
            tracing::debug!("dropping {:?} for invalidated {}", kind, self.reporter.attempt);
            return;
        }
        let _ = self.reporter.events_tx.send(UploadEvent {
            attempt: self.reporter.attempt,
            kind,
        });
    }
}

impl Drop for UploadDelegate {
    fn drop(&mut self) {
        if !self.finished {
            tracing::warn!("{} ended without a terminal callback", self.reporter.attempt);
            self.finish(UploadEventKind::Failed(UploadError::failed(
                "upload ended without a result",
            )));
        }
    }
}

/// Handle to a started upload. Uploads cannot be cancelled through it.
#[derive(Debug)]
pub struct UploadHandle {
    attempt: AttemptId,
    task: Option<AbortHandle>,
}

impl UploadHandle {
    pub fn new(attempt: AttemptId, task: AbortHandle) -> Self {
        UploadHandle {
            attempt,
            task: Some(task),
        }
    }

    /// A handle not backed by a tokio task
    pub fn detached(attempt: AttemptId) -> Self {
        UploadHandle {
            attempt,
            task: None,
        }
    }

    pub fn attempt(&self) -> AttemptId {
        self.attempt
    }

    pub fn is_finished(&self) -> bool {
        self.task.as_ref().map(|t| t.is_finished()).unwrap_or(true)
    }
}
