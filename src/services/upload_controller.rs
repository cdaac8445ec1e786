//! Binds one upload screen instance to a request client
//!
//! The controller is owned by the single task that owns the application state.
//! Client callbacks arrive as [`UploadEvent`]s on the receiver returned by
//! [`UploadController::new`] and are fed back through
//! [`UploadController::handle_event`], so the screen is only ever mutated from
//! that task.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use url::Url;

use crate::model::upload_event::UploadEvent;
use crate::model::upload_screen::UploadScreen;
use crate::services::request_client::{CallbackRegistration, RequestClient, UploadDelegate, UploadHandle};

pub struct UploadController {
    client: Arc<dyn RequestClient>,
    resource_path: PathBuf,
    destination: Url,
    events_tx: UnboundedSender<UploadEvent>,
    screen: UploadScreen,
    registration: CallbackRegistration,
    instances: u64,
    in_flight: Option<UploadHandle>,
}

impl UploadController {
    pub fn new(
        client: Arc<dyn RequestClient>,
        resource_path: PathBuf,
        destination: Url,
    ) -> (Self, UnboundedReceiver<UploadEvent>) {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        let controller = UploadController {
            client,
            resource_path,
            destination,
            events_tx,
            screen: UploadScreen::new(1),
            registration: CallbackRegistration::new(),
            instances: 1,
            in_flight: None,
        };
        (controller, events_rx)
    }

    pub fn screen(&self) -> &UploadScreen {
        &self.screen
    }

    pub fn resource_path(&self) -> &Path {
        &self.resource_path
    }

    pub fn destination(&self) -> &Url {
        &self.destination
    }

    /// True while the client task of the current attempt has not finished
    pub fn has_running_task(&self) -> bool {
        self.in_flight.as_ref().is_some_and(|h| !h.is_finished())
    }

    /// Handles the upload action. Returns false when the trigger was ignored.
    pub fn trigger(&mut self) -> bool {
        let Some(attempt) = self.screen.on_upload_triggered() else {
            tracing::debug!("upload trigger ignored, screen {} is busy", self.screen.instance());
            return false;
        };

        let delegate = UploadDelegate::new(attempt, self.events_tx.clone(), self.registration.clone());
        match self
            .client
            .start_multipart_upload(&self.resource_path, &self.destination, delegate)
        {
            Ok(handle) => {
                self.in_flight = Some(handle);
            }
            Err(e) => {
                tracing::error!("could not start {}: {}", attempt, e);
                self.screen.on_failure(attempt, &e);
            }
        }
        true
    }

    /// Applies a marshaled callback. Returns false when the event was stale and dropped.
    pub fn handle_event(&mut self, event: UploadEvent) -> bool {
        let attempt = event.attempt;
        let terminal = event.is_terminal();
        let applied = self.screen.apply(event);
        if !applied {
            tracing::debug!("dropped stale event for {}", attempt);
        } else if terminal && self.in_flight.as_ref().map(|h| h.attempt()) == Some(attempt) {
            self.in_flight = None;
        }
        applied
    }

    /// Ends the current screen instance; late callbacks of its attempts are dropped
    pub fn tear_down(&mut self) {
        if self.screen.is_torn_down() {
            return;
        }
        tracing::info!("tearing down upload screen {}", self.screen.instance());
        self.registration.invalidate();
        self.screen.tear_down();
        self.in_flight = None;
    }

    /// Starts a fresh screen instance with default state
    pub fn reenter(&mut self) {
        self.tear_down();
        self.instances += 1;
        self.screen = UploadScreen::new(self.instances);
        self.registration = CallbackRegistration::new();
    }
}
