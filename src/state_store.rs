use std::path::PathBuf;
use color_eyre::eyre;
use tokio::sync::broadcast;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use uploadtui::model::action::Action;
use uploadtui::model::resource_preview::ResourcePreview;
use uploadtui::model::state::{ActivePage, State};
use uploadtui::model::upload_event::UploadEvent;
use uploadtui::services::resource_loader::ResourceLoader;
use uploadtui::services::upload_controller::UploadController;
use crate::termination::{Interrupted, Terminator};

/// Single owner of the application state. Every user action and every upload
/// callback is applied here, one at a time, and the resulting state is pushed to the UI.
pub struct StateStore {
    state_tx: UnboundedSender<State>,
}

impl StateStore {
    pub fn new() -> (Self, UnboundedReceiver<State>) {
        let (state_tx, state_rx) = mpsc::unbounded_channel::<State>();

        (StateStore { state_tx }, state_rx)
    }
}

impl StateStore {
    async fn fetch_resource(&self, path: PathBuf, resource_tx: UnboundedSender<Result<ResourcePreview, String>>) {
        tokio::spawn(async move {
            let result = ResourceLoader::new().load(&path).await.map_err(|e| {
                tracing::error!("Failed to read resource {}: {}", path.display(), e);
                format!("{}: {}", path.display(), e)
            });
            let _ = resource_tx.send(result);
        });
    }

    fn navigate(&self, state: &mut State, controller: &mut UploadController, page: ActivePage) {
        if state.active_page == page {
            return;
        }
        if page == ActivePage::Help && controller.screen().is_uploading() {
            tracing::info!("help is unavailable while an upload is running");
            return;
        }
        match page {
            ActivePage::Help => controller.tear_down(),
            ActivePage::Upload => controller.reenter(),
        }
        state.set_active_page(page);
        state.update_upload(controller.screen());
    }

    pub async fn main_loop(
        self,
        mut terminator: Terminator,
        mut controller: UploadController,
        mut upload_rx: UnboundedReceiver<UploadEvent>,
        mut action_rx: UnboundedReceiver<Action>,
        mut interrupt_rx: broadcast::Receiver<Interrupted>,
    ) -> eyre::Result<Interrupted> {
        let mut state = State::new(controller.destination().as_str());
        state.update_upload(controller.screen());

        let (resource_tx, mut resource_rx) = mpsc::unbounded_channel::<Result<ResourcePreview, String>>();
        self.fetch_resource(controller.resource_path().to_path_buf(), resource_tx).await;

        // the initial state once
        self.state_tx.send(state.clone())?;

        let result = loop {
            tokio::select! {
                Some(resource) = resource_rx.recv() => {
                    state.update_resource(resource);
                    self.state_tx.send(state.clone())?;
                },
                Some(event) = upload_rx.recv() => {
                    if controller.handle_event(event) {
                        state.update_upload(controller.screen());
                        self.state_tx.send(state.clone())?;
                    }
                },
                Some(action) = action_rx.recv() => match action {
                    Action::TriggerUpload => {
                        if controller.trigger() {
                            state.update_upload(controller.screen());
                            self.state_tx.send(state.clone())?;
                        }
                    },
                    Action::Navigate { page } => {
                        self.navigate(&mut state, &mut controller, page);
                        self.state_tx.send(state.clone())?;
                    },
                    Action::Exit => {
                        let _ = terminator.terminate(Interrupted::UserInt);

                        break Interrupted::UserInt;
                    },
                },
                // Catch and handle interrupt signal to gracefully shutdown
                Ok(interrupted) = interrupt_rx.recv() => {
                    break interrupted;
                }
            }
        };

        if controller.has_running_task() {
            tracing::info!("leaving with an upload still running, its result will be discarded");
        }
        controller.tear_down();

        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;
    use std::sync::{Arc, Mutex};
    use uploadtui::model::error::{UploadError, UploadResult};
    use uploadtui::model::upload_event::UploadResponse;
    use uploadtui::services::request_client::{RequestClient, UploadDelegate, UploadHandle};
    use url::Url;

    struct RefusingClient;

    impl RequestClient for RefusingClient {
        fn start_multipart_upload(
            &self,
            resource_path: &Path,
            _destination: &Url,
            delegate: UploadDelegate,
        ) -> UploadResult<UploadHandle> {
            delegate.dismiss();
            Err(UploadError::ResourceMissing(resource_path.display().to_string()))
        }
    }

    #[derive(Default)]
    struct AcceptingClient {
        delegates: Mutex<Vec<UploadDelegate>>,
    }

    impl RequestClient for AcceptingClient {
        fn start_multipart_upload(
            &self,
            _resource_path: &Path,
            _destination: &Url,
            delegate: UploadDelegate,
        ) -> UploadResult<UploadHandle> {
            let attempt = delegate.attempt();
            self.delegates.lock().unwrap().push(delegate);
            Ok(UploadHandle::detached(attempt))
        }
    }

    fn controller() -> UploadController {
        let (controller, _rx) = UploadController::new(
            Arc::new(RefusingClient),
            PathBuf::from("missing.png"),
            Url::parse("http://localhost:4567/upload").unwrap(),
        );
        controller
    }

    #[tokio::test]
    async fn test_state_store_new() {
        let (_store, mut state_rx) = StateStore::new();
        assert!(state_rx.try_recv().is_err(), "Should start with no pending states");
    }

    #[tokio::test]
    async fn test_navigating_back_reenters_screen() {
        let (store, _state_rx) = StateStore::new();
        let mut controller = controller();
        let mut state = State::default();

        controller.trigger();
        state.update_upload(controller.screen());
        assert_eq!(state.upload.status_text(), "Failed: resource not found: missing.png");

        store.navigate(&mut state, &mut controller, ActivePage::Help);
        assert_eq!(state.active_page, ActivePage::Help);
        assert!(state.upload.is_torn_down());

        store.navigate(&mut state, &mut controller, ActivePage::Upload);
        assert_eq!(state.active_page, ActivePage::Upload);
        assert_eq!(state.upload.status_text(), "Idle");
        assert_eq!(state.upload.instance(), 2);
    }

    #[tokio::test]
    async fn test_help_is_refused_while_uploading() {
        let (store, _state_rx) = StateStore::new();
        let client = Arc::new(AcceptingClient::default());
        let (mut controller, mut upload_rx) = UploadController::new(
            client.clone(),
            PathBuf::from("assets/upload.png"),
            Url::parse("http://localhost:4567/upload").unwrap(),
        );
        let mut state = State::default();

        assert!(controller.trigger());
        state.update_upload(controller.screen());
        store.navigate(&mut state, &mut controller, ActivePage::Help);
        store.navigate(&mut state, &mut controller, ActivePage::Upload);

        assert_eq!(state.active_page, ActivePage::Upload);
        assert!(!state.upload.is_torn_down());
        assert!(!controller.trigger(), "A second upload must not start");
        assert_eq!(client.delegates.lock().unwrap().len(), 1);

        let delegate = client.delegates.lock().unwrap().pop().unwrap();
        delegate.succeeded(UploadResponse { status: 201, body: String::new() });
        let event = upload_rx.try_recv().unwrap();
        assert!(controller.handle_event(event), "The running upload still reports");
        assert_eq!(controller.screen().status_text(), "Succeeded");

        store.navigate(&mut state, &mut controller, ActivePage::Help);
        assert_eq!(state.active_page, ActivePage::Help);
    }
}
