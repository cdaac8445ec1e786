//! End-to-end scenarios of the upload screen driven through the controller
//!
//! The request client is mocked; tests play its part by calling the delegate
//! the controller handed over and feeding the resulting events back.
//!
//! Run with: cargo test --test upload_scenarios

use mockall::mock;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tokio::sync::mpsc::UnboundedReceiver;
use uploadtui::model::error::{UploadError, UploadResult};
use uploadtui::model::upload_event::{UploadEvent, UploadResponse};
use uploadtui::services::request_client::{RequestClient, UploadDelegate, UploadHandle};
use uploadtui::services::upload_controller::UploadController;
use url::Url;

mock! {
    pub Client {}

    impl RequestClient for Client {
        fn start_multipart_upload(
            &self,
            resource_path: &Path,
            destination: &Url,
            delegate: UploadDelegate,
        ) -> UploadResult<UploadHandle>;
    }
}

type Delegates = Arc<Mutex<Vec<UploadDelegate>>>;

/// Mock accepting `times` uploads and keeping their delegates
fn accepting_client(times: usize) -> (MockClient, Delegates) {
    let delegates: Delegates = Arc::new(Mutex::new(Vec::new()));
    let stash = delegates.clone();
    let mut client = MockClient::new();
    client
        .expect_start_multipart_upload()
        .times(times)
        .returning(move |_, _, delegate| {
            let attempt = delegate.attempt();
            stash.lock().unwrap().push(delegate);
            Ok(UploadHandle::detached(attempt))
        });
    (client, delegates)
}

fn controller(client: MockClient) -> (UploadController, UnboundedReceiver<UploadEvent>) {
    UploadController::new(
        Arc::new(client),
        PathBuf::from("assets/upload.png"),
        Url::parse("http://localhost:4567/upload").unwrap(),
    )
}

fn take_delegate(delegates: &Delegates) -> UploadDelegate {
    delegates.lock().unwrap().pop().expect("an upload should have been started")
}

/// Feeds every queued callback to the controller, as the state store loop does
fn drain(controller: &mut UploadController, rx: &mut UnboundedReceiver<UploadEvent>) {
    while let Ok(event) = rx.try_recv() {
        controller.handle_event(event);
    }
}

#[test]
fn scenario_a_progress_updates_the_bar() {
    let (client, delegates) = accepting_client(1);
    let (mut controller, mut rx) = controller(client);

    assert!(controller.trigger());
    let delegate = take_delegate(&delegates);
    delegate.progress(50, Some(100));
    drain(&mut controller, &mut rx);

    assert_eq!(controller.screen().progress(), 0.5);
    assert!(!controller.screen().button_enabled());
    assert!(controller.screen().indicators_visible());
    controller.tear_down();
}

#[test]
fn scenario_b_success_restores_the_button() {
    let (client, delegates) = accepting_client(1);
    let (mut controller, mut rx) = controller(client);

    controller.trigger();
    take_delegate(&delegates).succeeded(UploadResponse {
        status: 201,
        body: "stored".into(),
    });
    drain(&mut controller, &mut rx);

    assert_eq!(controller.screen().status_text(), "Succeeded");
    assert!(controller.screen().button_enabled());
    assert!(!controller.screen().indicators_visible());
}

#[test]
fn scenario_c_failure_shows_the_reason() {
    let (client, delegates) = accepting_client(1);
    let (mut controller, mut rx) = controller(client);

    controller.trigger();
    take_delegate(&delegates).failed(UploadError::failed("timeout"));
    drain(&mut controller, &mut rx);

    assert_eq!(controller.screen().status_text(), "Failed: timeout");
    assert!(controller.screen().button_enabled());
}

#[test]
fn scenario_d_second_trigger_is_ignored() {
    let (client, delegates) = accepting_client(1);
    let (mut controller, mut rx) = controller(client);

    assert!(controller.trigger());
    let before = controller.screen().clone();
    assert!(!controller.trigger());
    assert_eq!(controller.screen(), &before);
    assert_eq!(delegates.lock().unwrap().len(), 1);

    take_delegate(&delegates).succeeded(UploadResponse::default());
    drain(&mut controller, &mut rx);
}

#[test]
fn scenario_e_late_callback_after_teardown_is_dropped() {
    let (client, delegates) = accepting_client(1);
    let (mut controller, mut rx) = controller(client);

    controller.trigger();
    let delegate = take_delegate(&delegates);
    delegate.progress(20, Some(100));
    drain(&mut controller, &mut rx);

    controller.tear_down();
    let before = controller.screen().clone();
    delegate.progress(70, Some(100));
    delegate.succeeded(UploadResponse::default());
    drain(&mut controller, &mut rx);

    assert_eq!(controller.screen(), &before);
    assert_eq!(controller.screen().progress(), 0.2);
}

#[test]
fn retrigger_after_failure_starts_a_new_attempt() {
    let (client, delegates) = accepting_client(2);
    let (mut controller, mut rx) = controller(client);

    controller.trigger();
    let first = take_delegate(&delegates);
    let first_attempt = first.attempt();
    first.progress(90, Some(100));
    first.failed(UploadError::failed("connection reset"));
    drain(&mut controller, &mut rx);

    assert!(controller.trigger());
    assert_eq!(controller.screen().progress(), 0.0);
    let second = take_delegate(&delegates);
    assert_ne!(second.attempt(), first_attempt);
    second.succeeded(UploadResponse::default());
    drain(&mut controller, &mut rx);
    assert_eq!(controller.screen().status_text(), "Succeeded");
}

#[test]
fn missing_resource_fails_without_starting() {
    let mut client = MockClient::new();
    client
        .expect_start_multipart_upload()
        .times(1)
        .returning(|path, _, delegate| {
            delegate.dismiss();
            Err(UploadError::ResourceMissing(path.display().to_string()))
        });
    let (mut controller, mut rx) = controller(client);

    assert!(controller.trigger());
    assert!(rx.try_recv().is_err());
    assert_eq!(
        controller.screen().status_text(),
        "Failed: resource not found: assets/upload.png"
    );
    assert!(controller.screen().button_enabled());
}
