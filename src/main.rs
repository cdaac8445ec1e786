#![forbid(unsafe_code)]
mod cli;
mod components;
mod state_store;
mod termination;
mod ui_manager;

use std::sync::Arc;

use clap::Parser;
use color_eyre::eyre;
use cli::Cli;
use uploadtui::services::http_request_client::HttpRequestClient;
use uploadtui::services::upload_controller::UploadController;
use uploadtui::settings::upload_settings::load_settings;
use uploadtui::utils::{initialize_logging, initialize_panic_handler};

use crate::state_store::StateStore;
use crate::termination::{create_termination, Interrupted};
use crate::ui_manager::UiManager;

#[tokio::main]
async fn main() -> eyre::Result<()> {
    initialize_logging()?;
    initialize_panic_handler()?;
    let args = Cli::parse();

    let settings = load_settings(args.config)?.with_overrides(args.resource, args.destination);
    let destination = settings.destination()?;
    let client = HttpRequestClient::new(&settings)?;
    let (controller, upload_rx) = UploadController::new(Arc::new(client), settings.resource_path.clone(), destination);

    let (terminator, mut interrupt_rx) = create_termination();
    let (state_store, state_rx) = StateStore::new();
    let (ui_manager, action_rx) = UiManager::new();

    tokio::try_join!(
        state_store.main_loop(terminator, controller, upload_rx, action_rx, interrupt_rx.resubscribe()),
        ui_manager.main_loop(state_rx, interrupt_rx.resubscribe()),
    )?;

    if let Ok(reason) = interrupt_rx.recv().await {
        match reason {
            Interrupted::UserInt => tracing::info!("exited per user request"),
            Interrupted::OsSigInt => tracing::info!("exited because of an os sig int"),
        }
    } else {
        tracing::error!("exited because of an unexpected error");
    }

    Ok(())
}
