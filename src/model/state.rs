//! This module provides functionality for keeping the application state
use crate::model::resource_preview::ResourcePreview;
use crate::model::upload_screen::UploadScreen;

#[derive(Debug, Clone, PartialEq, Default)]
pub enum ActivePage {
    #[default]
    Upload,
    Help,
}

/// Represents entire state of the application, each page transforms this information for
/// suitable Props object
#[derive(Debug, Clone, Default)]
pub struct State {
    pub active_page: ActivePage,
    pub upload: UploadScreen,
    pub resource: Option<ResourcePreview>,
    pub resource_error: Option<String>,
    pub destination: String,
}

impl State {
    pub fn new(destination: impl Into<String>) -> State {
        State {
            destination: destination.into(),
            ..State::default()
        }
    }

    pub fn set_active_page(&mut self, page: ActivePage) {
        self.active_page = page;
    }

    pub fn update_resource(&mut self, resource: Result<ResourcePreview, String>) {
        match resource {
            Ok(preview) => {
                self.resource = Some(preview);
                self.resource_error = None;
            }
            Err(e) => {
                self.resource = None;
                self.resource_error = Some(e);
            }
        }
    }

    pub fn update_upload(&mut self, screen: &UploadScreen) {
        self.upload = screen.clone();
    }
}
