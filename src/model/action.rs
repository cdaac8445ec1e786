//! This module provides list of all possible actions which can be executed on the UI
use crate::model::state::ActivePage;

/// List of all possible actions a user can execute
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    Navigate {
        page: ActivePage,
    },
    TriggerUpload,
    Exit,
}
