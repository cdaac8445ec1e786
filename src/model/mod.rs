//! This module provides common objects used throughout the entire application

pub mod action;
pub mod error;
pub mod resource_preview;
pub mod state;
pub mod upload_event;
pub mod upload_screen;
