//! Terminal pages and widgets of the application

pub mod app_router;
pub mod component;
pub mod help_page;
pub mod upload_page;
pub mod widgets;
