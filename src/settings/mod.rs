//! Configuration of the upload destination and payload

pub mod upload_settings;
