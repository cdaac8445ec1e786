//! # Upload TUI Library
//!
//! This library provides the core functionality of the upload demo screen:
//! the upload state machine, the request client contract with its HTTP
//! implementation, and the settings that drive them.
//!
//! The library is primarily used by the uploadtui binary, but can also be used
//! for integration testing against any multipart-accepting HTTP endpoint.

#![forbid(unsafe_code)]

pub mod model;
pub mod services;
pub mod settings;
pub mod utils;
