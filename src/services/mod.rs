//! This module provides the upload machinery behind the upload screen: the request client
//! contract, its HTTP implementation, the controller binding it to the screen and the
//! loader describing the local resource

pub mod http_request_client;
pub mod request_client;
pub mod resource_loader;
pub mod upload_controller;
