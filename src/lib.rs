//! httpclient - HTTP/1.1 over raw TCP
//!
//! This crate implements GET and POST requests directly on TCP sockets:
//! request framing, a read-until-close connection loop, and response
//! parsing into status code, header block and body.

pub mod config;
pub mod http;

pub use config::ClientConfig;
pub use http::{Error, HttpClient, HttpResponse, Method, Params, Result};
