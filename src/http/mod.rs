//! HTTP/1.1 client over plain TCP
//!
//! This module provides the request framing, connection handling and
//! response parsing used by [`HttpClient`].
//!
//! # Architecture
//!
//! Every request runs through the same sequence, with no state shared
//! between requests:
//!
//! - `Target` splits the URL into host, port, path and query
//! - `HttpRequest` renders the exact request bytes
//! - `HttpSession` writes them, half-closes, and reads until the peer closes
//! - `parser` splits the raw bytes into status, header block and body
//!
//! The transport sits behind the `SessionOps` trait, so the exchange can run
//! against an in-memory connection as well as a `TcpStream`.
//!
//! # Examples
//!
//! ```no_run
//! use httpclient::http::{HttpClient, Params};
//!
//! let client = HttpClient::new();
//!
//! let response = client.get("http://127.0.0.1:8080/status", None).unwrap();
//! assert_eq!(response.status().code(), 200);
//!
//! let args = Params::from([("hello", "world")]);
//! let response = client.post("http://127.0.0.1:8080/echo", Some(&args)).unwrap();
//! println!("{}", response);
//! ```

pub mod client;
pub mod encoding;
pub mod headers;
pub mod message;
pub mod parser;
pub mod session;
pub mod target;

pub use client::HttpClient;
pub use encoding::Params;
pub use headers::Headers;
pub use message::{Body, HttpRequest, HttpResponse, Method, Status};
pub use session::{FdSessionOps, HttpSession, SessionOps};
pub use target::Target;

/// Result type for HTTP operations
pub type Result<T> = std::result::Result<T, Error>;

/// HTTP operation errors
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Connection error: {0}")]
    Connection(#[from] std::io::Error),

    #[error("Connection closed by peer")]
    ConnectionClosed,

    #[error("Timeout")]
    Timeout,

    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    #[error("Encoding error: {0}")]
    Encoding(String),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Invalid HTTP method: {0}")]
    InvalidMethod(String),
}

impl Error {
    /// Host unreachable, refused, timed out, or a socket failure mid-exchange
    pub fn is_connection_error(&self) -> bool {
        matches!(
            self,
            Error::Connection(_) | Error::ConnectionClosed | Error::Timeout
        )
    }

    /// The peer answered, but not with something shaped like HTTP/1.1
    pub fn is_malformed(&self) -> bool {
        matches!(self, Error::MalformedResponse(_))
    }

    pub fn is_encoding_error(&self) -> bool {
        matches!(self, Error::Encoding(_))
    }
}

/// Default HTTP port
pub const DEFAULT_HTTP_PORT: u16 = 80;

/// CRLF line ending
pub const CRLF: &str = "\r\n";

/// Blank line separating the header block from the body
pub const HEADER_BOUNDARY: &[u8] = b"\r\n\r\n";

/// Protocol version written on every request line
pub const HTTP_VERSION: &str = "HTTP/1.1";

/// Client identifier sent in the `User-Agent` field
pub const USER_AGENT: &str = concat!("httpclient/", env!("CARGO_PKG_VERSION"));
