//! Client configuration
//!
//! Without timeouts a silent peer blocks the caller forever. `ClientConfig`
//! bounds both the connect and every read or write on the open connection
//! by default; either can be switched off with `None`.

use crate::http::{session::DEFAULT_CHUNK_SIZE, USER_AGENT};
use std::time::Duration;

/// Default bound on establishing the TCP connection
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Default bound on each socket read or write once connected
///
/// Sending the request and receiving every chunk of the response each wait
/// at most this long.
pub const DEFAULT_READ_TIMEOUT: Duration = Duration::from_secs(30);

/// Settings shared by every request a client makes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub connect_timeout: Option<Duration>,
    /// Applies to every read and write on the connection, not only reads
    pub read_timeout: Option<Duration>,
    pub user_agent: String,
    /// Upper bound on a single socket read
    pub chunk_size: usize,
}

impl ClientConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_connect_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.connect_timeout = timeout;
        self
    }

    pub fn with_read_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.read_timeout = timeout;
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size.max(1);
        self
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        ClientConfig {
            connect_timeout: Some(DEFAULT_CONNECT_TIMEOUT),
            read_timeout: Some(DEFAULT_READ_TIMEOUT),
            user_agent: USER_AGENT.to_string(),
            chunk_size: DEFAULT_CHUNK_SIZE,
        }
    }
}
