//! HTTP client implementation
//!
//! `HttpClient` holds nothing but its configuration. Each call opens its own
//! connection, uses it for one exchange and closes it, so a single client can
//! be shared freely between threads.

use super::{
    encoding, parser, session, HttpRequest, HttpResponse, HttpSession, Method, Params, Result,
    SessionOps, Target,
};
use crate::config::ClientConfig;
use log::{debug, warn};

const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// HTTP client
#[derive(Debug, Clone, Default)]
pub struct HttpClient {
    config: ClientConfig,
}

impl HttpClient {
    /// Create a client with the default configuration
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: ClientConfig) -> Self {
        HttpClient { config }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Send a GET request; `args` are merged into the URL's query string
    pub fn get(&self, url: &str, args: Option<&Params>) -> Result<HttpResponse> {
        self.command(url, Method::Get, args)
    }

    /// Send a POST request; `args` become a form-urlencoded body
    pub fn post(&self, url: &str, args: Option<&Params>) -> Result<HttpResponse> {
        self.command(url, Method::Post, args)
    }

    /// Send a request with the given method
    pub fn command(&self, url: &str, method: Method, args: Option<&Params>) -> Result<HttpResponse> {
        let target = Target::parse(url)?;
        let request = self.build_request(method, &target, args);

        let session = session::connect(target.host(), target.port(), self.config.connect_timeout)?;
        self.execute(session, &request)
    }

    /// Build the request for a target without touching the network
    pub fn build_request(&self, method: Method, target: &Target, args: Option<&Params>) -> HttpRequest {
        let builder = HttpRequest::builder()
            .method(method)
            .path(target.path())
            .host(target.authority())
            .user_agent(self.config.user_agent.as_str());

        match method {
            Method::Get => {
                let builder = match encoding::build_query(target.query(), args) {
                    Some(query) => builder.query(query),
                    None => builder,
                };
                builder.build()
            }
            Method::Post => {
                let body = args.map(encoding::encode_form).unwrap_or_default();
                let builder = match target.query() {
                    Some(query) => builder.query(query),
                    None => builder,
                };
                builder
                    .header("Content-Type", FORM_CONTENT_TYPE)
                    .header("Content-Length", body.len().to_string())
                    .body(body)
                    .build()
            }
        }
    }

    /// Run one exchange over an already-open session
    ///
    /// The request is sent, the write side half-closed, and the response
    /// read until the peer closes. The session is closed afterwards whether
    /// or not the exchange succeeded.
    pub fn execute<S: SessionOps>(&self, session: S, request: &HttpRequest) -> Result<HttpResponse> {
        let mut session = HttpSession::new(session);
        session.set_timeout(self.config.read_timeout);

        let wire = request.to_wire();
        debug!(
            "sending request ({} bytes):\n{}",
            wire.len(),
            String::from_utf8_lossy(&wire)
        );

        let exchanged = Self::exchange(&mut session, &wire, self.config.chunk_size);
        if let Err(e) = session.close() {
            warn!("failed to close connection to {}: {}", request.host(), e);
        }

        let raw = exchanged?;
        let response = parser::parse_response(&raw)?;
        debug!("{} {} -> {}", request.method(), request.target(), response.status());

        Ok(response)
    }

    fn exchange<S: SessionOps>(
        session: &mut HttpSession<S>,
        wire: &[u8],
        chunk_size: usize,
    ) -> Result<bytes::Bytes> {
        session.send(wire)?;
        session.finish_sending()?;
        session.receive_all(chunk_size)
    }
}
