//! HTTP message types
//!
//! This module defines the request the client writes and the response it
//! hands back to the caller.

use super::{headers, Error, Headers, Result, CRLF, HTTP_VERSION, USER_AGENT};
use std::fmt;
use std::str::FromStr;

/// HTTP methods supported by the client
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Method {
    #[default]
    Get,
    Post,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
        }
    }
}

impl FromStr for Method {
    type Err = Error;

    /// Method names are matched case-insensitively
    fn from_str(s: &str) -> Result<Self> {
        if s.eq_ignore_ascii_case("GET") {
            Ok(Method::Get)
        } else if s.eq_ignore_ascii_case("POST") {
            Ok(Method::Post)
        } else {
            Err(Error::InvalidMethod(s.to_string()))
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// HTTP status code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Status {
    code: u16,
}

impl Status {
    /// Create a status code, rejecting values outside 100..=599
    pub fn new(code: u16) -> Result<Self> {
        if (100..600).contains(&code) {
            Ok(Status { code })
        } else {
            Err(Error::MalformedResponse(format!(
                "Status code out of range: {}",
                code
            )))
        }
    }

    pub fn code(&self) -> u16 {
        self.code
    }

    /// Canonical reason phrase, or "Unknown"
    pub fn reason_phrase(&self) -> &'static str {
        match self.code {
            100 => "Continue",
            200 => "OK",
            201 => "Created",
            202 => "Accepted",
            204 => "No Content",
            301 => "Moved Permanently",
            302 => "Found",
            303 => "See Other",
            304 => "Not Modified",
            307 => "Temporary Redirect",
            308 => "Permanent Redirect",
            400 => "Bad Request",
            401 => "Unauthorized",
            403 => "Forbidden",
            404 => "Not Found",
            405 => "Method Not Allowed",
            408 => "Request Timeout",
            411 => "Length Required",
            413 => "Payload Too Large",
            415 => "Unsupported Media Type",
            500 => "Internal Server Error",
            501 => "Not Implemented",
            502 => "Bad Gateway",
            503 => "Service Unavailable",
            504 => "Gateway Timeout",
            505 => "HTTP Version Not Supported",
            _ => "Unknown",
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.code)
    }

    pub fn is_client_error(&self) -> bool {
        (400..500).contains(&self.code)
    }

    pub const OK: Status = Status { code: 200 };
    pub const NOT_FOUND: Status = Status { code: 404 };
    pub const INTERNAL_SERVER_ERROR: Status = Status { code: 500 };
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.code, self.reason_phrase())
    }
}

/// HTTP request
///
/// `Host`, `User-Agent`, `Accept` and `Connection` are fixed fields written
/// by `to_wire`; `headers` holds only the caller-supplied extras.
#[derive(Debug, Clone)]
pub struct HttpRequest {
    method: Method,
    target: String,
    host: String,
    user_agent: String,
    headers: Headers,
    body: Vec<u8>,
}

impl HttpRequest {
    /// Create a builder for constructing requests
    pub fn builder() -> HttpRequestBuilder {
        HttpRequestBuilder::default()
    }

    pub fn method(&self) -> Method {
        self.method
    }

    /// Path plus `?query` when one was supplied
    pub fn target(&self) -> &str {
        &self.target
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn headers(&self) -> &Headers {
        &self.headers
    }

    pub fn body(&self) -> &[u8] {
        &self.body
    }

    /// Render the request exactly as it goes on the wire
    pub fn to_wire(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(128 + self.body.len());

        // Request line
        buf.extend_from_slice(self.method.as_str().as_bytes());
        buf.push(b' ');
        buf.extend_from_slice(self.target.as_bytes());
        buf.push(b' ');
        buf.extend_from_slice(HTTP_VERSION.as_bytes());
        buf.extend_from_slice(CRLF.as_bytes());

        let fixed = [
            ("Host", self.host.as_str()),
            ("User-Agent", self.user_agent.as_str()),
            ("Accept", "*/*"),
            ("Connection", "close"),
        ];
        for (name, value) in fixed {
            buf.extend_from_slice(name.as_bytes());
            buf.extend_from_slice(b": ");
            buf.extend_from_slice(value.as_bytes());
            buf.extend_from_slice(CRLF.as_bytes());
        }

        // Caller-supplied fields, one CRLF-terminated line each
        buf.extend_from_slice(self.headers.to_string().as_bytes());

        // Empty line
        buf.extend_from_slice(CRLF.as_bytes());

        if !self.body.is_empty() {
            buf.extend_from_slice(&self.body);
            buf.extend_from_slice(CRLF.as_bytes());
        }

        buf
    }
}

/// Builder for HTTP requests
#[derive(Debug, Default)]
pub struct HttpRequestBuilder {
    method: Method,
    path: String,
    query: Option<String>,
    host: String,
    user_agent: Option<String>,
    headers: Headers,
    body: Vec<u8>,
}

impl HttpRequestBuilder {
    pub fn method(mut self, method: Method) -> Self {
        self.method = method;
        self
    }

    /// Set the path; an empty path becomes "/"
    pub fn path(mut self, path: impl Into<String>) -> Self {
        self.path = path.into();
        self
    }

    /// Set an already-encoded query string, appended as `?query`
    pub fn query(mut self, query: impl Into<String>) -> Self {
        self.query = Some(query.into());
        self
    }

    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.host = host.into();
        self
    }

    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Add a header field, written after the fixed fields in call order
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name, value);
        self
    }

    pub fn body(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.body = body.into();
        self
    }

    /// Build the request
    ///
    /// A non-empty body always carries a `Content-Length` equal to its byte
    /// length; a caller-supplied value is corrected in place.
    pub fn build(self) -> HttpRequest {
        let mut target = if self.path.is_empty() {
            "/".to_string()
        } else {
            self.path
        };
        if let Some(query) = self.query.filter(|q| !q.is_empty()) {
            target.push('?');
            target.push_str(&query);
        }

        let mut headers = self.headers;
        if !self.body.is_empty() {
            headers.set("Content-Length", self.body.len().to_string());
        }

        HttpRequest {
            method: self.method,
            target,
            host: self.host,
            user_agent: self.user_agent.unwrap_or_else(|| USER_AGENT.to_string()),
            headers,
            body: self.body,
        }
    }
}

/// Decoded response body
#[derive(Debug, Clone, PartialEq)]
pub enum Body {
    Text(String),
    /// Body of a response whose content type declares JSON
    Json(serde_json::Value),
}

impl Body {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Body::Text(text) => Some(text),
            Body::Json(_) => None,
        }
    }

    pub fn as_json(&self) -> Option<&serde_json::Value> {
        match self {
            Body::Json(value) => Some(value),
            Body::Text(_) => None,
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Body::Text(text) if text.is_empty())
    }
}

impl Default for Body {
    fn default() -> Self {
        Body::Text(String::new())
    }
}

impl fmt::Display for Body {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Body::Text(text) => f.write_str(text),
            Body::Json(value) => write!(f, "{}", value),
        }
    }
}

/// HTTP response
///
/// `headers` is the raw header block, status line included, exactly as it
/// preceded the blank line on the wire.
#[derive(Debug, Clone, PartialEq)]
pub struct HttpResponse {
    status: Status,
    headers: String,
    body: Body,
}

impl HttpResponse {
    pub fn new(status: Status, headers: impl Into<String>, body: Body) -> Self {
        HttpResponse {
            status,
            headers: headers.into(),
            body,
        }
    }

    pub fn status(&self) -> Status {
        self.status
    }

    /// Raw header block
    pub fn headers(&self) -> &str {
        &self.headers
    }

    /// First value of a header field (case-insensitive)
    pub fn header(&self, name: &str) -> Option<&str> {
        headers::fields(&self.headers)
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v)
    }

    pub fn body(&self) -> &Body {
        &self.body
    }
}

/// Status 500 with an empty body; stands in for a response that could not
/// be obtained.
impl Default for HttpResponse {
    fn default() -> Self {
        HttpResponse {
            status: Status::INTERNAL_SERVER_ERROR,
            headers: String::new(),
            body: Body::default(),
        }
    }
}

impl fmt::Display for HttpResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Response code: {}\nResponse body:\n{}",
            self.status.code(),
            self.body
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wire_string(req: &HttpRequest) -> String {
        String::from_utf8(req.to_wire()).unwrap()
    }

    #[test]
    fn test_method_from_str() {
        assert_eq!("GET".parse::<Method>().unwrap(), Method::Get);
        assert_eq!("post".parse::<Method>().unwrap(), Method::Post);
        assert!(matches!(
            "DELETE".parse::<Method>(),
            Err(Error::InvalidMethod(m)) if m == "DELETE"
        ));
    }

    #[test]
    fn test_status() {
        let status = Status::new(200).unwrap();
        assert_eq!(status.code(), 200);
        assert_eq!(status.reason_phrase(), "OK");
        assert!(status.is_success());
        assert!(!status.is_client_error());
        assert_eq!(Status::new(418).unwrap().reason_phrase(), "Unknown");

        assert!(Status::new(99).is_err());
        assert!(Status::new(600).is_err());
    }

    #[test]
    fn test_request_to_wire_exact() {
        let req = HttpRequest::builder()
            .method(Method::Get)
            .path("/index.html")
            .host("example.com")
            .build();

        let expected = format!(
            "GET /index.html HTTP/1.1\r\n\
             Host: example.com\r\n\
             User-Agent: {}\r\n\
             Accept: */*\r\n\
             Connection: close\r\n\
             \r\n",
            USER_AGENT
        );
        assert_eq!(wire_string(&req), expected);
    }

    #[test]
    fn test_empty_path_defaults_to_root() {
        let req = HttpRequest::builder().host("example.com").build();
        assert_eq!(req.target(), "/");
        assert!(wire_string(&req).starts_with("GET / HTTP/1.1\r\n"));
    }

    #[test]
    fn test_query_appended_to_path() {
        let req = HttpRequest::builder()
            .path("/search")
            .query("q=rust+lang&page=2")
            .host("example.com")
            .build();
        assert!(wire_string(&req).starts_with("GET /search?q=rust+lang&page=2 HTTP/1.1\r\n"));

        let req = HttpRequest::builder().path("/a").query("").build();
        assert_eq!(req.target(), "/a");
    }

    #[test]
    fn test_extra_headers_follow_fixed_fields_in_order() {
        let req = HttpRequest::builder()
            .method(Method::Post)
            .host("h")
            .user_agent("test-agent/1")
            .header("X-Second", "2")
            .header("X-First", "1")
            .build();

        let wire = wire_string(&req);
        let lines: Vec<_> = wire.split("\r\n").collect();
        assert_eq!(
            &lines[..8],
            &[
                "POST / HTTP/1.1",
                "Host: h",
                "User-Agent: test-agent/1",
                "Accept: */*",
                "Connection: close",
                "X-Second: 2",
                "X-First: 1",
                "",
            ]
        );
    }

    #[test]
    fn test_body_gets_byte_length_and_trailing_crlf() {
        // 11 characters, 14 bytes
        let body = "héllö wörld";
        let req = HttpRequest::builder()
            .method(Method::Post)
            .host("h")
            .body(body)
            .build();

        assert_eq!(req.headers().get("Content-Length"), Some("14"));
        let wire = wire_string(&req);
        assert!(wire.ends_with("\r\n\r\nhéllö wörld\r\n"));
    }

    #[test]
    fn test_stale_content_length_is_corrected_in_place() {
        let req = HttpRequest::builder()
            .header("Content-Type", "text/plain")
            .header("Content-Length", "99")
            .header("X-After", "1")
            .body("abc")
            .build();

        let fields: Vec<_> = req.headers().iter().collect();
        assert_eq!(
            fields,
            vec![("Content-Type", "text/plain"), ("Content-Length", "3"), ("X-After", "1")]
        );
    }

    #[test]
    fn test_no_body_no_content_length() {
        let req = HttpRequest::builder().host("h").build();
        assert_eq!(req.headers().get("Content-Length"), None);
        assert!(wire_string(&req).ends_with("Connection: close\r\n\r\n"));
    }

    #[test]
    fn test_response_header_lookup() {
        let resp = HttpResponse::new(
            Status::OK,
            "HTTP/1.1 200 OK\r\nContent-Type: text/plain\r\nX-Trace: abc",
            Body::Text("hi".to_string()),
        );
        assert_eq!(resp.header("content-type"), Some("text/plain"));
        assert_eq!(resp.header("X-Trace"), Some("abc"));
        assert_eq!(resp.header("Missing"), None);
    }

    #[test]
    fn test_default_response_is_sentinel() {
        let resp = HttpResponse::default();
        assert_eq!(resp.status().code(), 500);
        assert!(resp.body().is_empty());
        assert_eq!(resp.to_string(), "Response code: 500\nResponse body:\n");
    }

    #[test]
    fn test_response_display() {
        let resp = HttpResponse::new(Status::NOT_FOUND, "", Body::Text("gone".into()));
        assert_eq!(resp.to_string(), "Response code: 404\nResponse body:\ngone");

        let json = HttpResponse::new(Status::OK, "", Body::Json(serde_json::json!({"a": 1})));
        assert_eq!(json.to_string(), "Response code: 200\nResponse body:\n{\"a\":1}");
    }
}
