//! Request targets
//!
//! Splits a URL into the pieces the client needs: where to connect, what to
//! put in the `Host` field, and the path and query for the request line.

use super::{Error, Result, DEFAULT_HTTP_PORT};
use url::{Host, Url};

/// A parsed `http://` URL
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Target {
    scheme: String,
    host: String,
    authority: String,
    port: u16,
    path: String,
    query: Option<String>,
}

impl Target {
    /// Parse a URL; only the plain `http` scheme is accepted
    pub fn parse(url: &str) -> Result<Self> {
        let parsed = Url::parse(url).map_err(|e| Error::InvalidUrl(format!("{}: {}", url, e)))?;

        if parsed.scheme() != "http" {
            return Err(Error::InvalidUrl(format!(
                "Unsupported scheme: {}",
                parsed.scheme()
            )));
        }

        // IPv6 literals are bracketed in the Host field but not when connecting
        let host = match parsed.host() {
            Some(Host::Domain(domain)) => domain.to_string(),
            Some(Host::Ipv4(addr)) => addr.to_string(),
            Some(Host::Ipv6(addr)) => addr.to_string(),
            None => return Err(Error::InvalidUrl(format!("Missing host: {}", url))),
        };
        let host_str = parsed.host_str().unwrap_or(&host).to_string();

        // Url::port() is None both when absent and when equal to 80
        let port = parsed.port().unwrap_or(DEFAULT_HTTP_PORT);
        let authority = match parsed.port() {
            Some(port) => format!("{}:{}", host_str, port),
            None => host_str,
        };

        Ok(Target {
            scheme: parsed.scheme().to_string(),
            host,
            authority,
            port,
            path: parsed.path().to_string(),
            query: parsed.query().map(str::to_string),
        })
    }

    pub fn scheme(&self) -> &str {
        &self.scheme
    }

    /// Host name or address to connect to
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Value for the `Host` field: host, plus `:port` when not 80
    pub fn authority(&self) -> &str {
        &self.authority
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    /// Raw query string, without the leading `?`
    pub fn query(&self) -> Option<&str> {
        self.query.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_url() {
        let target = Target::parse("http://example.com:8080/a/b?x=1&y=two#frag").unwrap();

        assert_eq!(target.scheme(), "http");
        assert_eq!(target.host(), "example.com");
        assert_eq!(target.port(), 8080);
        assert_eq!(target.authority(), "example.com:8080");
        assert_eq!(target.path(), "/a/b");
        assert_eq!(target.query(), Some("x=1&y=two"));
    }

    #[test]
    fn test_default_port_and_path() {
        let target = Target::parse("http://example.com").unwrap();

        assert_eq!(target.port(), 80);
        assert_eq!(target.authority(), "example.com");
        assert_eq!(target.path(), "/");
        assert_eq!(target.query(), None);

        let target = Target::parse("http://example.com:80/x").unwrap();
        assert_eq!(target.port(), 80);
        assert_eq!(target.authority(), "example.com");
    }

    #[test]
    fn test_ipv6_host() {
        let target = Target::parse("http://[::1]:9000/").unwrap();

        assert_eq!(target.host(), "::1");
        assert_eq!(target.authority(), "[::1]:9000");
    }

    #[test]
    fn test_rejects_unsupported_urls() {
        assert!(matches!(
            Target::parse("https://example.com/"),
            Err(Error::InvalidUrl(_))
        ));
        assert!(matches!(Target::parse("example.com/path"), Err(Error::InvalidUrl(_))));
        assert!(matches!(Target::parse(""), Err(Error::InvalidUrl(_))));
    }
}
