//! Command-line surface
//!
//! ```bash
//! httpclient http://127.0.0.1:8080/status
//! httpclient POST http://127.0.0.1:8080/echo -d hello=world -d lang=en
//! HTTPCLIENT_READ_TIMEOUT=0 httpclient GET http://example.com/slow
//! ```

use clap::Parser;
use httpclient::config::{DEFAULT_CONNECT_TIMEOUT, DEFAULT_READ_TIMEOUT};
use httpclient::{ClientConfig, Method, Params, Result};
use log::Level;
use std::time::Duration;

/// Send GET and POST requests over a raw TCP connection
#[derive(Debug, Clone, Parser)]
#[command(name = "httpclient")]
#[command(version)]
#[command(override_usage = "httpclient [GET/POST] [URL]")]
pub struct Cli {
    /// Request method (GET or POST), or the URL when the method is omitted
    #[arg(value_name = "METHOD")]
    pub first: Option<String>,

    /// URL to request
    #[arg(value_name = "URL")]
    pub second: Option<String>,

    /// Request argument: a query parameter for GET, a form field for POST
    #[arg(short = 'd', long = "data", value_name = "KEY=VALUE", value_parser = parse_key_value)]
    pub data: Vec<(String, String)>,

    /// Seconds to wait for the connection to open (0 waits forever)
    #[arg(
        long,
        value_name = "SECS",
        default_value_t = DEFAULT_CONNECT_TIMEOUT.as_secs(),
        env = "HTTPCLIENT_CONNECT_TIMEOUT"
    )]
    pub connect_timeout: u64,

    /// Seconds each read or write on the connection may wait (0 waits forever)
    #[arg(
        long,
        value_name = "SECS",
        default_value_t = DEFAULT_READ_TIMEOUT.as_secs(),
        env = "HTTPCLIENT_READ_TIMEOUT"
    )]
    pub read_timeout: u64,

    /// Value of the User-Agent field
    #[arg(long, env = "HTTPCLIENT_USER_AGENT")]
    pub user_agent: Option<String>,

    /// Log the raw request and connection details to stderr
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    /// The method and URL to request, or `None` when no URL was given
    pub fn method_and_url(&self) -> Result<Option<(Method, &str)>> {
        match (self.first.as_deref(), self.second.as_deref()) {
            (None, _) => Ok(None),
            (Some(url), None) => Ok(Some((Method::Get, url))),
            (Some(method), Some(url)) => Ok(Some((method.parse()?, url))),
        }
    }

    pub fn params(&self) -> Option<Params> {
        if self.data.is_empty() {
            None
        } else {
            Some(self.data.iter().cloned().collect())
        }
    }

    pub fn client_config(&self) -> ClientConfig {
        let config = ClientConfig::new()
            .with_connect_timeout(seconds(self.connect_timeout))
            .with_read_timeout(seconds(self.read_timeout));

        match &self.user_agent {
            Some(user_agent) => config.with_user_agent(user_agent.as_str()),
            None => config,
        }
    }

    pub fn log_level(&self) -> Level {
        if self.verbose {
            Level::Debug
        } else {
            Level::Warn
        }
    }
}

fn seconds(secs: u64) -> Option<Duration> {
    (secs > 0).then(|| Duration::from_secs(secs))
}

fn parse_key_value(s: &str) -> std::result::Result<(String, String), String> {
    s.split_once('=')
        .map(|(key, value)| (key.to_string(), value.to_string()))
        .ok_or_else(|| format!("expected KEY=VALUE, got `{}`", s))
}
