//! HTTP header fields
//!
//! `Headers` holds the caller-supplied fields of an outgoing request. Fields
//! are kept in insertion order because they are written to the wire in that
//! order. Lookups are case-insensitive.
//!
//! Responses keep their header block as a single string; `fields` walks it
//! lazily when one field is needed.

use super::{Error, Result, CRLF};
use std::fmt;

/// Ordered collection of header fields
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Headers {
    headers: Vec<(String, String)>,
}

impl Headers {
    /// Create a new empty headers collection
    pub fn new() -> Self {
        Headers {
            headers: Vec::new(),
        }
    }

    /// Append a field
    ///
    /// An existing field with the same name is kept; both are written.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.headers.push((name.into(), value.into()));
    }

    /// Replace the value of the first field with this name, or append it
    ///
    /// The field keeps its original position, so output order stays stable.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();

        match self
            .headers
            .iter_mut()
            .find(|(n, _)| n.eq_ignore_ascii_case(&name))
        {
            Some(slot) => slot.1 = value,
            None => self.headers.push((name, value)),
        }
    }

    /// Get the first value for a field (case-insensitive)
    pub fn get(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    pub fn len(&self) -> usize {
        self.headers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.headers.is_empty()
    }

    /// Iterate over all fields in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.headers.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }

    /// Split a header line into trimmed name and value
    pub fn parse_header_line(line: &str) -> Result<(&str, &str)> {
        let (name, value) = line
            .split_once(':')
            .ok_or_else(|| Error::MalformedResponse(format!("No colon in header: {}", line)))?;

        let name = name.trim();
        if name.is_empty() {
            return Err(Error::MalformedResponse("Empty header name".to_string()));
        }

        Ok((name, value.trim()))
    }
}

/// Iterate over the fields of a raw response header block
///
/// The first line is the status line and is skipped, as are lines that do
/// not look like `name: value`.
pub fn fields(block: &str) -> impl Iterator<Item = (&str, &str)> {
    block
        .split(CRLF)
        .skip(1)
        .filter_map(|line| Headers::parse_header_line(line).ok())
}

impl fmt::Display for Headers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (name, value) in &self.headers {
            write!(f, "{}: {}{}", name, value, CRLF)?;
        }
        Ok(())
    }
}

impl<N: Into<String>, V: Into<String>> FromIterator<(N, V)> for Headers {
    fn from_iter<T: IntoIterator<Item = (N, V)>>(iter: T) -> Self {
        let mut headers = Headers::new();
        for (name, value) in iter {
            headers.insert(name, value);
        }
        headers
    }
}
