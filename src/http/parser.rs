//! HTTP response parsing
//!
//! The client reads until the peer closes, so a response arrives here in one
//! piece. The only framing the parser relies on is the first blank line
//! (CRLF CRLF) between the header block and the body; a response without one
//! is reported as malformed instead of being indexed blindly.

use super::{encoding, headers, Error, HttpResponse, Result, Status, HEADER_BOUNDARY};
use std::str;

/// Find the first CRLF CRLF in a buffer
fn find_boundary(buf: &[u8]) -> Option<usize> {
    buf.windows(HEADER_BOUNDARY.len())
        .position(|w| w == HEADER_BOUNDARY)
}

fn boundary(raw: &[u8]) -> Result<usize> {
    find_boundary(raw).ok_or_else(|| {
        if raw.is_empty() {
            Error::MalformedResponse("Empty response".to_string())
        } else {
            Error::MalformedResponse("Missing header/body boundary".to_string())
        }
    })
}

/// Parse the status code from the first line of a response
///
/// Format: VERSION STATUS REASON
/// Example: HTTP/1.1 200 OK
///
/// A code outside 100..=599, a non-numeric code, or a missing status line is
/// `Error::MalformedResponse`.
pub fn parse_status(raw: &str) -> Result<Status> {
    let line = raw
        .lines()
        .next()
        .filter(|line| !line.trim().is_empty())
        .ok_or_else(|| Error::MalformedResponse("Missing status line".to_string()))?;

    let token = line
        .split_whitespace()
        .nth(1)
        .ok_or_else(|| Error::MalformedResponse(format!("Invalid status line: {}", line)))?;

    let code = token
        .parse::<u16>()
        .map_err(|_| Error::MalformedResponse(format!("Invalid status code: {}", token)))?;

    Status::new(code)
}

/// Everything before the first blank line
pub fn split_headers(raw: &[u8]) -> Result<&[u8]> {
    let pos = boundary(raw)?;
    Ok(&raw[..pos])
}

/// Everything after the first blank line
pub fn split_body(raw: &[u8]) -> Result<&[u8]> {
    let pos = boundary(raw)?;
    Ok(&raw[pos + HEADER_BOUNDARY.len()..])
}

/// Parse a complete raw response into status, header block and decoded body
pub fn parse_response(raw: &[u8]) -> Result<HttpResponse> {
    let header_block = split_headers(raw)?;
    let body = split_body(raw)?;

    let header_block = str::from_utf8(header_block)
        .map_err(|e| Error::Encoding(format!("Header block is not valid UTF-8: {}", e)))?;
    let status = parse_status(header_block)?;

    let content_type = headers::fields(header_block)
        .find(|(name, _)| name.eq_ignore_ascii_case("Content-Type"))
        .map(|(_, value)| value);
    let body = encoding::decode_body(content_type, body)?;

    Ok(HttpResponse::new(status, header_block, body))
}
