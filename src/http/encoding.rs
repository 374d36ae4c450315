//! Parameter encoding and body decoding
//!
//! Query strings go through `url::form_urlencoded`. Form bodies are written
//! as `field=value` pairs with every reserved character percent-encoded
//! (spaces become `%20`, not `+`), which `form_urlencoded::parse` reads back
//! unchanged.

use super::{Body, Error, Result};
use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use std::str;
use url::form_urlencoded;

/// Characters left as-is in form fields and values
const FORM_RESERVED: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~')
    .remove(b'/');

/// Ordered string-to-string mapping for query parameters and form fields
///
/// Inserting a key that already exists replaces its value without moving
/// it, so output order is first-insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Params {
    pairs: Vec<(String, String)>,
}

impl Params {
    pub fn new() -> Self {
        Params { pairs: Vec::new() }
    }

    /// Parse an encoded query string or form body
    pub fn parse(encoded: &str) -> Self {
        form_urlencoded::parse(encoded.as_bytes()).collect()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();

        match self.pairs.iter_mut().find(|(k, _)| *k == key) {
            Some(slot) => slot.1 = value,
            None => self.pairs.push((key, value)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.pairs.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Serialize as a query string (`application/x-www-form-urlencoded`)
    pub fn to_query(&self) -> String {
        form_urlencoded::Serializer::new(String::new())
            .extend_pairs(self.iter())
            .finish()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Params {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut params = Params::new();
        for (key, value) in iter {
            params.insert(key, value);
        }
        params
    }
}

impl<K: Into<String>, V: Into<String>, const N: usize> From<[(K, V); N]> for Params {
    fn from(pairs: [(K, V); N]) -> Self {
        pairs.into_iter().collect()
    }
}

/// Serialize form arguments as `field=value&field=value`
pub fn encode_form(args: &Params) -> String {
    args.iter()
        .map(|(field, value)| {
            format!(
                "{}={}",
                utf8_percent_encode(field, FORM_RESERVED),
                utf8_percent_encode(value, FORM_RESERVED)
            )
        })
        .collect::<Vec<_>>()
        .join("&")
}

/// Combine the query already present in a URL with extra arguments
///
/// Without arguments the existing query is passed through untouched.
/// Otherwise existing pairs are kept verbatim and in order, including
/// repeated keys and their original escaping. A key named in `args` takes
/// the new value at its first position and its other occurrences are
/// dropped. Keys not yet present are appended.
pub fn build_query(existing: Option<&str>, args: Option<&Params>) -> Option<String> {
    let args = match args.filter(|args| !args.is_empty()) {
        Some(args) => args,
        None => return existing.filter(|q| !q.is_empty()).map(str::to_string),
    };

    let encode_pair = |key: &str, value: &str| {
        form_urlencoded::Serializer::new(String::new())
            .append_pair(key, value)
            .finish()
    };

    let mut pairs = Vec::new();
    let mut replaced = Vec::new();
    for raw in existing.unwrap_or_default().split('&').filter(|raw| !raw.is_empty()) {
        let key = form_urlencoded::parse(raw.as_bytes())
            .next()
            .map(|(key, _)| key.into_owned())
            .unwrap_or_default();

        match args.get(&key) {
            None => pairs.push(raw.to_string()),
            Some(value) if !replaced.contains(&key) => {
                pairs.push(encode_pair(&key, value));
                replaced.push(key);
            }
            Some(_) => {}
        }
    }

    for (key, value) in args.iter() {
        if !replaced.iter().any(|k| k == key) {
            pairs.push(encode_pair(key, value));
        }
    }

    Some(pairs.join("&"))
}

fn is_json(content_type: &str) -> bool {
    content_type.to_ascii_lowercase().contains("json")
}

/// Decode a response body as UTF-8 text, or as JSON when the content type
/// declares it and there is something to parse
pub fn decode_body(content_type: Option<&str>, body: &[u8]) -> Result<Body> {
    let text = str::from_utf8(body)
        .map_err(|e| Error::Encoding(format!("Response body is not valid UTF-8: {}", e)))?;

    if text.is_empty() || !content_type.is_some_and(is_json) {
        return Ok(Body::Text(text.to_string()));
    }

    let decoded = percent_decode_str(text)
        .decode_utf8()
        .map_err(|e| Error::Encoding(format!("Percent-decoded body is not valid UTF-8: {}", e)))?;
    let value = serde_json::from_str(&decoded)
        .map_err(|e| Error::Encoding(format!("Invalid JSON body: {}", e)))?;

    Ok(Body::Json(value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_params_insert_replaces_in_place() {
        let mut params = Params::new();
        params.insert("b", "1");
        params.insert("a", "2");
        params.insert("b", "3");

        let collected: Vec<_> = params.iter().collect();
        assert_eq!(collected, vec![("b", "3"), ("a", "2")]);
        assert_eq!(params.get("b"), Some("3"));
        assert_eq!(params.get("c"), None);
    }

    #[test]
    fn test_encode_form() {
        let args = Params::from([("hello", "world"), ("greeting", "hi there & bye"), ("path", "/a/b")]);
        assert_eq!(
            encode_form(&args),
            "hello=world&greeting=hi%20there%20%26%20bye&path=/a/b"
        );
        assert_eq!(encode_form(&Params::new()), "");
    }

    #[test]
    fn test_encode_form_multibyte() {
        let args = Params::from([("name", "José")]);
        assert_eq!(encode_form(&args), "name=Jos%C3%A9");
    }

    #[test]
    fn test_form_round_trip() {
        let args = Params::from([
            ("hello", "world"),
            ("a b", "c+d"),
            ("sym", "=&?#%"),
            ("unicode", "żółw 🐢"),
            ("empty", ""),
        ]);

        assert_eq!(Params::parse(&encode_form(&args)), args);
    }

    #[test]
    fn test_build_query_passthrough() {
        assert_eq!(build_query(Some("a=1&b=%20"), None), Some("a=1&b=%20".to_string()));
        assert_eq!(build_query(Some(""), None), None);
        assert_eq!(build_query(None, Some(&Params::new())), None);
    }

    #[test]
    fn test_build_query_merges_args() {
        let args = Params::from([("b", "new"), ("c", "x y")]);
        assert_eq!(
            build_query(Some("a=1&b=old"), Some(&args)),
            Some("a=1&b=new&c=x+y".to_string())
        );
        assert_eq!(
            build_query(None, Some(&args)),
            Some("b=new&c=x+y".to_string())
        );
    }

    #[test]
    fn test_build_query_keeps_repeated_keys_and_escaping() {
        let args = Params::from([("x", "1")]);
        assert_eq!(
            build_query(Some("tag=a&tag=b&sp=a%20b"), Some(&args)),
            Some("tag=a&tag=b&sp=a%20b&x=1".to_string())
        );
    }

    #[test]
    fn test_build_query_overrides_every_occurrence() {
        let args = Params::from([("tag", "c d")]);
        assert_eq!(
            build_query(Some("tag=a&keep=%2F&tag=b&"), Some(&args)),
            Some("tag=c+d&keep=%2F".to_string())
        );

        // keys are compared decoded
        let args = Params::from([("a b", "2")]);
        assert_eq!(
            build_query(Some("a%20b=1&z"), Some(&args)),
            Some("a+b=2&z".to_string())
        );
    }

    #[test]
    fn test_decode_body_text() {
        let body = decode_body(Some("text/plain"), b"hello").unwrap();
        assert_eq!(body, Body::Text("hello".to_string()));

        let body = decode_body(None, "día".as_bytes()).unwrap();
        assert_eq!(body.as_text(), Some("día"));
    }

    #[test]
    fn test_decode_body_json() {
        let body = decode_body(Some("Application/JSON"), br#"{"a":[1,2]}"#).unwrap();
        assert_eq!(body, Body::Json(json!({"a": [1, 2]})));

        let body = decode_body(Some("application/json"), b"%7B%22k%22%3A%22v%22%7D").unwrap();
        assert_eq!(body, Body::Json(json!({"k": "v"})));
    }

    #[test]
    fn test_decode_body_errors() {
        let err = decode_body(Some("application/json"), b"{not json").unwrap_err();
        assert!(err.is_encoding_error());

        let err = decode_body(Some("text/plain"), b"\xc3\x28").unwrap_err();
        assert!(err.is_encoding_error());
    }
}
