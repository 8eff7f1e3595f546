//! Conditional request headers
//!
//! Values are opaque strings compared by exact equality. A header that is
//! present but unreadable (non visible-ASCII) or blank counts as absent, so
//! the request falls through to a full response.

use hyper::header::{HeaderMap, HeaderName, IF_MODIFIED_SINCE, IF_NONE_MATCH};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConditionalRequest {
    if_modified_since: Option<String>,
    if_none_match: Option<String>,
}

impl ConditionalRequest {
    pub fn new(if_modified_since: Option<&str>, if_none_match: Option<&str>) -> Self {
        Self {
            if_modified_since: normalize(if_modified_since),
            if_none_match: normalize(if_none_match),
        }
    }

    pub fn from_headers(headers: &HeaderMap) -> Self {
        let read = |name: HeaderName| headers.get(name).and_then(|v| v.to_str().ok());
        Self::new(read(IF_MODIFIED_SINCE), read(IF_NONE_MATCH))
    }

    pub fn if_modified_since(&self) -> Option<&str> {
        self.if_modified_since.as_deref()
    }

    pub fn if_none_match(&self) -> Option<&str> {
        self.if_none_match.as_deref()
    }
}

fn normalize(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(ToString::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use hyper::header::HeaderValue;

    #[test]
    fn test_from_headers() {
        let mut headers = HeaderMap::new();
        headers.insert(
            IF_MODIFIED_SINCE,
            HeaderValue::from_static("Wed, 11 May 2022 10:48:50 GMT"),
        );
        headers.insert(IF_NONE_MATCH, HeaderValue::from_static("a1b2c3"));

        let conditional = ConditionalRequest::from_headers(&headers);
        assert_eq!(
            conditional.if_modified_since(),
            Some("Wed, 11 May 2022 10:48:50 GMT")
        );
        assert_eq!(conditional.if_none_match(), Some("a1b2c3"));
    }

    #[test]
    fn test_absent_headers() {
        let conditional = ConditionalRequest::from_headers(&HeaderMap::new());
        assert_eq!(conditional, ConditionalRequest::default());
    }

    #[test]
    fn test_malformed_headers_are_absent() {
        let mut headers = HeaderMap::new();
        headers.insert(IF_NONE_MATCH, HeaderValue::from_bytes(b"\xFFabc").unwrap());
        headers.insert(IF_MODIFIED_SINCE, HeaderValue::from_static("   "));

        let conditional = ConditionalRequest::from_headers(&headers);
        assert_eq!(conditional.if_none_match(), None);
        assert_eq!(conditional.if_modified_since(), None);
    }

    #[test]
    fn test_surrounding_whitespace_trimmed() {
        let conditional = ConditionalRequest::new(None, Some("  a1b2c3 "));
        assert_eq!(conditional.if_none_match(), Some("a1b2c3"));
    }
}
