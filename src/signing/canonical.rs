//! Canonical request construction for AWS Signature V4.

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use std::collections::BTreeMap;

/// Unreserved characters per RFC 3986; everything else is percent-encoded.
const UNRESERVED: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// URI-encode a single path segment or query component.
pub fn uri_encode(value: &str) -> String {
    utf8_percent_encode(value, UNRESERVED).to_string()
}

/// Canonical URI: every segment encoded, `/` separators kept.
pub fn canonical_uri(path: &str) -> String {
    let trimmed = path.trim_start_matches('/');
    if trimmed.is_empty() {
        return "/".to_string();
    }

    let encoded: Vec<String> = trimmed.split('/').map(uri_encode).collect();
    format!("/{}", encoded.join("/"))
}

/// Canonical query string: pairs encoded, then sorted by name and value.
pub fn canonical_query(query: &str) -> String {
    let mut params: Vec<(String, String)> = query
        .split('&')
        .filter(|pair| !pair.is_empty())
        .map(|pair| {
            let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
            (uri_encode(key), uri_encode(value))
        })
        .collect();
    params.sort();

    params
        .into_iter()
        .map(|(k, v)| format!("{}={}", k, v))
        .collect::<Vec<_>>()
        .join("&")
}

/// Canonical headers block and the matching signed-headers list.
///
/// Only headers accepted by [`super::should_sign_header`] take part. Names are
/// lowercased, values trimmed with inner whitespace collapsed, and repeated
/// headers joined with commas.
pub fn canonical_headers(headers: &[(String, String)]) -> (String, String) {
    let mut by_name: BTreeMap<String, Vec<String>> = BTreeMap::new();

    for (name, value) in headers {
        let name = name.to_lowercase();
        if !super::should_sign_header(&name) {
            continue;
        }
        let value = value.split_whitespace().collect::<Vec<_>>().join(" ");
        by_name.entry(name).or_default().push(value);
    }

    let canonical = by_name
        .iter()
        .map(|(name, values)| format!("{}:{}\n", name, values.join(",")))
        .collect();
    let signed = by_name.keys().cloned().collect::<Vec<_>>().join(";");

    (canonical, signed)
}

/// Build the canonical request string and return it with the signed-headers list.
///
/// ```text
/// METHOD\nURI\nQUERY\nHEADERS\nSIGNED_HEADERS\nPAYLOAD_HASH
/// ```
pub fn canonical_request(
    method: &str,
    path: &str,
    query: &str,
    headers: &[(String, String)],
    payload_hash: &str,
) -> (String, String) {
    let (canonical_headers, signed_headers) = canonical_headers(headers);

    let request = format!(
        "{}\n{}\n{}\n{}\n{}\n{}",
        method.to_uppercase(),
        canonical_uri(path),
        canonical_query(query),
        canonical_headers,
        signed_headers,
        payload_hash
    );

    (request, signed_headers)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uri_encode() {
        assert_eq!(uri_encode("foo"), "foo");
        assert_eq!(uri_encode("foo bar"), "foo%20bar");
        assert_eq!(uri_encode("a=b"), "a%3Db");
        assert_eq!(uri_encode("x-y_z.~"), "x-y_z.~");
    }

    #[test]
    fn test_canonical_uri() {
        assert_eq!(canonical_uri(""), "/");
        assert_eq!(canonical_uri("/"), "/");
        assert_eq!(canonical_uri("/foo/bar"), "/foo/bar");
        assert_eq!(canonical_uri("foo bar/baz"), "/foo%20bar/baz");
    }

    #[test]
    fn test_canonical_query() {
        assert_eq!(canonical_query(""), "");
        assert_eq!(canonical_query("b=2&a=1"), "a=1&b=2");
        assert_eq!(canonical_query("a=2&a=1"), "a=1&a=2");
        assert_eq!(canonical_query("flag"), "flag=");
    }

    #[test]
    fn test_canonical_headers() {
        let headers = vec![
            ("Host".to_string(), "  kinesis.us-east-1.amazonaws.com ".to_string()),
            ("X-Amz-Target".to_string(), "Kinesis_20131202.ListStreams".to_string()),
            ("Content-Type".to_string(), "application/x-amz-json-1.1".to_string()),
            ("User-Agent".to_string(), "ignored".to_string()),
        ];

        let (canonical, signed) = canonical_headers(&headers);
        assert_eq!(
            canonical,
            "content-type:application/x-amz-json-1.1\n\
             host:kinesis.us-east-1.amazonaws.com\n\
             x-amz-target:Kinesis_20131202.ListStreams\n"
        );
        assert_eq!(signed, "content-type;host;x-amz-target");
    }

    #[test]
    fn test_canonical_request_layout() {
        let headers = vec![("host".to_string(), "example.com".to_string())];
        let (request, signed) = canonical_request("post", "/", "", &headers, "abc");

        assert_eq!(request, "POST\n/\n\nhost:example.com\n\nhost\nabc");
        assert_eq!(signed, "host");
    }
}
