//! Client-facing projection of the inbound header map.
//!
//! # Responsibilities
//! - Overwrite `Host` with the resolved host (even when empty)
//! - Re-declare transfer codings as a single `Transfer-Encoding` entry
//! - Strip the proxy metadata headers
//! - Fold single-valued headers into bare strings
//!
//! Names are exposed in canonical MIME form (`Content-Type`); output is
//! key-sorted.

use std::collections::BTreeMap;

use axum::http::header::{HOST, TRANSFER_ENCODING};
use axum::http::HeaderMap;
use serde::Serialize;

use crate::echo::origin::{ResolvedOrigin, TrustedHeaders};

/// A header or query parameter value as exposed in the response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Folded {
    Single(String),
    Multiple(Vec<String>),
}

impl Folded {
    /// Collapse a one-element list into a bare string.
    pub fn from_values(mut values: Vec<String>) -> Self {
        if values.len() == 1 {
            Folded::Single(values.remove(0))
        } else {
            Folded::Multiple(values)
        }
    }
}

pub type ProjectedHeaders = BTreeMap<String, Folded>;

/// Build the header view echoed back to the client.
pub fn project_headers(
    headers: &HeaderMap,
    origin: &ResolvedOrigin,
    trusted: &TrustedHeaders,
) -> ProjectedHeaders {
    let mut collected: BTreeMap<String, Vec<String>> = BTreeMap::new();

    for name in headers.keys() {
        if trusted.contains(name) || *name == HOST || *name == TRANSFER_ENCODING {
            continue;
        }
        let values = headers
            .get_all(name)
            .iter()
            .map(|v| String::from_utf8_lossy(v.as_bytes()).into_owned())
            .collect();
        collected.insert(canonical_name(name.as_str()), values);
    }

    collected.insert("Host".to_string(), vec![origin.host.clone()]);

    let codings = transfer_codings(headers);
    if !codings.is_empty() {
        collected.insert("Transfer-Encoding".to_string(), vec![codings.join(",")]);
    }

    collected
        .into_iter()
        .map(|(name, values)| (name, Folded::from_values(values)))
        .collect()
}

/// Every coding declared across all `Transfer-Encoding` lines, in order.
fn transfer_codings(headers: &HeaderMap) -> Vec<String> {
    headers
        .get_all(TRANSFER_ENCODING)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(','))
        .map(str::trim)
        .filter(|coding| !coding.is_empty())
        .map(str::to_string)
        .collect()
}

/// Canonical MIME form: first letter and letters after `-` upper case.
pub fn canonical_name(name: &str) -> String {
    let mut upper = true;
    name.chars()
        .map(|c| {
            let out = if upper {
                c.to_ascii_uppercase()
            } else {
                c.to_ascii_lowercase()
            };
            upper = c == '-';
            out
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn origin(host: &str) -> ResolvedOrigin {
        ResolvedOrigin {
            host: host.into(),
            ..ResolvedOrigin::default()
        }
    }

    #[test]
    fn canonicalizes_names() {
        assert_eq!(canonical_name("content-type"), "Content-Type");
        assert_eq!(canonical_name("x-nginx-echo-ip"), "X-Nginx-Echo-Ip");
        assert_eq!(canonical_name("accept"), "Accept");
        assert_eq!(canonical_name("www-authenticate"), "Www-Authenticate");
    }

    #[test]
    fn host_is_overwritten_with_resolved_value() {
        let mut headers = HeaderMap::new();
        headers.insert(HOST, HeaderValue::from_static("127.0.0.1:7777"));
        headers.insert("x-nginx-echo-host", HeaderValue::from_static("example.com"));

        let projected =
            project_headers(&headers, &origin("example.com"), &TrustedHeaders::default());
        assert_eq!(projected["Host"], Folded::Single("example.com".into()));
    }

    #[test]
    fn host_is_present_even_when_unresolved() {
        let mut headers = HeaderMap::new();
        headers.insert(HOST, HeaderValue::from_static("127.0.0.1:7777"));

        let projected = project_headers(&headers, &origin(""), &TrustedHeaders::default());
        assert_eq!(projected["Host"], Folded::Single(String::new()));
    }

    #[test]
    fn metadata_headers_are_stripped() {
        let mut headers = HeaderMap::new();
        headers.insert("x-nginx-echo-host", HeaderValue::from_static("h"));
        headers.insert("x-nginx-echo-ip", HeaderValue::from_static("1.2.3.4"));
        headers.insert("x-nginx-echo-scheme", HeaderValue::from_static("https"));
        headers.insert("accept", HeaderValue::from_static("*/*"));

        let projected = project_headers(&headers, &origin("h"), &TrustedHeaders::default());
        let names: Vec<&str> = projected.keys().map(String::as_str).collect();
        assert_eq!(names, vec!["Accept", "Host"]);
    }

    #[test]
    fn repeated_headers_stay_ordered_lists() {
        let mut headers = HeaderMap::new();
        headers.append("x-forwarded-for", HeaderValue::from_static("10.0.0.1"));
        headers.append("x-forwarded-for", HeaderValue::from_static("10.0.0.2"));
        headers.insert("user-agent", HeaderValue::from_static("curl/8.0"));

        let projected = project_headers(&headers, &origin(""), &TrustedHeaders::default());
        assert_eq!(
            projected["X-Forwarded-For"],
            Folded::Multiple(vec!["10.0.0.1".into(), "10.0.0.2".into()])
        );
        assert_eq!(projected["User-Agent"], Folded::Single("curl/8.0".into()));
    }

    #[test]
    fn transfer_encoding_only_when_declared() {
        let headers = HeaderMap::new();
        let projected = project_headers(&headers, &origin(""), &TrustedHeaders::default());
        assert!(!projected.contains_key("Transfer-Encoding"));

        let mut headers = HeaderMap::new();
        headers.append(TRANSFER_ENCODING, HeaderValue::from_static("gzip"));
        headers.append(TRANSFER_ENCODING, HeaderValue::from_static("chunked"));
        let projected = project_headers(&headers, &origin(""), &TrustedHeaders::default());
        assert_eq!(projected["Transfer-Encoding"], Folded::Single("gzip,chunked".into()));
    }

    #[test]
    fn folded_serializes_as_string_or_array() {
        let single = serde_json::to_value(Folded::Single("a".into())).unwrap();
        let multiple =
            serde_json::to_value(Folded::Multiple(vec!["a".into(), "b".into()])).unwrap();
        assert_eq!(single, serde_json::json!("a"));
        assert_eq!(multiple, serde_json::json!(["a", "b"]));
    }
}
