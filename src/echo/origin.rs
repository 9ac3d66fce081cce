//! Client origin resolution from proxy-supplied headers.
//!
//! The service only ever sees the proxy's connection, so the client-visible
//! host, IP and scheme are read from headers the proxy sets. Values are
//! taken verbatim; an absent header resolves to an empty string.

use axum::http::header::InvalidHeaderName;
use axum::http::{HeaderMap, HeaderName};

use crate::config::TrustedHeadersConfig;

/// Parsed names of the headers carrying client metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrustedHeaders {
    pub host: HeaderName,
    pub ip: HeaderName,
    pub scheme: HeaderName,
}

impl TrustedHeaders {
    /// Whether `name` is one of the metadata headers.
    pub fn contains(&self, name: &HeaderName) -> bool {
        *name == self.host || *name == self.ip || *name == self.scheme
    }
}

impl Default for TrustedHeaders {
    fn default() -> Self {
        Self {
            host: HeaderName::from_static("x-nginx-echo-host"),
            ip: HeaderName::from_static("x-nginx-echo-ip"),
            scheme: HeaderName::from_static("x-nginx-echo-scheme"),
        }
    }
}

impl TryFrom<&TrustedHeadersConfig> for TrustedHeaders {
    type Error = InvalidHeaderName;

    fn try_from(config: &TrustedHeadersConfig) -> Result<Self, Self::Error> {
        Ok(Self {
            host: HeaderName::from_bytes(config.host.as_bytes())?,
            ip: HeaderName::from_bytes(config.ip.as_bytes())?,
            scheme: HeaderName::from_bytes(config.scheme.as_bytes())?,
        })
    }
}

/// Client-visible request metadata.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolvedOrigin {
    pub host: String,
    pub ip: String,
    pub scheme: String,
}

impl ResolvedOrigin {
    pub fn resolve(headers: &HeaderMap, trusted: &TrustedHeaders) -> Self {
        Self {
            host: first_value(headers, &trusted.host),
            ip: first_value(headers, &trusted.ip),
            scheme: first_value(headers, &trusted.scheme),
        }
    }
}

fn first_value(headers: &HeaderMap, name: &HeaderName) -> String {
    headers
        .get(name)
        .map(|v| String::from_utf8_lossy(v.as_bytes()).into_owned())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn reads_all_three_headers() {
        let mut headers = HeaderMap::new();
        headers.insert("x-nginx-echo-host", HeaderValue::from_static("example.com"));
        headers.insert("x-nginx-echo-ip", HeaderValue::from_static("203.0.113.7"));
        headers.insert("x-nginx-echo-scheme", HeaderValue::from_static("https"));

        let origin = ResolvedOrigin::resolve(&headers, &TrustedHeaders::default());
        assert_eq!(
            origin,
            ResolvedOrigin {
                host: "example.com".into(),
                ip: "203.0.113.7".into(),
                scheme: "https".into(),
            }
        );
    }

    #[test]
    fn absent_headers_resolve_empty() {
        let origin = ResolvedOrigin::resolve(&HeaderMap::new(), &TrustedHeaders::default());
        assert_eq!(origin, ResolvedOrigin::default());
    }

    #[test]
    fn values_are_not_validated() {
        let mut headers = HeaderMap::new();
        headers.insert("x-nginx-echo-ip", HeaderValue::from_static("not an ip"));

        let origin = ResolvedOrigin::resolve(&headers, &TrustedHeaders::default());
        assert_eq!(origin.ip, "not an ip");
    }

    #[test]
    fn honours_configured_names() {
        let config = TrustedHeadersConfig {
            host: "X-Forwarded-Host".into(),
            ip: "X-Real-Ip".into(),
            scheme: "X-Forwarded-Proto".into(),
        };
        let trusted = TrustedHeaders::try_from(&config).unwrap();

        let mut headers = HeaderMap::new();
        headers.insert("x-real-ip", HeaderValue::from_static("10.0.0.1"));
        headers.insert("x-nginx-echo-ip", HeaderValue::from_static("ignored"));

        let origin = ResolvedOrigin::resolve(&headers, &trusted);
        assert_eq!(origin.ip, "10.0.0.1");
        assert!(trusted.contains(&HeaderName::from_static("x-forwarded-proto")));
        assert!(!trusted.contains(&HeaderName::from_static("x-nginx-echo-ip")));
    }
}
