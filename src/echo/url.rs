//! Reconstruction of the client-visible request URL.
//!
//! The request target the service receives is relative to the proxy, so the
//! scheme and host are replaced with the resolved origin while everything
//! else is carried over verbatim from the inbound request target.

use std::fmt;

use axum::http::Uri;

use crate::echo::origin::ResolvedOrigin;

/// The components a URL string is composed from.
///
/// `path` and `raw_query` are kept in their escaped wire form. A request
/// target never carries an opaque part or a fragment, so neither exists here.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UrlParts {
    pub scheme: String,
    pub user: Option<String>,
    pub host: String,
    pub path: String,
    pub force_query: bool,
    pub raw_query: String,
}

impl UrlParts {
    /// Combine the resolved origin with the inbound request target.
    ///
    /// A bare root path is dropped so that `https://example.com` is not
    /// rendered with a redundant trailing `/`.
    pub fn reconstruct(uri: &Uri, origin: &ResolvedOrigin) -> Self {
        let path = match uri.path() {
            "/" => String::new(),
            other => other.to_string(),
        };
        let (force_query, raw_query) = match uri.query() {
            Some("") => (true, String::new()),
            Some(query) => (false, query.to_string()),
            None => (false, String::new()),
        };

        Self {
            scheme: origin.scheme.clone(),
            user: uri.authority().and_then(|a| user_info(a.as_str())),
            host: origin.host.clone(),
            path,
            force_query,
            raw_query,
        }
    }
}

fn user_info(authority: &str) -> Option<String> {
    authority.rsplit_once('@').map(|(user, _)| user.to_string())
}

impl fmt::Display for UrlParts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut out = String::new();

        if !self.scheme.is_empty() {
            out.push_str(&self.scheme);
            out.push(':');
        }

        if !self.scheme.is_empty() || !self.host.is_empty() || self.user.is_some() {
            if !self.host.is_empty() || !self.path.is_empty() || self.user.is_some() {
                out.push_str("//");
            }
            if let Some(user) = &self.user {
                out.push_str(user);
                out.push('@');
            }
            out.push_str(&self.host);
        }

        if !self.path.is_empty() && !self.path.starts_with('/') && !self.host.is_empty() {
            out.push('/');
        }
        if out.is_empty() {
            // A leading segment like "a:b" would otherwise parse as a scheme.
            let first_segment = self.path.split('/').next().unwrap_or_default();
            if first_segment.contains(':') {
                out.push_str("./");
            }
        }
        out.push_str(&self.path);

        if self.force_query || !self.raw_query.is_empty() {
            out.push('?');
            out.push_str(&self.raw_query);
        }

        f.write_str(&out)
    }
}

/// Client-visible URL for a request target, as a string.
pub fn reconstruct_url(uri: &Uri, origin: &ResolvedOrigin) -> String {
    UrlParts::reconstruct(uri, origin).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn origin(scheme: &str, host: &str) -> ResolvedOrigin {
        ResolvedOrigin {
            host: host.into(),
            ip: String::new(),
            scheme: scheme.into(),
        }
    }

    fn url(target: &str, scheme: &str, host: &str) -> String {
        let uri: Uri = target.parse().unwrap();
        reconstruct_url(&uri, &origin(scheme, host))
    }

    #[test]
    fn root_path_is_omitted() {
        assert_eq!(url("/", "https", "example.com"), "https://example.com");
    }

    #[test]
    fn root_path_keeps_query() {
        assert_eq!(url("/?a=1&b=2", "https", "example.com"), "https://example.com?a=1&b=2");
    }

    #[test]
    fn explicit_path_is_kept() {
        assert_eq!(
            url("/api/v1/items?id=7", "http", "example.com:8080"),
            "http://example.com:8080/api/v1/items?id=7"
        );
    }

    #[test]
    fn escaped_path_passes_through() {
        assert_eq!(url("/a%20b/%2F", "https", "h"), "https://h/a%20b/%2F");
    }

    #[test]
    fn empty_scheme_is_scheme_relative() {
        assert_eq!(url("/path", "", "example.com"), "//example.com/path");
    }

    #[test]
    fn empty_host_keeps_scheme() {
        assert_eq!(url("/path", "https", ""), "https:///path");
        assert_eq!(url("/", "https", ""), "https:");
    }

    #[test]
    fn no_origin_degenerates_to_path_and_query() {
        assert_eq!(url("/path?x=1", "", ""), "/path?x=1");
        assert_eq!(url("/", "", ""), "");
        assert_eq!(url("/?x=1", "", ""), "?x=1");
    }

    #[test]
    fn empty_query_is_forced() {
        assert_eq!(url("/search?", "https", "example.com"), "https://example.com/search?");
    }

    #[test]
    fn asterisk_form_gets_separator() {
        assert_eq!(url("*", "http", "example.com"), "http://example.com/*");
    }

    #[test]
    fn user_info_is_preserved() {
        assert_eq!(
            url("http://alice@backend/x", "https", "example.com"),
            "https://alice@example.com/x"
        );
    }

    #[test]
    fn relative_path_with_colon_is_dot_prefixed() {
        let parts = UrlParts {
            path: "a:b/c".into(),
            ..UrlParts::default()
        };
        assert_eq!(parts.to_string(), "./a:b/c");
    }

    #[test]
    fn absolute_form_target_takes_resolved_origin() {
        assert_eq!(
            url("http://backend:8080/x?y=1", "https", "example.com"),
            "https://example.com/x?y=1"
        );
    }
}
