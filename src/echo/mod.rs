//! Request echo subsystem.
//!
//! # Data Flow
//! ```text
//! request head
//!     → origin.rs (client host/IP/scheme from trusted proxy headers)
//!     → url.rs (client-visible URL)
//!     → headers.rs (header view: Host overwritten, metadata stripped)
//!     → params.rs (query parameters)
//! request body (write methods only)
//!     → body.rs (classify by media type: json / data / nothing)
//!     → response.rs (EchoResponse or ErrorResponse, pretty JSON)
//! ```
//!
//! # Design Decisions
//! - Everything is computed per request from the request alone
//! - Metadata header names are injected (`TrustedHeaders`), not global
//! - Bodies are classified from an immutable buffer; the request is never
//!   mutated along the way

pub mod body;
pub mod error;
pub mod headers;
pub mod origin;
pub mod params;
pub mod response;
pub mod url;

use axum::http::request::Parts;

pub use body::{classify_body, method_has_body, BodyRepr};
pub use error::EchoError;
pub use origin::{ResolvedOrigin, TrustedHeaders};
pub use response::{BodyEcho, EchoResponse, ErrorResponse, RequestEcho};

/// Describe the head of a request: origin, method, headers, URL and params.
pub fn describe_request(parts: &Parts, trusted: &TrustedHeaders) -> RequestEcho {
    let origin = ResolvedOrigin::resolve(&parts.headers, trusted);
    let url = url::reconstruct_url(&parts.uri, &origin);
    let headers = headers::project_headers(&parts.headers, &origin, trusted);
    let params = params::query_params(parts.uri.query());

    RequestEcho::new(origin.ip, parts.method.to_string(), headers, url, params)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;
    use crate::echo::headers::Folded;

    #[test]
    fn describes_proxied_request() {
        let (parts, ()) = Request::get("/items?id=7&id=8")
            .header("host", "127.0.0.1:7777")
            .header("x-nginx-echo-host", "example.com")
            .header("x-nginx-echo-ip", "198.51.100.4")
            .header("x-nginx-echo-scheme", "https")
            .header("accept", "application/json")
            .body(())
            .unwrap()
            .into_parts();

        let echo = describe_request(&parts, &TrustedHeaders::default());
        assert_eq!(echo.origin, "198.51.100.4");
        assert_eq!(echo.method, "GET");
        assert_eq!(echo.url, "https://example.com/items?id=7&id=8");
        assert_eq!(echo.headers.len(), 2);
        assert_eq!(echo.headers["Host"], Folded::Single("example.com".into()));
        assert_eq!(
            echo.params.unwrap()["id"],
            Folded::Multiple(vec!["7".into(), "8".into()])
        );
    }

    #[test]
    fn unproxied_request_has_empty_origin() {
        let (parts, ()) = Request::get("/").body(()).unwrap().into_parts();

        let echo = describe_request(&parts, &TrustedHeaders::default());
        assert_eq!(echo.origin, "");
        assert_eq!(echo.url, "");
        assert!(echo.params.is_none());
        assert_eq!(echo.headers["Host"], Folded::Single(String::new()));
    }
}
