//! Echo and error response shapes, and their JSON rendering.

use axum::body::Body;
use axum::http::{header, HeaderValue, StatusCode};
use axum::response::Response;
use serde::Serialize;

use crate::echo::body::BodyRepr;
use crate::echo::headers::ProjectedHeaders;
use crate::echo::params::Params;

pub const CONTENT_TYPE_JSON: &str = "application/json; charset=utf-8";

/// Fields echoed for every request.
#[derive(Debug, Clone, Serialize)]
pub struct RequestEcho {
    pub origin: String,
    pub method: String,
    pub headers: ProjectedHeaders,
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub params: Option<Params>,
}

impl RequestEcho {
    /// `params` is only kept when at least one parameter exists.
    pub fn new(
        origin: String,
        method: String,
        headers: ProjectedHeaders,
        url: String,
        params: Params,
    ) -> Self {
        Self {
            origin,
            method,
            headers,
            url,
            params: (!params.is_empty()).then_some(params),
        }
    }
}

/// Echo for methods that may carry a body.
#[derive(Debug, Clone, Serialize)]
pub struct BodyEcho {
    #[serde(flatten)]
    pub request: RequestEcho,
    /// Adds either `data` or `json`, or nothing.
    #[serde(flatten)]
    pub body: Option<BodyRepr>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum EchoResponse {
    WithoutBody(RequestEcho),
    WithBody(BodyEcho),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorResponse {
    pub code: u16,
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl ErrorResponse {
    pub fn new(status: StatusCode, detail: Option<String>) -> Self {
        Self {
            code: status.as_u16(),
            error: status.canonical_reason().unwrap_or_default().to_string(),
            detail,
        }
    }
}

/// Pretty-printed JSON (2-space indent, no HTML escaping) plus a newline.
///
/// # Panics
///
/// If `value` cannot be serialized. Response types here are plain data, so
/// this only happens on a programming error.
pub fn to_pretty_json<T: Serialize>(value: &T) -> Vec<u8> {
    let mut out = serde_json::to_vec_pretty(value).expect("response value must serialize to JSON");
    out.push(b'\n');
    out
}

pub fn render_json<T: Serialize>(status: StatusCode, value: &T) -> Response {
    let mut response = Response::new(Body::from(to_pretty_json(value)));
    *response.status_mut() = status;
    response
        .headers_mut()
        .insert(header::CONTENT_TYPE, HeaderValue::from_static(CONTENT_TYPE_JSON));
    response
}
