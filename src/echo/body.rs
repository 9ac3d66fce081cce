//! Request body classification.
//!
//! # Data Flow
//! ```text
//! buffered body bytes + Content-Type
//!     → empty?                          → nothing echoed
//!     → media type (cut at first ';')
//!         text/html, text/plain         → nothing echoed
//!         x-www-form-urlencoded         → body and query validated, raw text in `data`
//!         application/json              → first JSON value in `json`
//!         anything else                 → base64 data URI in `data`
//! ```
//!
//! Classification works on an immutable byte buffer, so the body stays
//! available to the caller afterwards and no request state is touched.

use axum::http::{HeaderMap, Method};
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::echo::error::EchoError;

pub const FORM_URLENCODED: &str = "application/x-www-form-urlencoded";
pub const JSON: &str = "application/json";
pub const OCTET_STREAM: &str = "application/octet-stream";

/// How a body is represented in the echo.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BodyRepr {
    Data(String),
    Json(Value),
}

/// Malformed `application/x-www-form-urlencoded` input.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FormError {
    #[error("invalid semicolon separator in query")]
    InvalidSemicolon,

    #[error("invalid URL escape {0:?}")]
    InvalidEscape(String),
}

/// Methods whose body is interpreted.
pub fn method_has_body(method: &Method) -> bool {
    matches!(*method, Method::DELETE | Method::PATCH | Method::POST | Method::PUT)
}

/// Media type of the request: the `Content-Type` value up to the first `;`.
pub fn media_type(headers: &HeaderMap) -> &str {
    let value = headers
        .get(axum::http::header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();
    value.split_once(';').map_or(value, |(media, _)| media)
}

/// Decide how `body` is echoed given its media type.
///
/// Form bodies are validated together with the request's raw query, whose
/// fields belong to the same form; the body is checked first.
pub fn classify_body(
    body: &[u8],
    media_type: &str,
    raw_query: Option<&str>,
) -> Result<Option<BodyRepr>, EchoError> {
    if body.is_empty() {
        return Ok(None);
    }

    let repr = match media_type {
        "text/html" | "text/plain" => None,
        FORM_URLENCODED => {
            let fields = decode_form(body)?;
            let query_fields = decode_form(raw_query.unwrap_or_default().as_bytes())?;
            tracing::trace!(
                fields = fields.len(),
                query_fields = query_fields.len(),
                "Decoded form body"
            );
            Some(BodyRepr::Data(String::from_utf8_lossy(body).into_owned()))
        }
        JSON => Some(BodyRepr::Json(decode_json(body)?)),
        other => Some(BodyRepr::Data(data_uri(body, other))),
    };

    Ok(repr)
}

/// Parse the first JSON value in `body`; anything after it is ignored.
pub fn decode_json(body: &[u8]) -> Result<Value, serde_json::Error> {
    let mut deserializer = serde_json::Deserializer::from_slice(body);
    Value::deserialize(&mut deserializer)
}

/// Validate and decode a form body into its fields.
pub fn decode_form(body: &[u8]) -> Result<Vec<(String, String)>, FormError> {
    for pair in body.split(|b| *b == b'&') {
        if pair.contains(&b';') {
            return Err(FormError::InvalidSemicolon);
        }
        check_escapes(pair)?;
    }

    Ok(::url::form_urlencoded::parse(body)
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect())
}

/// Every `%` must start a two-digit hex escape.
pub(crate) fn check_escapes(pair: &[u8]) -> Result<(), FormError> {
    let mut i = 0;
    while i < pair.len() {
        if pair[i] == b'%' {
            let escape = pair.get(i..i + 3).unwrap_or(&pair[i..]);
            if escape.len() < 3 || !escape[1..].iter().all(u8::is_ascii_hexdigit) {
                let escape = String::from_utf8_lossy(escape).into_owned();
                return Err(FormError::InvalidEscape(escape));
            }
            i += 3;
        } else {
            i += 1;
        }
    }
    Ok(())
}

/// `data:<media type>;base64,<payload>`, defaulting to octet-stream.
pub fn data_uri(body: &[u8], media_type: &str) -> String {
    let media_type = if media_type.is_empty() { OCTET_STREAM } else { media_type };
    format!("data:{};base64,{}", media_type, STANDARD.encode(body))
}
