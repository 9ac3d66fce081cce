//! The single echo endpoint.
//!
//! Write methods (DELETE, PATCH, POST, PUT) have their body buffered up to
//! the configured ceiling and classified; every other method is echoed
//! without touching the body.

use std::sync::Arc;
use std::time::Instant;

use axum::{
    body::Body,
    extract::{Request, State},
    http::{request::Parts, StatusCode},
    response::{IntoResponse, Response},
};

use crate::echo::body::{media_type, FORM_URLENCODED};
use crate::echo::response::render_json;
use crate::echo::{
    classify_body, describe_request, method_has_body, BodyEcho, BodyRepr, EchoError, EchoResponse,
    RequestEcho, TrustedHeaders,
};
use crate::observability::metrics;

/// State injected into the echo handler.
#[derive(Debug, Clone)]
pub struct EchoState {
    pub trusted: Arc<TrustedHeaders>,
    pub max_body_bytes: usize,
}

pub async fn echo_handler(State(state): State<EchoState>, request: Request) -> Response {
    let start_time = Instant::now();
    let (parts, body) = request.into_parts();
    let echo = describe_request(&parts, &state.trusted);

    tracing::debug!(
        method = %parts.method,
        url = %echo.url,
        origin = %echo.origin,
        "Echoing request"
    );

    let response = if method_has_body(&parts.method) {
        match echo_with_body(echo, &parts, body, state.max_body_bytes).await {
            Ok(echo) => render_json(StatusCode::OK, &echo),
            Err(err) => err.into_response(),
        }
    } else {
        render_json(StatusCode::OK, &EchoResponse::WithoutBody(echo))
    };

    metrics::record_request(parts.method.as_str(), response.status().as_u16(), start_time);
    response
}

async fn echo_with_body(
    request: RequestEcho,
    parts: &Parts,
    body: Body,
    max_body_bytes: usize,
) -> Result<EchoResponse, EchoError> {
    let bytes = axum::body::to_bytes(body, max_body_bytes)
        .await
        .map_err(EchoError::BodyRead)?;

    let media_type = media_type(&parts.headers);
    let repr = classify_body(&bytes, media_type, parts.uri.query())?;
    metrics::record_body_kind(match &repr {
        None if bytes.is_empty() => "empty",
        None => "dropped",
        Some(BodyRepr::Json(_)) => "json",
        Some(BodyRepr::Data(_)) if media_type == FORM_URLENCODED => "form",
        Some(BodyRepr::Data(_)) => "data_uri",
    });

    Ok(EchoResponse::WithBody(BodyEcho { request, body: repr }))
}
