//! HEAD response handling.
//!
//! [`HeadBodyLayer`] wraps a service and, for HEAD requests only, lets the
//! inner service compute its full response, then drops the payload. Status
//! and headers pass through untouched; the computed body size is kept in
//! `Content-Length` when the inner service did not already set it.
//!
//! Axum's router already strips HEAD bodies from the routes it serves, so
//! behind [`HttpServer`](crate::http::HttpServer) this layer finds an empty
//! body with `Content-Length` set and passes the response through. It holds
//! the HEAD contract for any service it wraps, router or not.

use std::task::{Context, Poll};

use axum::body::Body;
use axum::http::{header::CONTENT_LENGTH, HeaderValue, Method, Request, Response};
use futures_util::future::BoxFuture;
use http_body_util::BodyExt;
use tower::{Layer, Service};

/// Layer that applies [`HeadBody`].
#[derive(Debug, Clone, Copy, Default)]
pub struct HeadBodyLayer;

impl<S> Layer<S> for HeadBodyLayer {
    type Service = HeadBody<S>;

    fn layer(&self, inner: S) -> Self::Service {
        HeadBody { inner }
    }
}

/// Middleware that discards response bodies of HEAD requests.
#[derive(Debug, Clone)]
pub struct HeadBody<S> {
    inner: S,
}

impl<S, ReqBody> Service<Request<ReqBody>> for HeadBody<S>
where
    S: Service<Request<ReqBody>, Response = Response<Body>>,
    S::Future: Send + 'static,
    S::Error: Send + 'static,
{
    type Response = Response<Body>;
    type Error = S::Error;
    type Future = BoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, request: Request<ReqBody>) -> Self::Future {
        let is_head = *request.method() == Method::HEAD;
        let future = self.inner.call(request);

        Box::pin(async move {
            let response = future.await?;
            if !is_head {
                return Ok(response);
            }
            Ok(discard_body(response).await)
        })
    }
}

async fn discard_body(response: Response<Body>) -> Response<Body> {
    let (mut parts, body) = response.into_parts();

    let size = match body.collect().await {
        Ok(collected) => collected.to_bytes().len(),
        Err(err) => {
            tracing::warn!(error = %err, "Failed to drain HEAD response body");
            0
        }
    };

    if size > 0 && !parts.headers.contains_key(CONTENT_LENGTH) {
        parts.headers.insert(CONTENT_LENGTH, HeaderValue::from(size));
    }
    tracing::trace!(status = %parts.status, size, "Discarded HEAD response body");

    Response::from_parts(parts, Body::empty())
}
