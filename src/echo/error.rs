//! Failures while interpreting a request body.
//!
//! Every variant is the client's fault and maps to `400 Bad Request`; the
//! echo response is replaced entirely by an [`ErrorResponse`].

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use crate::echo::body::FormError;
use crate::echo::response::{render_json, ErrorResponse};

#[derive(Debug, thiserror::Error)]
pub enum EchoError {
    /// Transport failure or size-limit violation while buffering the body.
    #[error("failed to read request body: {0}")]
    BodyRead(#[source] axum::Error),

    #[error("invalid JSON body: {0}")]
    JsonDecode(#[from] serde_json::Error),

    #[error("invalid form body: {0}")]
    FormParse(#[from] FormError),
}

impl EchoError {
    pub fn status(&self) -> StatusCode {
        StatusCode::BAD_REQUEST
    }

    pub fn to_error_response(&self) -> ErrorResponse {
        ErrorResponse::new(self.status(), Some(self.to_string()))
    }
}

impl IntoResponse for EchoError {
    fn into_response(self) -> Response {
        tracing::debug!(error = %self, "Rejecting request body");
        render_json(self.status(), &self.to_error_response())
    }
}
