//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with the echo endpoint
//! - Configure HTTP/1.1 and HTTP/2 support (header limits, header deadline)
//! - Wire up middleware (tracing, request deadline, HEAD handling)
//! - Serve connections accepted from the bounded listener
//! - Drain connections on shutdown

use axum::{extract::Request, Router};
use hyper::body::Incoming;
use hyper_util::{
    rt::{TokioExecutor, TokioIo, TokioTimer},
    server::conn::auto,
};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast;
use tower::ServiceExt;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};
use uuid::Uuid;

use crate::config::{validate_config, ConfigError, EchoConfig};
use crate::echo::TrustedHeaders;
use crate::http::handler::{echo_handler, EchoState};
use crate::http::head::HeadBodyLayer;
use crate::net::connection::ConnectionTracker;
use crate::net::listener::{Listener, ListenerError};

/// HTTP server for the echo service.
pub struct HttpServer {
    router: Router,
    config: EchoConfig,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    pub fn new(config: EchoConfig) -> Result<Self, ConfigError> {
        validate_config(&config).map_err(ConfigError::Validation)?;

        let trusted = TrustedHeaders::try_from(&config.trusted_headers)
            .map_err(ConfigError::HeaderName)?;
        let state = EchoState {
            trusted: Arc::new(trusted),
            max_body_bytes: config.limits.max_body_bytes,
        };

        let router = Self::build_router(&config, state);
        Ok(Self { router, config })
    }

    /// Build the Axum router with all middleware layers.
    ///
    /// Any method on any path reaches the echo handler. HEAD bodies are
    /// already dropped by the router itself; `HeadBodyLayer` keeps that
    /// contract stated at the service boundary.
    #[allow(deprecated)]
    fn build_router(config: &EchoConfig, state: EchoState) -> Router {
        Router::new()
            .fallback(echo_handler)
            .with_state(state)
            .layer(HeadBodyLayer)
            .layer(TimeoutLayer::new(Duration::from_secs(config.timeouts.read_secs)))
            .layer(TraceLayer::new_for_http().make_span_with(|request: &Request| {
                tracing::info_span!(
                    "request",
                    request_id = %Uuid::new_v4(),
                    method = %request.method(),
                    uri = %request.uri(),
                )
            }))
    }

    /// Connection builder honouring the header size and deadline limits.
    fn connection_builder(&self) -> auto::Builder<TokioExecutor> {
        let limits = &self.config.limits;
        let mut builder = auto::Builder::new(TokioExecutor::new());
        builder
            .http1()
            .timer(TokioTimer::new())
            .header_read_timeout(Duration::from_secs(self.config.timeouts.header_read_secs))
            .max_buf_size(limits.max_header_bytes);
        builder
            .http2()
            .timer(TokioTimer::new())
            .max_header_list_size(u32::try_from(limits.max_header_bytes).unwrap_or(u32::MAX));
        builder
    }

    /// Run the server until `shutdown` fires, then drain open connections.
    pub async fn run(
        self,
        listener: Listener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        let builder = self.connection_builder();
        let tracker = ConnectionTracker::new();

        loop {
            let (stream, peer_addr, permit) = tokio::select! {
                accepted = listener.accept() => match accepted {
                    Ok(accepted) => accepted,
                    Err(ListenerError::Closed) => break,
                    Err(e) => {
                        tracing::warn!(error = %e, "Accept failed");
                        continue;
                    }
                },
                _ = shutdown.recv() => break,
            };

            let guard = tracker.track();
            let tower_service = self.router.clone();
            let builder = builder.clone();
            let mut connection_shutdown = shutdown.resubscribe();

            tokio::spawn(async move {
                let _permit = permit;
                let socket = TokioIo::new(stream);
                let hyper_service = hyper::service::service_fn(move |request: Request<Incoming>| {
                    tower_service.clone().oneshot(request)
                });

                let conn = builder.serve_connection(socket, hyper_service);
                tokio::pin!(conn);

                let result = tokio::select! {
                    res = conn.as_mut() => res,
                    _ = connection_shutdown.recv() => {
                        conn.as_mut().graceful_shutdown();
                        conn.as_mut().await
                    }
                };

                if let Err(err) = result {
                    tracing::debug!(
                        connection_id = %guard.id(),
                        peer_addr = %peer_addr,
                        error = %err,
                        "Connection closed with error"
                    );
                }
            });
        }

        tracing::info!(
            active_connections = tracker.active_count(),
            "Draining connections"
        );
        let grace = Duration::from_secs(self.config.timeouts.shutdown_grace_secs);
        if tokio::time::timeout(grace, tracker.wait_for_shutdown()).await.is_err() {
            tracing::warn!(
                remaining = tracker.active_count(),
                "Shutdown grace period elapsed with connections still open"
            );
        }

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// The fully layered router, for driving the service in-process.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &EchoConfig {
        &self.config
    }
}
