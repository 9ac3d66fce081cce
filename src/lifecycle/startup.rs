//! Startup orchestration.
//!
//! Subsystems come up in order and any failure is fatal: the server first
//! (which validates its config), then the metrics exporter, and the
//! listener last so traffic only arrives once everything is ready.

use std::net::SocketAddr;

use thiserror::Error;

use crate::config::{ConfigError, EchoConfig};
use crate::http::HttpServer;
use crate::lifecycle::{signals, Shutdown};
use crate::net::listener::{Listener, ListenerError};
use crate::observability::metrics;

/// Fatal errors raised before or while serving.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),
    #[error("listener error: {0}")]
    Listener(#[from] ListenerError),
    #[error("invalid metrics address {0:?}")]
    MetricsAddress(String),
    #[error("failed to start metrics exporter: {0}")]
    Metrics(#[from] metrics_exporter_prometheus::BuildError),
    #[error("server error: {0}")]
    Io(#[from] std::io::Error),
}

/// Run the echo server until SIGINT or SIGTERM, then drain and return.
pub async fn start(config: EchoConfig) -> Result<(), StartupError> {
    let shutdown = Shutdown::new();

    let signal_shutdown = shutdown.clone();
    tokio::spawn(async move {
        signals::wait_for_signal().await;
        signal_shutdown.trigger();
    });

    serve(config, &shutdown).await
}

/// Bring up every subsystem and serve until `shutdown` is triggered.
pub async fn serve(config: EchoConfig, shutdown: &Shutdown) -> Result<(), StartupError> {
    let server = HttpServer::new(config)?;

    let config = server.config();
    if config.observability.metrics_enabled {
        let metrics_address = &config.observability.metrics_address;
        let addr: SocketAddr = metrics_address
            .parse()
            .map_err(|_| StartupError::MetricsAddress(metrics_address.clone()))?;
        metrics::init_metrics(addr)?;
    }

    let listener = Listener::bind(&config.listener).await?;

    server.run(listener, shutdown.subscribe()).await?;
    tracing::info!("Shutdown complete");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn invalid_config_fails_before_binding() {
        let mut config = EchoConfig::default();
        config.limits.max_body_bytes = 0;

        let err = serve(config, &Shutdown::new()).await.unwrap_err();
        assert!(matches!(err, StartupError::Config(_)));
    }

    #[tokio::test]
    async fn occupied_port_is_listener_error() {
        let taken = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let mut config = EchoConfig::default();
        config.listener.bind_address = taken.local_addr().unwrap().to_string();

        let err = serve(config, &Shutdown::new()).await.unwrap_err();
        assert!(matches!(err, StartupError::Listener(_)));
    }

    #[tokio::test]
    async fn serves_until_triggered() {
        let mut config = EchoConfig::default();
        config.listener.bind_address = "127.0.0.1:0".into();
        let shutdown = Shutdown::new();

        let trigger = shutdown.clone();
        tokio::spawn(async move {
            while trigger.receiver_count() == 0 {
                tokio::time::sleep(std::time::Duration::from_millis(10)).await;
            }
            trigger.trigger();
        });

        serve(config, &shutdown).await.unwrap();
    }
}
