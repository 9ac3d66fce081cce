//! Shared utilities for integration testing.

use std::net::SocketAddr;

use nginx_echo::config::EchoConfig;
use nginx_echo::http::HttpServer;
use nginx_echo::lifecycle::Shutdown;
use nginx_echo::net::listener::Listener;

/// A running echo server bound to an ephemeral port.
pub struct TestServer {
    pub addr: SocketAddr,
    pub shutdown: Shutdown,
}

impl TestServer {
    pub fn url(&self, path_and_query: &str) -> String {
        format!("http://{}{}", self.addr, path_and_query)
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.shutdown.trigger();
    }
}

/// Start an echo server with `config`, overriding its bind address.
pub async fn spawn_server(mut config: EchoConfig) -> TestServer {
    config.listener.bind_address = "127.0.0.1:0".into();

    let server = HttpServer::new(config).unwrap();
    let listener = Listener::bind(&server.config().listener).await.unwrap();
    let addr = listener.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    tokio::spawn(async move {
        let _ = server.run(listener, server_shutdown).await;
    });

    TestServer { addr, shutdown }
}

/// Start an echo server with the default configuration.
#[allow(dead_code)]
pub async fn spawn_default_server() -> TestServer {
    spawn_server(EchoConfig::default()).await
}
