//! nginx-echo server binary.
//!
//! ```text
//!     nginx ──(X-Nginx-Echo-Host/Ip/Scheme)──▶ net::listener ──▶ http::server
//!                                                                   │
//!                                                                   ▼
//!     client ◀──────────── pretty JSON ◀──────────── echo::describe_request
//! ```

use std::path::PathBuf;

use clap::Parser;

use nginx_echo::config::{load_config, validate_config, ConfigError, EchoConfig};
use nginx_echo::lifecycle::startup;
use nginx_echo::observability::logging;

#[derive(Parser, Debug)]
#[command(name = "nginx-echo", version, about = "Echo HTTP requests back as JSON")]
struct Cli {
    /// Path to a TOML configuration file; defaults are used when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override `listener.bind_address`.
    #[arg(short, long)]
    bind: Option<String>,
}

fn resolve_config(cli: &Cli) -> Result<EchoConfig, ConfigError> {
    let mut config = match &cli.config {
        Some(path) => load_config(path)?,
        None => EchoConfig::default(),
    };

    if let Some(bind) = &cli.bind {
        config.listener.bind_address = bind.clone();
        validate_config(&config).map_err(ConfigError::Validation)?;
    }

    Ok(config)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = resolve_config(&cli)?;

    logging::init_logging(&config.observability);

    tracing::info!("nginx-echo v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        bind_address = %config.listener.bind_address,
        max_connections = config.listener.max_connections,
        max_body_bytes = config.limits.max_body_bytes,
        read_timeout_secs = config.timeouts.read_secs,
        "Configuration loaded"
    );

    startup::start(config).await?;
    Ok(())
}
