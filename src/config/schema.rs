//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the echo service.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Root configuration for the echo service.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct EchoConfig {
    /// Listener configuration (bind address, connection cap).
    pub listener: ListenerConfig,

    /// Request size limits.
    pub limits: LimitsConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Names of the headers the fronting proxy uses to forward client metadata.
    pub trusted_headers: TrustedHeadersConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "127.0.0.1:7777").
    pub bind_address: String,

    /// Maximum concurrent connections (backpressure).
    pub max_connections: usize,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "127.0.0.1:7777".to_string(),
            max_connections: 10_000,
        }
    }
}

/// Request size limits.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LimitsConfig {
    /// Largest request body that will be buffered, in bytes.
    pub max_body_bytes: usize,

    /// Largest accepted header block, in bytes.
    pub max_header_bytes: usize,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_body_bytes: 1_048_576,
            max_header_bytes: 16 * 1024, // 16kb
        }
    }
}

/// Timeout configuration for the inbound side.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Deadline for receiving the request head, in seconds.
    pub header_read_secs: u64,

    /// Deadline for handling the whole request, in seconds.
    pub read_secs: u64,

    /// How long in-flight connections may drain on shutdown, in seconds.
    pub shutdown_grace_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            header_read_secs: 1,
            read_secs: 5,
            shutdown_grace_secs: 10,
        }
    }
}

/// Header names carrying the client-visible host, IP and scheme.
///
/// These are set by the trusted reverse proxy in front of the service and
/// are never echoed back.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TrustedHeadersConfig {
    pub host: String,
    pub ip: String,
    pub scheme: String,
}

impl Default for TrustedHeadersConfig {
    fn default() -> Self {
        Self {
            host: "X-Nginx-Echo-Host".to_string(),
            ip: "X-Nginx-Echo-Ip".to_string(),
            scheme: "X-Nginx-Echo-Scheme".to_string(),
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: false,
            metrics_address: "127.0.0.1:9090".to_string(),
        }
    }
}
