//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (timeouts > 0, limits usable by the codec)
//! - Check that trusted header names are well-formed and distinct
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: EchoConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;

use axum::http::HeaderName;

use crate::config::schema::EchoConfig;

/// Smallest read buffer the HTTP/1 codec accepts.
pub const MIN_HEADER_BYTES: usize = 8192;

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// A single semantic problem found in a configuration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("{field}: invalid socket address {value:?}")]
    InvalidAddress { field: &'static str, value: String },

    #[error("{field} must be greater than zero")]
    Zero { field: &'static str },

    #[error("limits.max_header_bytes must be at least {min}, got {value}")]
    HeaderLimitTooSmall { min: usize, value: usize },

    #[error("trusted_headers.{field}: invalid header name {value:?}")]
    InvalidHeaderName { field: &'static str, value: String },

    #[error("trusted_headers: {name:?} is configured more than once")]
    DuplicateHeaderName { name: String },

    #[error("observability.log_level: unknown level {0:?}")]
    UnknownLogLevel(String),
}

/// Check a configuration for semantic problems.
pub fn validate_config(config: &EchoConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidAddress {
            field: "listener.bind_address",
            value: config.listener.bind_address.clone(),
        });
    }
    if config.listener.max_connections == 0 {
        errors.push(ValidationError::Zero { field: "listener.max_connections" });
    }

    if config.limits.max_body_bytes == 0 {
        errors.push(ValidationError::Zero { field: "limits.max_body_bytes" });
    }
    if config.limits.max_header_bytes < MIN_HEADER_BYTES {
        errors.push(ValidationError::HeaderLimitTooSmall {
            min: MIN_HEADER_BYTES,
            value: config.limits.max_header_bytes,
        });
    }

    if config.timeouts.header_read_secs == 0 {
        errors.push(ValidationError::Zero { field: "timeouts.header_read_secs" });
    }
    if config.timeouts.read_secs == 0 {
        errors.push(ValidationError::Zero { field: "timeouts.read_secs" });
    }

    let trusted = &config.trusted_headers;
    let mut seen: Vec<HeaderName> = Vec::with_capacity(3);
    let names = [
        ("host", &trusted.host),
        ("ip", &trusted.ip),
        ("scheme", &trusted.scheme),
    ];
    for (field, value) in names {
        match HeaderName::from_bytes(value.as_bytes()) {
            Ok(name) if seen.contains(&name) => {
                errors.push(ValidationError::DuplicateHeaderName { name: value.clone() });
            }
            Ok(name) => seen.push(name),
            Err(_) => errors.push(ValidationError::InvalidHeaderName {
                field,
                value: value.clone(),
            }),
        }
    }

    let observability = &config.observability;
    if !LOG_LEVELS.contains(&observability.log_level.to_ascii_lowercase().as_str()) {
        errors.push(ValidationError::UnknownLogLevel(observability.log_level.clone()));
    }
    if observability.metrics_enabled
        && observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::InvalidAddress {
            field: "observability.metrics_address",
            value: observability.metrics_address.clone(),
        });
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
