//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! All subsystems produce:
//!     → logging.rs (structured log events)
//!     → metrics.rs (counters, histograms)
//!
//! Consumers:
//!     → Log aggregation (stdout)
//!     → Metrics endpoint (Prometheus scrape, when enabled)
//! ```
//!
//! Each request runs inside a `request` span carrying a UUID v4 request id,
//! so every event emitted while echoing it can be correlated.

pub mod logging;
pub mod metrics;
