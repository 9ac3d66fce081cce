//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (startup.rs):
//!     Validated config → Metrics exporter → Bind listener → Serve
//!
//! Shutdown (shutdown.rs):
//!     Trigger → Stop accepting → Drain connections → Exit
//!
//! Signals (signals.rs):
//!     SIGTERM/SIGINT → Trigger graceful shutdown
//! ```
//!
//! Shutdown is bounded: connections still open after
//! `timeouts.shutdown_grace_secs` are abandoned.

pub mod shutdown;
pub mod signals;
pub mod startup;

pub use shutdown::Shutdown;
