//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → EchoConfig (validated, immutable)
//!     → handed to the HTTP server at construction time
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; changes require a restart
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, parse_config, ConfigError};
pub use schema::EchoConfig;
pub use schema::ListenerConfig;
pub use schema::LimitsConfig;
pub use schema::TimeoutConfig;
pub use schema::TrustedHeadersConfig;
pub use schema::ObservabilityConfig;
pub use validation::{validate_config, ValidationError};
