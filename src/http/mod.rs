//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (hyper connection builder, Axum router, middleware)
//!     → head.rs (HEAD requests: response computed, payload discarded)
//!     → handler.rs (body ceiling, method dispatch)
//!     → echo subsystem (describe, classify, render)
//!     → Send to client
//! ```

pub mod handler;
pub mod head;
pub mod server;

pub use handler::EchoState;
pub use head::{HeadBody, HeadBodyLayer};
pub use server::HttpServer;
