//! nginx-echo: a diagnostic HTTP echo service meant to sit behind nginx.
//!
//! Every request is answered with a pretty-printed JSON description of what
//! arrived: the origin nginx reported through its trusted headers, the
//! method, headers, reconstructed URL, query parameters and, for body
//! carrying methods, the decoded body.

pub mod config;
pub mod echo;
pub mod http;
pub mod lifecycle;
pub mod net;
pub mod observability;

pub use config::schema::EchoConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
