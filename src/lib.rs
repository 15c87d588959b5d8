//! Development static file server
//!
//! Serves a directory over HTTP/1.1 with CORS and cross-origin isolation
//! headers on every response, and `application/wasm` for `.wasm` files, so
//! browser WebAssembly applications can be exercised locally.

pub mod config;
pub mod error;
pub mod handler;
pub mod http;
pub mod logger;
pub mod server;

pub use config::{Config, ServerConfig};
pub use error::ServeError;
pub use handler::handle_request;
pub use http::resolve_content_type;
pub use server::{start, stop, RunningServer};
