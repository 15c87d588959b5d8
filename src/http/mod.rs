//! HTTP protocol layer module
//!
//! Content-type resolution, header injection and response builders, kept
//! apart from request routing.

pub mod headers;
pub mod mime;
pub mod response;

// Re-export commonly used types
pub use headers::HeaderInjector;
pub use mime::{resolve_content_type, MimeResolver};
pub use response::{
    build_405_response, build_error_response, build_file_response, build_options_response,
    build_redirect_response,
};
