//! MIME type detection module
//!
//! Returns the Content-Type for a request path: configured overrides win,
//! then the standard extension table, then a generic binary type.

use std::collections::HashMap;
use std::path::Path;

use crate::config::normalize_extension;

pub const FALLBACK_CONTENT_TYPE: &str = "application/octet-stream";

/// Resolve the Content-Type of `path`
///
/// Only the path's extension is consulted, never the file contents.
///
/// # Examples
/// ```
/// use std::collections::HashMap;
/// use wasm_devserver::http::mime::resolve_content_type;
///
/// let overrides = HashMap::from([("wasm".to_string(), "application/wasm".to_string())]);
/// assert_eq!(resolve_content_type("/detector.wasm", &overrides), "application/wasm");
/// assert_eq!(resolve_content_type("/index.html", &overrides), "text/html");
/// assert_eq!(resolve_content_type("/blob", &overrides), "application/octet-stream");
/// ```
pub fn resolve_content_type(path: impl AsRef<Path>, overrides: &HashMap<String, String>) -> String {
    let path = path.as_ref();

    if let Some(ext) = path.extension().and_then(|e| e.to_str()) {
        if let Some(content_type) = overrides.get(&normalize_extension(ext)) {
            return content_type.clone();
        }
    }

    mime_guess::from_path(path)
        .first_raw()
        .unwrap_or(FALLBACK_CONTENT_TYPE)
        .to_string()
}

/// Content-type strategy owned by the server state
#[derive(Debug, Clone, Default)]
pub struct MimeResolver {
    overrides: HashMap<String, String>,
}

impl MimeResolver {
    /// Keys are normalized the same way `ServerConfig` normalizes them
    pub fn new(overrides: HashMap<String, String>) -> Self {
        let overrides = overrides
            .into_iter()
            .map(|(ext, content_type)| (normalize_extension(&ext), content_type))
            .collect();
        Self { overrides }
    }

    pub fn resolve(&self, path: impl AsRef<Path>) -> String {
        resolve_content_type(path, &self.overrides)
    }
}
