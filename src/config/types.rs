// Configuration types module
// Defines the file-level configuration sections and the immutable ServerConfig

use serde::Deserialize;
use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;

/// Headers attached to every response unless overridden by name
pub const REQUIRED_HEADERS: [(&str, &str); 5] = [
    ("Access-Control-Allow-Origin", "*"),
    ("Access-Control-Allow-Methods", "GET, POST, OPTIONS"),
    ("Access-Control-Allow-Headers", "Content-Type"),
    ("Cross-Origin-Embedder-Policy", "require-corp"),
    ("Cross-Origin-Opener-Policy", "same-origin"),
];

pub const DEFAULT_PORT: u16 = 8000;

/// Main configuration structure, as loaded from file and environment
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerSection,
    pub logging: LoggingConfig,
    pub performance: PerformanceConfig,
    #[serde(default)]
    pub http: HttpConfig,
}

/// Listening socket and document root
#[derive(Debug, Deserialize, Clone)]
pub struct ServerSection {
    pub host: String,
    pub port: u16,
    pub root_directory: PathBuf,
    pub workers: Option<usize>,
}

/// Logging configuration
#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    pub level: String,
    pub access_log: bool,
    /// Access log format (combined, common, json, or custom pattern)
    #[serde(default = "default_access_log_format")]
    pub access_log_format: String,
    /// Access log file path (optional, stdout if not set)
    #[serde(default)]
    pub access_log_file: Option<String>,
    /// Error log file path (optional, stderr if not set)
    #[serde(default)]
    pub error_log_file: Option<String>,
}

#[allow(clippy::missing_const_for_fn)]
fn default_access_log_format() -> String {
    "combined".to_string()
}

/// Connection handling
#[derive(Debug, Deserialize, Clone)]
pub struct PerformanceConfig {
    pub keep_alive: bool,
    /// Upper bound on a single connection's lifetime, in seconds
    pub connection_timeout: u64,
}

/// Response policy: index files, extra headers and MIME overrides
#[derive(Debug, Deserialize, Clone)]
pub struct HttpConfig {
    #[serde(default = "default_index_files")]
    pub index_files: Vec<String>,
    /// Merged over `REQUIRED_HEADERS`
    #[serde(default)]
    pub extra_headers: Vec<HeaderPair>,
    /// Merged over the built-in `wasm` override
    #[serde(default)]
    pub mime_overrides: HashMap<String, String>,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            index_files: default_index_files(),
            extra_headers: Vec::new(),
            mime_overrides: HashMap::new(),
        }
    }
}

fn default_index_files() -> Vec<String> {
    vec!["index.html".to_string(), "index.htm".to_string()]
}

/// One configured response header
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct HeaderPair {
    pub name: String,
    pub value: String,
}

/// Immutable configuration handed to `server::start`
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub root_directory: PathBuf,
    /// Ordered; appended to every response after the content headers
    pub extra_headers: Vec<(String, String)>,
    /// Extension (lowercase, no leading dot) -> content type
    pub mime_overrides: HashMap<String, String>,
    pub index_files: Vec<String>,
    pub keep_alive: bool,
    pub connection_timeout: Duration,
    pub access_log: bool,
    pub access_log_format: String,
}

impl ServerConfig {
    /// Defaults for a root directory and port: all interfaces, the required
    /// header set and the `wasm` override
    pub fn new(root_directory: impl Into<PathBuf>, port: u16) -> Self {
        let mut config = Self {
            host: "0.0.0.0".to_string(),
            port,
            root_directory: root_directory.into(),
            extra_headers: Vec::new(),
            mime_overrides: HashMap::new(),
            index_files: default_index_files(),
            keep_alive: true,
            connection_timeout: Duration::from_secs(30),
            access_log: true,
            access_log_format: default_access_log_format(),
        };
        for (name, value) in REQUIRED_HEADERS {
            config = config.with_header(name, value);
        }
        config.with_mime_override("wasm", "application/wasm")
    }

    #[must_use]
    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = host.into();
        self
    }

    /// Add a response header; an existing header of the same name
    /// (case-insensitive) keeps its position and takes the new value
    #[must_use]
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        let name = name.into();
        let value = value.into();
        if let Some(existing) = self
            .extra_headers
            .iter_mut()
            .find(|(n, _)| n.eq_ignore_ascii_case(&name))
        {
            existing.1 = value;
        } else {
            self.extra_headers.push((name, value));
        }
        self
    }

    /// Add a content-type override; `".wasm"`, `"wasm"` and `"WASM"` name the
    /// same extension
    #[must_use]
    pub fn with_mime_override(
        mut self,
        extension: impl AsRef<str>,
        content_type: impl Into<String>,
    ) -> Self {
        self.mime_overrides
            .insert(normalize_extension(extension.as_ref()), content_type.into());
        self
    }
}

pub fn normalize_extension(extension: &str) -> String {
    extension.trim_start_matches('.').to_ascii_lowercase()
}
