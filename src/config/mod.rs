// Configuration module entry point
// Loads layered configuration and derives the immutable ServerConfig

mod state;
mod types;

use std::time::Duration;

// Re-export public types
pub use state::AppState;
pub use types::{
    normalize_extension, Config, HeaderPair, HttpConfig, LoggingConfig, PerformanceConfig,
    ServerConfig, ServerSection, DEFAULT_PORT, REQUIRED_HEADERS,
};

/// Config file consulted when no path is given on the command line
pub const DEFAULT_CONFIG_PATH: &str = "devserver";

impl Config {
    /// Load configuration from specified file path (extension optional)
    /// The file is optional; `DEVSERVER_` environment variables override it
    /// (`DEVSERVER_SERVER__PORT=9000`)
    pub fn load_from(config_path: &str) -> Result<Self, config::ConfigError> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(config_path).required(false))
            .add_source(
                config::Environment::with_prefix("DEVSERVER")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", i64::from(DEFAULT_PORT))?
            .set_default("server.root_directory", ".")?
            .set_default("logging.level", "info")?
            .set_default("logging.access_log", true)?
            .set_default("performance.keep_alive", true)?
            .set_default("performance.connection_timeout", 30)?
            .build()?;

        settings.try_deserialize()
    }

    /// Derive the immutable server configuration; configured headers and
    /// MIME overrides are merged over the built-in defaults
    pub fn to_server_config(&self) -> ServerConfig {
        let mut server = ServerConfig::new(self.server.root_directory.clone(), self.server.port)
            .with_host(self.server.host.clone());

        for header in &self.http.extra_headers {
            server = server.with_header(header.name.clone(), header.value.clone());
        }
        for (ext, content_type) in &self.http.mime_overrides {
            server = server.with_mime_override(ext, content_type.clone());
        }

        server.index_files.clone_from(&self.http.index_files);
        server.keep_alive = self.performance.keep_alive;
        server.connection_timeout = Duration::from_secs(self.performance.connection_timeout);
        server.access_log = self.logging.access_log;
        server
            .access_log_format
            .clone_from(&self.logging.access_log_format);
        server
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults_without_file() {
        let cfg = Config::load_from("/nonexistent/devserver-config").unwrap();
        assert_eq!(cfg.server.port, 8000);
        assert_eq!(cfg.server.host, "0.0.0.0");
        assert_eq!(cfg.http.index_files, vec!["index.html", "index.htm"]);
        assert!(cfg.performance.keep_alive);

        let server = cfg.to_server_config();
        assert_eq!(server.extra_headers.len(), REQUIRED_HEADERS.len());
        assert_eq!(server.connection_timeout, Duration::from_secs(30));
    }

    #[test]
    fn test_load_file_merges_headers_and_overrides() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("devserver.toml");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(
            file,
            r#"
[server]
port = 9001
root_directory = "public"

[logging]
access_log = false
access_log_format = "json"

[http]
index_files = ["main.html"]
mime_overrides = {{ data = "application/x-detector-model" }}

[[http.extra_headers]]
name = "Access-Control-Allow-Origin"
value = "http://localhost:3000"

[[http.extra_headers]]
name = "X-Served-By"
value = "devserver"
"#
        )
        .unwrap();

        let cfg = Config::load_from(path.to_str().unwrap()).unwrap();
        assert_eq!(cfg.server.port, 9001);

        let server = cfg.to_server_config();
        assert_eq!(server.root_directory, std::path::PathBuf::from("public"));
        assert_eq!(server.index_files, vec!["main.html"]);
        assert!(!server.access_log);
        assert_eq!(server.access_log_format, "json");
        assert_eq!(server.extra_headers.len(), 6);
        assert_eq!(server.extra_headers[0].1, "http://localhost:3000");
        assert_eq!(server.extra_headers[5].0, "X-Served-By");
        assert_eq!(
            server.mime_overrides.get("data").unwrap(),
            "application/x-detector-model"
        );
        assert_eq!(server.mime_overrides.get("wasm").unwrap(), "application/wasm");
    }
}
