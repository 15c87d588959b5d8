// Application state module
// Read-only state shared by every connection once the server has started

use std::path::PathBuf;

use super::types::ServerConfig;
use crate::error::ServeError;
use crate::http::{HeaderInjector, MimeResolver};

/// Application state
pub struct AppState {
    pub config: ServerConfig,
    /// Canonical form of `config.root_directory`
    pub root: PathBuf,
    pub headers: HeaderInjector,
    pub mime: MimeResolver,
}

impl AppState {
    /// Resolve the root directory and compile the response policy
    pub fn new(config: ServerConfig) -> Result<Self, ServeError> {
        let root = config
            .root_directory
            .canonicalize()
            .map_err(|source| ServeError::RootDirectory {
                path: config.root_directory.clone(),
                source,
            })?;
        if !root.is_dir() {
            return Err(ServeError::RootDirectory {
                path: config.root_directory.clone(),
                source: std::io::Error::other("not a directory"),
            });
        }

        let headers = HeaderInjector::new(&config.extra_headers)?;
        let mime = MimeResolver::new(config.mime_overrides.clone());

        Ok(Self {
            config,
            root,
            headers,
            mime,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_root_rejected() {
        let cfg = ServerConfig::new("/definitely/not/a/real/root", 0);
        let err = AppState::new(cfg).err().unwrap();
        assert!(matches!(err, ServeError::RootDirectory { .. }));
    }

    #[test]
    fn test_file_as_root_rejected() {
        let file = tempfile::NamedTempFile::new().unwrap();
        let err = AppState::new(ServerConfig::new(file.path(), 0)).err().unwrap();
        assert!(matches!(err, ServeError::RootDirectory { .. }));
    }

    #[test]
    fn test_invalid_header_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = ServerConfig::new(dir.path(), 0).with_header("Bad Header", "x");
        let err = AppState::new(cfg).err().unwrap();
        assert!(matches!(err, ServeError::InvalidHeader { .. }));
    }

    #[test]
    fn test_root_is_canonical() {
        let dir = tempfile::tempdir().unwrap();
        let state = AppState::new(ServerConfig::new(dir.path().join("."), 0)).unwrap();
        assert_eq!(state.root, dir.path().canonicalize().unwrap());
    }
}
