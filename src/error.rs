//! Error taxonomy
//!
//! Startup errors (`Bind`, `InvalidAddress`, `InvalidHeader`, `RootDirectory`)
//! abort the server. Per-request errors (`NotFound`, `Forbidden`, `Io`) are
//! turned into HTTP statuses by the request handler.

use hyper::StatusCode;
use std::fmt;
use std::io;
use std::net::SocketAddr;
use std::path::PathBuf;

#[derive(Debug)]
pub enum ServeError {
    /// Listening socket could not be bound (port in use, no permission)
    Bind { addr: SocketAddr, source: io::Error },
    /// Host/port pair does not form a socket address
    InvalidAddress(String),
    /// Configured extra header is not a valid HTTP header
    InvalidHeader { name: String, reason: String },
    /// Root directory is missing or inaccessible
    RootDirectory { path: PathBuf, source: io::Error },
    /// No such file, or the path escapes the root directory
    NotFound,
    /// Directory without an index file
    Forbidden,
    /// Disk read failure while serving a request
    Io(io::Error),
}

impl ServeError {
    /// HTTP status reported to the client for this error
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::Forbidden => StatusCode::FORBIDDEN,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl fmt::Display for ServeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bind { addr, source } => write!(f, "failed to bind {addr}: {source}"),
            Self::InvalidAddress(addr) => write!(f, "invalid listen address: {addr}"),
            Self::InvalidHeader { name, reason } => {
                write!(f, "invalid header '{name}': {reason}")
            }
            Self::RootDirectory { path, source } => {
                write!(f, "root directory '{}' is not accessible: {source}", path.display())
            }
            Self::NotFound => f.write_str("not found"),
            Self::Forbidden => f.write_str("forbidden"),
            Self::Io(e) => write!(f, "i/o error: {e}"),
        }
    }
}

impl std::error::Error for ServeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Bind { source, .. } | Self::RootDirectory { source, .. } => Some(source),
            Self::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for ServeError {
    fn from(e: io::Error) -> Self {
        match e.kind() {
            io::ErrorKind::NotFound => Self::NotFound,
            _ => Self::Io(e),
        }
    }
}
