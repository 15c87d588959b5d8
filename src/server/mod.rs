//! Server module entry point
//!
//! `start` binds the listener and spawns the accept loop; the returned
//! `RunningServer` handle stops it.

pub mod connection;
pub mod listener;
pub mod signal;

// `loop` is a keyword, so the module is named server_loop
#[path = "loop.rs"]
pub mod server_loop;

use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;
use tokio::sync::Notify;
use tokio::task::JoinHandle;

use crate::config::{AppState, ServerConfig};
use crate::error::ServeError;

pub use listener::create_listener;
pub use server_loop::start_server_loop;
pub use signal::wait_for_shutdown;

/// Handle to a server that is accepting connections
pub struct RunningServer {
    local_addr: SocketAddr,
    state: Arc<AppState>,
    shutdown: Arc<Notify>,
    task: JoinHandle<()>,
}

impl RunningServer {
    /// Address actually bound (resolves port 0 to the assigned port)
    pub const fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Canonical root directory being served
    pub fn root(&self) -> &Path {
        &self.state.root
    }

    /// Close the listening socket and drain open connections
    ///
    /// Returns once the socket is closed and every accepted connection has
    /// ended. A request in progress completes (bounded by
    /// `connection_timeout`); idle keep-alive connections are closed.
    pub async fn stop(self) {
        self.shutdown.notify_one();
        if let Err(e) = self.task.await {
            crate::logger::log_error(&format!("Server loop ended abnormally: {e}"));
        }
    }
}

/// Bind the configured port and start serving
///
/// Must be called from within a Tokio runtime.
pub fn start(config: ServerConfig) -> Result<RunningServer, ServeError> {
    let addr: SocketAddr = format!("{}:{}", config.host, config.port)
        .parse()
        .map_err(|e| ServeError::InvalidAddress(format!("{}:{} ({e})", config.host, config.port)))?;

    let state = Arc::new(AppState::new(config)?);
    let listener = create_listener(addr)?;
    let local_addr = listener
        .local_addr()
        .map_err(|source| ServeError::Bind { addr, source })?;

    let shutdown = Arc::new(Notify::new());
    let task = tokio::spawn(start_server_loop(
        listener,
        Arc::clone(&state),
        Arc::clone(&shutdown),
    ));

    Ok(RunningServer {
        local_addr,
        state,
        shutdown,
        task,
    })
}

/// Stop a running server; see `RunningServer::stop`
pub async fn stop(server: RunningServer) {
    server.stop().await;
}
