// Server loop module
// Accepts connections until the shutdown signal fires, then closes the
// listener and drains the connections already accepted

use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::{watch, Notify};
use tokio::task::{JoinError, JoinSet};

use super::connection::serve_connection;
use crate::config::AppState;
use crate::logger;

/// Accept loop
///
/// Each accepted connection is served in its own task. On shutdown the
/// listener is dropped, open connections are told to finish their current
/// request and close, and the loop returns once all of them have ended.
pub async fn start_server_loop(listener: TcpListener, state: Arc<AppState>, shutdown: Arc<Notify>) {
    let (drain_tx, drain_rx) = watch::channel(false);
    let mut connections = JoinSet::new();

    loop {
        tokio::select! {
            accept_result = listener.accept() => {
                match accept_result {
                    Ok((stream, peer_addr)) => {
                        connections.spawn(serve_connection(
                            stream,
                            peer_addr,
                            Arc::clone(&state),
                            drain_rx.clone(),
                        ));
                    }
                    Err(e) => logger::log_error(&format!("Failed to accept connection: {e}")),
                }
            }

            Some(joined) = connections.join_next() => log_join(joined),

            () = shutdown.notified() => {
                logger::log_debug("Shutdown requested, closing listener");
                break;
            }
        }
    }

    drop(listener);
    drain_tx.send_replace(true);

    if !connections.is_empty() {
        logger::log_debug(&format!(
            "Waiting for {} open connection(s) to finish",
            connections.len()
        ));
    }
    while let Some(joined) = connections.join_next().await {
        log_join(joined);
    }
}

fn log_join(joined: Result<(), JoinError>) {
    if let Err(e) = joined {
        logger::log_error(&format!("Connection task ended abnormally: {e}"));
    }
}
