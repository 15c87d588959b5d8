// Connection handling module
// Serves one accepted TCP connection in its own task

use hyper::body::Body;
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper::{Request, Version};
use hyper_util::rt::TokioIo;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::watch;

use crate::config::AppState;
use crate::handler;
use crate::logger::{self, AccessLogEntry, LogFormat};

/// Serve a single accepted connection until it closes.
///
/// The connection is driven by hyper's HTTP/1 driver with keep-alive as
/// configured and is bounded by `connection_timeout` (zero means unbounded).
/// Once `drain` changes the connection shuts down gracefully: a request in
/// progress completes, then the socket is closed instead of kept alive.
pub async fn serve_connection(
    stream: tokio::net::TcpStream,
    peer_addr: SocketAddr,
    state: Arc<AppState>,
    mut drain: watch::Receiver<bool>,
) {
    logger::log_connection_accepted(&peer_addr);

    let io = TokioIo::new(stream);
    let timeout_duration = state.config.connection_timeout;

    let mut builder = http1::Builder::new();
    builder.keep_alive(state.config.keep_alive);

    let service_state = Arc::clone(&state);
    let conn = builder.serve_connection(
        io,
        service_fn(move |req| serve_logged(req, peer_addr, Arc::clone(&service_state))),
    );

    let driven = async move {
        let mut conn = std::pin::pin!(conn);
        let mut draining = false;
        loop {
            tokio::select! {
                res = conn.as_mut() => break res,
                _ = drain.changed(), if !draining => {
                    draining = true;
                    conn.as_mut().graceful_shutdown();
                }
            }
        }
    };

    // Zero disables the limit
    let result = if timeout_duration.is_zero() {
        Ok(driven.await)
    } else {
        tokio::time::timeout(timeout_duration, driven).await
    };

    match result {
        Ok(Ok(())) => {}
        Ok(Err(err)) => logger::log_connection_error(&err),
        Err(_) => {
            logger::log_debug(&format!(
                "Connection from {peer_addr} closed after {} seconds",
                timeout_duration.as_secs()
            ));
        }
    }
}

/// Run the request handler and write one access log line
async fn serve_logged<B>(
    req: Request<B>,
    peer_addr: SocketAddr,
    state: Arc<AppState>,
) -> Result<hyper::Response<http_body_util::Full<hyper::body::Bytes>>, std::convert::Infallible> {
    if !state.config.access_log {
        return handler::handle_request(req, state).await;
    }

    let started = Instant::now();
    let mut entry = access_entry(&req, peer_addr);
    let format = LogFormat::parse(&state.config.access_log_format);

    let response = handler::handle_request(req, state).await?;

    entry.status = response.status().as_u16();
    entry.body_bytes = response.body().size_hint().exact().unwrap_or(0);
    entry.request_time_us = u64::try_from(started.elapsed().as_micros()).unwrap_or(u64::MAX);
    logger::log_access(&entry, &format);

    Ok(response)
}

fn access_entry<B>(req: &Request<B>, peer_addr: SocketAddr) -> AccessLogEntry {
    let header = |name: &str| {
        req.headers()
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(ToString::to_string)
    };

    let mut entry = AccessLogEntry::new(
        peer_addr.to_string(),
        req.method().to_string(),
        req.uri().path().to_string(),
    );
    entry.query = req.uri().query().map(ToString::to_string);
    entry.http_version = match req.version() {
        Version::HTTP_10 => "1.0",
        Version::HTTP_2 => "2",
        _ => "1.1",
    }
    .to_string();
    entry.referer = header("referer");
    entry.user_agent = header("user-agent");
    entry
}
