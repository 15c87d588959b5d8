// Signal handling module
//
// - SIGINT  (Ctrl+C): graceful shutdown, all platforms
// - SIGTERM:          graceful shutdown, Unix only

/// Resolve once the process is asked to stop
#[cfg(unix)]
pub async fn wait_for_shutdown() -> std::io::Result<()> {
    use tokio::signal::unix::{signal, SignalKind};

    let mut sigterm = signal(SignalKind::terminate())?;
    let mut sigint = signal(SignalKind::interrupt())?;

    tokio::select! {
        _ = sigterm.recv() => crate::logger::log_debug("SIGTERM received"),
        _ = sigint.recv() => crate::logger::log_debug("SIGINT received"),
    }
    Ok(())
}

/// Windows fallback - only handles Ctrl+C
#[cfg(not(unix))]
pub async fn wait_for_shutdown() -> std::io::Result<()> {
    tokio::signal::ctrl_c().await?;
    crate::logger::log_debug("Ctrl+C received");
    Ok(())
}
