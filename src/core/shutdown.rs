use tokio::signal;

/// Resolves when the process receives Ctrl+C or, on unix, SIGTERM. Drives
/// graceful shutdown so in-flight requests can drain before the server exits.
pub(crate) async fn shutdown_signal() {
    #[cfg(unix)]
    {
        let mut term = match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(stream) => stream,
            Err(err) => {
                tracing::error!(error = %err, "Failed to install SIGTERM handler");
                wait_for_ctrl_c().await;
                tracing::info!("Shutdown signal received");
                return;
            }
        };

        tokio::select! {
            _ = wait_for_ctrl_c() => {}
            _ = term.recv() => {}
        }
    }

    #[cfg(not(unix))]
    wait_for_ctrl_c().await;

    tracing::info!("Shutdown signal received");
}

async fn wait_for_ctrl_c() {
    if let Err(err) = signal::ctrl_c().await {
        tracing::error!(error = %err, "Failed to install Ctrl+C handler");
        std::future::pending::<()>().await;
    }
}
