use tokio::signal;
#[cfg(unix)]
use tokio::signal::unix::{SignalKind, signal as unix_signal};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

/// Cancels `token` on SIGINT or SIGTERM. The listener also exits once the
/// token is cancelled by someone else.
pub fn spawn_signal_listener(token: CancellationToken) -> JoinHandle<()> {
    tokio::spawn(async move {
        tokio::select! {
            () = token.cancelled() => {}
            () = wait_for_signal() => {
                token.cancel();
            }
        }
    })
}

async fn wait_for_signal() {
    #[cfg(unix)]
    {
        match unix_signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                tokio::select! {
                    () = ctrl_c() => {}
                    _ = sigterm.recv() => {
                        info!("Received SIGTERM, stopping after the current cycle");
                    }
                }
            }
            Err(err) => {
                error!("Failed to create SIGTERM handler: {}", err);
                ctrl_c().await;
            }
        }
    }

    #[cfg(not(unix))]
    {
        ctrl_c().await;
    }
}

async fn ctrl_c() {
    match signal::ctrl_c().await {
        Ok(()) => info!("Received SIGINT (Ctrl+C), stopping after the current cycle"),
        Err(err) => {
            error!("Failed to listen for SIGINT: {}", err);
            // Without a working listener only an external kill stops the process.
            std::future::pending::<()>().await;
        }
    }
}
