use tokio::sync::oneshot;
use tracing::{error, info};

#[cfg(unix)]
use tokio::signal::unix::{signal, SignalKind};
#[cfg(windows)]
use tokio::signal::windows::{ctrl_break, ctrl_c};

/// Wait for a termination signal, then notify the scheduler
pub async fn handle_signals(shutdown_send: oneshot::Sender<()>) {
    if let Err(e) = wait_for_signal().await {
        error!("Failed to install signal handlers: {}", e);
        return;
    }

    if shutdown_send.send(()).is_err() {
        info!("Scheduler already stopped");
    }
}

/// Platform-specific signal handling implementation
#[cfg(unix)]
async fn wait_for_signal() -> std::io::Result<()> {
    // SIGTERM comes from service managers, SIGINT from Ctrl+C
    let mut sigterm = signal(SignalKind::terminate())?;
    let mut sigint = signal(SignalKind::interrupt())?;

    tokio::select! {
        _ = sigterm.recv() => {
            info!("Received SIGTERM signal, stopping after the current run");
        }
        _ = sigint.recv() => {
            info!("Received SIGINT signal, stopping after the current run");
        }
    }
    Ok(())
}

/// Platform-specific signal handling implementation
#[cfg(windows)]
async fn wait_for_signal() -> std::io::Result<()> {
    let mut ctrlc = ctrl_c()?;
    let mut ctrlbreak = ctrl_break()?;

    tokio::select! {
        _ = ctrlc.recv() => {
            info!("Received Ctrl+C signal, stopping after the current run");
        }
        _ = ctrlbreak.recv() => {
            info!("Received Ctrl+Break signal, stopping after the current run");
        }
    }
    Ok(())
}
