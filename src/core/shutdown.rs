//! # OS termination signals.
//!
//! [`wait_for_shutdown_signal`] completes on SIGINT, SIGTERM or SIGQUIT (unix)
//! or Ctrl-C (elsewhere). The supervisor races it against the completion
//! barrier; a run interrupted this way ends with
//! [`RuntimeError::Interrupted`](crate::RuntimeError::Interrupted).

/// Waits for a termination signal.
///
/// Returns `Err` if the listeners cannot be registered.
#[cfg(unix)]
pub async fn wait_for_shutdown_signal() -> std::io::Result<()> {
    use tokio::signal::unix::{SignalKind, signal};

    let mut sigint = signal(SignalKind::interrupt())?;
    let mut sigterm = signal(SignalKind::terminate())?;
    let mut sigquit = signal(SignalKind::quit())?;

    tokio::select! {
        _ = sigint.recv()  => {},
        _ = sigterm.recv() => {},
        _ = sigquit.recv() => {},
    }
    Ok(())
}

/// Waits for a termination signal.
///
/// Returns `Err` if the listener cannot be registered.
#[cfg(not(unix))]
pub async fn wait_for_shutdown_signal() -> std::io::Result<()> {
    tokio::signal::ctrl_c().await
}

/// Completes only when signal handling is enabled and a signal arrives.
///
/// A registration failure is treated as "no signal will ever come".
pub async fn shutdown_requested(enabled: bool) {
    if !enabled || wait_for_shutdown_signal().await.is_err() {
        std::future::pending::<()>().await;
    }
}
