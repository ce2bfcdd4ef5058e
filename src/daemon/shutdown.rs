use std::sync::atomic::{AtomicBool, Ordering};

/// Process-wide running flag.
///
/// Transitions true→false exactly once, read by the worker loop and the
/// connection manager, written only by the shutdown path. The transition is
/// the idempotence guard for the whole shutdown sequence.
#[derive(Debug)]
pub struct RunState {
    running: AtomicBool,
}

impl RunState {
    pub fn new() -> Self {
        Self {
            running: AtomicBool::new(true),
        }
    }

    /// True until shutdown has been requested.
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    /// Requests shutdown. Returns true only for the call that performed the
    /// true→false transition, so repeated invocations stay safe.
    pub fn shutdown(&self) -> bool {
        self.running.swap(false, Ordering::SeqCst)
    }
}

impl Default for RunState {
    fn default() -> Self {
        Self::new()
    }
}

/// Waits for a termination signal.
///
/// Listens for `SIGINT` (Ctrl-C) and `SIGTERM` on unix platforms, Ctrl-C
/// elsewhere. Returns `Ok(())` when any signal is received, or `Err` if
/// signal registration fails.
#[cfg(unix)]
pub async fn wait_for_signal() -> std::io::Result<()> {
    use tokio::signal::unix::{SignalKind, signal};

    let mut sigint = signal(SignalKind::interrupt())?;
    let mut sigterm = signal(SignalKind::terminate())?;

    tokio::select! {
        _ = sigint.recv() => {},
        _ = sigterm.recv() => {},
    }
    Ok(())
}

/// Waits for a termination signal.
///
/// On non-unix platforms only Ctrl-C is handled.
#[cfg(not(unix))]
pub async fn wait_for_signal() -> std::io::Result<()> {
    tokio::signal::ctrl_c().await
}
