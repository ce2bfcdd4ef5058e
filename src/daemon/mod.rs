//! The `daemon` module wires the components together and owns the process
//! lifecycle.
//!
//! It spawns the two tasks the design allows (the transport's receive loop
//! and the file-writing worker) and coordinates the transition from running
//! to terminated: flip the run flag, wake the worker so it can drain, wait
//! for it under a bounded grace period, then disconnect the transport.

pub mod shutdown;
pub mod worker;

pub use shutdown::RunState;
pub use worker::{Worker, WorkerState};

use std::sync::Arc;
use std::time::Duration;

use tracing::{error, info, warn};

use crate::config::Settings;
use crate::ingress::IngressQueue;
use crate::persistence::{FormatOptions, LogRotator};
use crate::transport::MqttSource;
use crate::utils::error::LoggerError;

/// How long the shutdown path waits for the worker to drain and close.
const SHUTDOWN_GRACE: Duration = Duration::from_secs(5);

/// Runs the daemon until a termination signal or a fatal error.
///
/// Startup failures (log file creation, initial broker connect) are fatal
/// and reported through the returned error; either way the shutdown sequence
/// runs so the file is flushed and closed.
pub async fn run(settings: Settings) -> Result<(), LoggerError> {
    let queue = Arc::new(IngressQueue::new());
    let run_state = Arc::new(RunState::new());

    // No log destination means no reason to keep running.
    let mut rotator = LogRotator::new(&settings.log.directory, settings.log.rotation);
    rotator.create()?;

    let worker = Worker::new(
        queue.clone(),
        run_state.clone(),
        rotator,
        FormatOptions::from(&settings.log),
    );
    let mut worker_handle = tokio::spawn(worker.run());

    let source = MqttSource::connect(&settings.broker, queue.clone(), run_state.clone());
    let client = source.handle();
    let mut source_handle = tokio::spawn(source.run());

    let mut worker_done = false;
    let outcome = tokio::select! {
        signal = shutdown::wait_for_signal() => {
            match signal {
                Ok(()) => info!("interrupt received, shutting down"),
                Err(e) => warn!("signal handler failed: {}", e),
            }
            Ok(())
        }
        res = &mut source_handle => match res {
            Ok(r) => r,
            Err(e) => Err(LoggerError::Connection(format!("transport task failed: {}", e))),
        },
        res = &mut worker_handle => {
            worker_done = true;
            match res {
                Ok(r) => r,
                Err(e) => Err(LoggerError::Io(std::io::Error::other(format!(
                    "worker task failed: {}",
                    e
                )))),
            }
        }
    };

    if let Err(e) = &outcome {
        error!("{}", e);
    }

    // Coordinator sequence. Safe to reach more than once: the flag flip,
    // close and disconnect are all idempotent or best-effort.
    run_state.shutdown();
    queue.signal();
    if !worker_done {
        match tokio::time::timeout(SHUTDOWN_GRACE, &mut worker_handle).await {
            Ok(Ok(Ok(()))) => {}
            Ok(Ok(Err(e))) => error!("worker failed during shutdown: {}", e),
            Ok(Err(e)) => error!("worker task panicked: {}", e),
            Err(_) => warn!("worker did not stop within {:?}", SHUTDOWN_GRACE),
        }
    }
    let _ = client.disconnect().await;

    info!("finished");
    outcome
}

#[cfg(test)]
mod tests;
