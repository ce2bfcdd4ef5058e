use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info, warn};

use crate::daemon::RunState;
use crate::ingress::{IngressQueue, Message};
use crate::persistence::{FormatOptions, LogRotator, format_record};
use crate::utils::error::LoggerError;

/// States of the worker loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkerState {
    /// Suspended on the queue's wake signal.
    WaitingForWork,
    /// Dequeuing and writing until the queue is observed empty.
    Draining,
    /// Terminal; the log file is closed on the way out.
    Stopped,
}

/// The single consumer of the ingress queue.
///
/// Owns the rotator (and through it the file handle) outright, so writes,
/// rotation, and the per-file counter need no locking. Per-message write
/// failures are logged and the message is skipped; a failed rotation is
/// fatal and ends the loop with an error.
pub struct Worker {
    queue: Arc<IngressQueue>,
    run: Arc<RunState>,
    rotator: LogRotator,
    options: FormatOptions,
    state: WorkerState,
}

impl Worker {
    /// The rotator is expected to have its first file already open; creating
    /// it is the caller's startup (and fatal-on-error) step.
    pub fn new(
        queue: Arc<IngressQueue>,
        run: Arc<RunState>,
        rotator: LogRotator,
        options: FormatOptions,
    ) -> Self {
        Self {
            queue,
            run,
            rotator,
            options,
            state: WorkerState::WaitingForWork,
        }
    }

    /// Drives the state machine until `Stopped`, closing the file on exit.
    ///
    /// The queue is always drained fully before stopping, so no message that
    /// reached the queue before shutdown is lost.
    pub async fn run(mut self) -> Result<(), LoggerError> {
        debug!("worker started");
        let result = self.drive().await;
        self.rotator.close();
        debug!("worker stopped");
        result
    }

    async fn drive(&mut self) -> Result<(), LoggerError> {
        loop {
            match self.state {
                WorkerState::WaitingForWork => {
                    if !self.run.is_running() && self.queue.is_empty() {
                        self.state = WorkerState::Stopped;
                        continue;
                    }
                    self.queue.wait().await;
                    self.state = WorkerState::Draining;
                }
                WorkerState::Draining => {
                    while let Some(msg) = self.queue.dequeue() {
                        self.process(msg)?;
                    }
                    self.rotator.flush();
                    if self.run.is_running() {
                        self.state = WorkerState::WaitingForWork;
                    } else if self.queue.is_empty() {
                        self.state = WorkerState::Stopped;
                    }
                    // A message that slipped in between the drain and the
                    // empty check keeps us in Draining for another pass.
                }
                WorkerState::Stopped => return Ok(()),
            }
        }
    }

    /// Formats and appends one message, counts it, and rotates when the
    /// threshold is reached.
    fn process(&mut self, msg: Message) -> Result<(), LoggerError> {
        let record = format_record(
            &msg,
            &self.options,
            self.rotator.is_first_record(),
            Utc::now(),
        );
        match self.rotator.append(&record) {
            Ok(()) => {
                info!(
                    "message received on \"{}\" ({} bytes)",
                    msg.topic,
                    msg.payload.len()
                );
                self.rotator.record_written();
                if self.rotator.should_rotate() {
                    self.rotator.rotate()?;
                }
                Ok(())
            }
            Err(e) => {
                warn!("could not save message from \"{}\": {}", msg.topic, e);
                Ok(())
            }
        }
    }
}
