use std::fs::{self, File, OpenOptions};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};
use tracing::debug;

/// Fixed suffix of every log file name; the prefix is the creation time.
const FILE_SUFFIX: &str = "-mqttMessages.log";

/// Owns the currently open log file and decides when to start a new one.
///
/// At most one file handle is open at a time, and every method here is called
/// only from the worker task, so the rotator carries no locking. Files are
/// named `<yymmddHHMMSS>-mqttMessages.log` from the local wall clock and
/// opened in append mode inside the configured directory, which is created if
/// absent.
#[derive(Debug)]
pub struct LogRotator {
    directory: PathBuf,
    threshold: Option<u64>,
    file: Option<BufWriter<File>>,
    path: Option<PathBuf>,
    created_at: Option<DateTime<Local>>,
    messages_written: u64,
}

impl LogRotator {
    /// Creates a rotator for the given directory and optional message-count
    /// threshold. No file is opened until [`LogRotator::create`] is called.
    pub fn new(directory: impl Into<PathBuf>, threshold: Option<u64>) -> Self {
        Self {
            directory: directory.into(),
            threshold,
            file: None,
            path: None,
            created_at: None,
            messages_written: 0,
        }
    }

    /// Opens a fresh timestamped log file, creating the log directory first
    /// if it does not exist, and resets the per-file message counter.
    ///
    /// Failure here (permissions, bad path) leaves no file open and is fatal
    /// for the daemon: with no log destination there is no reason to keep
    /// running.
    pub fn create(&mut self) -> io::Result<()> {
        let now = Local::now();
        let name = format!("{}{}", now.format("%y%m%d%H%M%S"), FILE_SUFFIX);

        fs::create_dir_all(&self.directory)?;
        let path = self.directory.join(name);
        let file = OpenOptions::new().create(true).append(true).open(&path)?;

        debug!("file created: {}", path.display());
        self.file = Some(BufWriter::new(file));
        self.path = Some(path);
        self.created_at = Some(now);
        self.messages_written = 0;
        Ok(())
    }

    /// Flushes and releases the current file handle.
    ///
    /// Tolerates a handle that is already closed or was never opened; close
    /// failures are swallowed.
    pub fn close(&mut self) {
        if let Some(mut file) = self.file.take() {
            debug!("closing file");
            let _ = file.flush();
        }
    }

    /// Forces buffered bytes out to the file without closing it.
    ///
    /// Best-effort: a flush failure must never take down the worker.
    pub fn flush(&mut self) {
        if let Some(file) = self.file.as_mut() {
            if let Err(e) = file.flush() {
                debug!("flush failed: {}", e);
            }
        }
    }

    /// Appends raw bytes to the current file.
    pub fn append(&mut self, bytes: &[u8]) -> io::Result<()> {
        match self.file.as_mut() {
            Some(file) => file.write_all(bytes),
            None => Err(io::Error::other("no log file open")),
        }
    }

    /// Records that one message was appended to the current file.
    pub fn record_written(&mut self) {
        self.messages_written += 1;
    }

    /// True while nothing has been written to the current file yet.
    pub fn is_first_record(&self) -> bool {
        self.messages_written == 0
    }

    /// Messages written to the current file since it was created.
    pub fn messages_written(&self) -> u64 {
        self.messages_written
    }

    /// True iff a threshold is configured and the current file has reached
    /// it. Rotation must then happen before the next message is written.
    pub fn should_rotate(&self) -> bool {
        matches!(self.threshold, Some(t) if self.messages_written >= t)
    }

    /// Closes the current file and opens a new one, resetting the counter.
    pub fn rotate(&mut self) -> io::Result<()> {
        self.close();
        self.create()
    }

    /// Path of the currently open file, if any.
    pub fn current_path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Creation time of the currently open file, if any.
    pub fn created_at(&self) -> Option<DateTime<Local>> {
        self.created_at
    }
}
