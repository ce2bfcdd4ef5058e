//! The `error` module defines the custom error types used within the `mqttlog`
//! application.
//!
//! This module centralizes error handling, providing a consistent way to
//! represent and propagate errors throughout the system. Network failures and
//! file I/O failures carry different recovery policies (reconnect vs. process
//! shutdown), so they stay distinct variants.

use std::fmt;

/// Errors that can stop the daemon.
///
/// Per-message problems (an append that fails, a payload that needs lossy
/// decoding) are handled locally and never surface here; this type covers the
/// fatal paths only.
#[derive(Debug)]
pub enum LoggerError {
    /// The broker refused us, the initial connect failed, or reconnection
    /// attempts were exhausted.
    Connection(String),
    /// Log file or directory could not be created.
    Io(std::io::Error),
}

impl fmt::Display for LoggerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoggerError::Connection(msg) => write!(f, "connection error: {}", msg),
            LoggerError::Io(e) => write!(f, "i/o error: {}", e),
        }
    }
}

impl std::error::Error for LoggerError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            LoggerError::Connection(_) => None,
            LoggerError::Io(e) => Some(e),
        }
    }
}

impl From<std::io::Error> for LoggerError {
    fn from(e: std::io::Error) -> Self {
        LoggerError::Io(e)
    }
}
