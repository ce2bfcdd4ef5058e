//! The `persistence` module owns the daemon's output: rotating plain-text
//! log files.
//!
//! `formatter` renders one received message into the bytes appended to the
//! active file; `rotator` owns the file handle itself, creating timestamped
//! files and rotating them when the configured message-count threshold is
//! reached. All of this state is touched only from the worker task, so none
//! of it needs locking.

pub mod formatter;
pub mod rotator;

pub use formatter::{FormatOptions, format_record};
pub use rotator::LogRotator;
