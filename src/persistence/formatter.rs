use chrono::{DateTime, Utc};

use crate::config::LogSettings;
use crate::ingress::Message;

/// Record format flags, taken from the log configuration.
///
/// Each flag adds one field to the record; with everything off a record is
/// the bare payload.
#[derive(Debug, Clone, Default)]
pub struct FormatOptions {
    /// Separate records with a newline (written before every record except
    /// the first in a file).
    pub newline: bool,
    /// Prefix each record with the epoch receive time.
    pub timestamp: bool,
    /// Prefix each record with the topic it arrived on.
    pub topic: bool,
}

impl From<&LogSettings> for FormatOptions {
    fn from(log: &LogSettings) -> Self {
        Self {
            newline: log.newline,
            timestamp: log.timestamp,
            topic: log.topic,
        }
    }
}

/// Renders one message into the bytes to append to the active log file.
///
/// Fields are emitted left to right: the newline separator (suppressed for
/// the first record of a file), the epoch timestamp with two fractional
/// digits and a `;` separator, the topic and a `;` separator, then the
/// payload decoded as UTF-8 with invalid sequences replaced. Decoding never
/// fails, so this function is total; the caller supplies the wall clock.
pub fn format_record(
    msg: &Message,
    opts: &FormatOptions,
    is_first_in_file: bool,
    now: DateTime<Utc>,
) -> Vec<u8> {
    let mut record = String::new();

    if opts.newline && !is_first_in_file {
        record.push('\n');
    }
    if opts.timestamp {
        let epoch = now.timestamp_millis() as f64 / 1000.0;
        record.push_str(&format!("{:.2};", epoch));
    }
    if opts.topic {
        record.push_str(&msg.topic);
        record.push(';');
    }
    record.push_str(&String::from_utf8_lossy(&msg.payload));

    record.into_bytes()
}
