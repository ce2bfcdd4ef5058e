use serde::Deserialize;

/// Top-level configuration settings for the application.
///
/// Includes settings for the broker connection and the log file sink. The
/// struct is immutable for the lifetime of the process; the daemon core only
/// ever reads it.
#[derive(Debug, Deserialize, Clone)]
pub struct Settings {
    pub broker: BrokerSettings,
    pub log: LogSettings,
    pub verbose: bool,
}

/// Configuration settings for the MQTT broker connection.
///
/// Defines where to connect, optional credentials, and which topics to
/// subscribe to. The topic filter supports broker-standard wildcards; the
/// default `#` subscribes to everything.
#[derive(Debug, Deserialize, Clone)]
pub struct BrokerSettings {
    pub host: String,
    pub port: u16,
    pub username: Option<String>,
    pub password: Option<String>,
    pub topic: String,
    pub keepalive: u64,
}

/// Configuration settings for the log file sink.
///
/// Controls the output directory, the per-file rotation threshold (`None`
/// means a single unlimited file) and the record format flags.
#[derive(Debug, Deserialize, Clone)]
pub struct LogSettings {
    pub directory: String,
    pub rotation: Option<u64>,
    pub newline: bool,
    pub timestamp: bool,
    pub topic: bool,
}

/// Partial configuration settings loaded from files or environment.
///
/// Allows partial specification of settings. Missing values can be filled using defaults.
#[derive(Debug, Deserialize)]
pub struct PartialSettings {
    pub broker: Option<PartialBrokerSettings>,
    pub log: Option<PartialLogSettings>,
    pub verbose: Option<bool>,
}

/// Partial broker settings.
///
/// Used when loading broker configuration from external sources with optional values.
#[derive(Debug, Deserialize)]
pub struct PartialBrokerSettings {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub username: Option<String>,
    pub password: Option<String>,
    pub topic: Option<String>,
    pub keepalive: Option<u64>,
}

/// Partial log sink settings.
///
/// Used for log configuration from external sources with optional values.
#[derive(Debug, Deserialize)]
pub struct PartialLogSettings {
    pub directory: Option<String>,
    pub rotation: Option<u64>,
    pub newline: Option<bool>,
    pub timestamp: Option<bool>,
    pub topic: Option<bool>,
}

/// Provides default values for `Settings`.
///
/// Ensures the daemon has sensible defaults if no configuration is provided:
/// a local broker, all topics, and plain records in `data-logs/`.
impl Default for Settings {
    fn default() -> Self {
        Self {
            broker: BrokerSettings {
                host: "localhost".to_string(),
                port: 1883,
                username: None,
                password: None,
                topic: "#".to_string(),
                keepalive: 60,
            },
            log: LogSettings {
                directory: "data-logs".to_string(),
                rotation: None,
                newline: false,
                timestamp: false,
                topic: false,
            },
            verbose: false,
        }
    }
}
