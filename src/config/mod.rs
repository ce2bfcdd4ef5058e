mod settings;

use crate::config::settings::PartialSettings;
use config::{Config, ConfigError, Environment, File};

pub use settings::{BrokerSettings, LogSettings, Settings};

/// Loads the configuration from the default file and environment variables
/// Merges the configuration with default values
/// Returns a `Settings` struct containing the broker and log configurations
pub fn load_config() -> Result<Settings, ConfigError> {
    // Pick up a .env file first so its variables are visible to the
    // Environment source below.
    let _ = dotenvy::dotenv();

    let builder = Config::builder()
        .add_source(File::with_name("config/default").required(false))
        .add_source(Environment::default().separator("_"));

    let config = builder.build()?;

    // Try to deserialize what is available
    let partial: PartialSettings = config.try_deserialize()?;

    // Merge with defaults
    let default = Settings::default();

    Ok(Settings {
        broker: BrokerSettings {
            host: partial
                .broker
                .as_ref()
                .and_then(|b| b.host.clone())
                .unwrap_or(default.broker.host),
            port: partial
                .broker
                .as_ref()
                .and_then(|b| b.port)
                .unwrap_or(default.broker.port),
            username: partial.broker.as_ref().and_then(|b| b.username.clone()),
            password: partial.broker.as_ref().and_then(|b| b.password.clone()),
            topic: partial
                .broker
                .as_ref()
                .and_then(|b| b.topic.clone())
                .unwrap_or(default.broker.topic),
            keepalive: partial
                .broker
                .as_ref()
                .and_then(|b| b.keepalive)
                .unwrap_or(default.broker.keepalive),
        },
        log: LogSettings {
            directory: partial
                .log
                .as_ref()
                .and_then(|l| l.directory.clone())
                .unwrap_or(default.log.directory),
            rotation: partial.log.as_ref().and_then(|l| l.rotation),
            newline: partial
                .log
                .as_ref()
                .and_then(|l| l.newline)
                .unwrap_or(default.log.newline),
            timestamp: partial
                .log
                .as_ref()
                .and_then(|l| l.timestamp)
                .unwrap_or(default.log.timestamp),
            topic: partial
                .log
                .as_ref()
                .and_then(|l| l.topic)
                .unwrap_or(default.log.topic),
        },
        verbose: partial.verbose.unwrap_or(default.verbose),
    })
}

#[cfg(test)]
mod tests;
