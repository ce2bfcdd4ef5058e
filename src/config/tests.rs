use super::settings::Settings;
use super::load_config;
use serial_test::serial;
use std::env;
use std::fs;
use tempfile::TempDir;

#[test]
fn test_default_settings() {
    let settings = Settings::default();
    assert_eq!(settings.broker.host, "localhost");
    assert_eq!(settings.broker.port, 1883);
    assert_eq!(settings.broker.username, None);
    assert_eq!(settings.broker.password, None);
    assert_eq!(settings.broker.topic, "#");
    assert_eq!(settings.broker.keepalive, 60);
    assert_eq!(settings.log.directory, "data-logs");
    assert_eq!(settings.log.rotation, None);
    assert!(!settings.log.newline);
    assert!(!settings.log.timestamp);
    assert!(!settings.log.topic);
    assert!(!settings.verbose);
}

#[test]
#[serial]
fn load_config_from_file_overrides_defaults() {
    // Create a temporary directory and set it as current dir so load_config
    // will pick up config/default.toml from there.
    let tmp = TempDir::new().expect("create tempdir");
    let orig = env::current_dir().expect("current_dir");
    env::set_current_dir(tmp.path()).expect("set current dir");

    // create config dir and default.toml
    fs::create_dir_all("config").expect("create config dir");
    let toml = r#"
        verbose = true

        [broker]
        host = "broker.example.com"
        port = 8883
        username = "sensor"
        topic = "sensors/#"

        [log]
        directory = "/var/log/mqtt"
        rotation = 500
        newline = true
    "#;
    fs::write("config/default.toml", toml).expect("write config file");

    let cfg = load_config().expect("load_config failed");
    assert_eq!(cfg.broker.host, "broker.example.com");
    assert_eq!(cfg.broker.port, 8883);
    assert_eq!(cfg.broker.username.as_deref(), Some("sensor"));
    assert_eq!(cfg.broker.password, None);
    assert_eq!(cfg.broker.topic, "sensors/#");
    assert_eq!(cfg.log.directory, "/var/log/mqtt");
    assert_eq!(cfg.log.rotation, Some(500));
    assert!(cfg.log.newline);
    assert!(!cfg.log.timestamp);
    assert!(cfg.verbose);

    // restore cwd
    env::set_current_dir(orig).expect("restore cwd");
}

#[test]
#[serial]
fn load_config_from_environment() {
    // Run from a tempdir so no config/default.toml interferes.
    let tmp = TempDir::new().expect("create tempdir");
    let orig = env::current_dir().expect("current_dir");
    env::set_current_dir(tmp.path()).expect("set current dir");

    temp_env::with_vars(
        [
            ("BROKER_HOST", Some("env-broker")),
            ("BROKER_PORT", Some("2883")),
            ("LOG_ROTATION", Some("25")),
        ],
        || {
            let cfg = load_config().expect("load_config failed");
            assert_eq!(cfg.broker.host, "env-broker");
            assert_eq!(cfg.broker.port, 2883);
            assert_eq!(cfg.log.rotation, Some(25));
            // Untouched values keep their defaults.
            assert_eq!(cfg.broker.topic, "#");
            assert_eq!(cfg.log.directory, "data-logs");
        },
    );

    env::set_current_dir(orig).expect("restore cwd");
}
