//! CLI for mqttlog
//!
//! Thin glue only: parse the command line, merge it over the file/env
//! configuration, initialize logging, and hand the validated settings to the
//! daemon core.

use clap::Parser;
use std::process::ExitCode;
use tracing::info;

use mqttlog::config::{Settings, load_config};
use mqttlog::daemon;
use mqttlog::utils::logging;

#[derive(Parser, Debug)]
#[command(
    name = "mqttlog",
    version,
    about = "Subscribe to an MQTT topic filter and log every message to rotating files"
)]
struct Args {
    /// MQTT host address
    #[arg(short = 'H', long)]
    host: Option<String>,

    /// MQTT port number
    #[arg(short, long)]
    port: Option<u16>,

    /// MQTT username
    #[arg(short, long)]
    username: Option<String>,

    /// MQTT password
    #[arg(short = 'P', long)]
    password: Option<String>,

    /// MQTT topic filter (defaults to all topics)
    #[arg(short, long)]
    topic: Option<String>,

    /// Directory the log files are created in
    #[arg(short, long)]
    log_dir: Option<String>,

    /// Number of messages per file before rotating (default: unlimited)
    #[arg(short, long)]
    rotation: Option<u64>,

    /// Add a newline separator between saved messages
    #[arg(long)]
    newline: bool,

    /// Prefix each saved message with its receive timestamp
    #[arg(long)]
    add_timestamp: bool,

    /// Prefix each saved message with its topic
    #[arg(long)]
    add_topic: bool,

    /// Show verbose output
    #[arg(short, long)]
    verbose: bool,
}

/// Command-line options win over file and environment configuration.
fn apply_cli(mut settings: Settings, args: &Args) -> Settings {
    if let Some(host) = &args.host {
        settings.broker.host = host.clone();
    }
    if let Some(port) = args.port {
        settings.broker.port = port;
    }
    if let Some(username) = &args.username {
        settings.broker.username = Some(username.clone());
    }
    if let Some(password) = &args.password {
        settings.broker.password = Some(password.clone());
    }
    if let Some(topic) = &args.topic {
        settings.broker.topic = topic.clone();
    }
    if let Some(dir) = &args.log_dir {
        settings.log.directory = dir.clone();
    }
    if let Some(rotation) = args.rotation {
        settings.log.rotation = Some(rotation);
    }
    if args.newline {
        settings.log.newline = true;
    }
    if args.add_timestamp {
        settings.log.timestamp = true;
    }
    if args.add_topic {
        settings.log.topic = true;
    }
    if args.verbose {
        settings.verbose = true;
    }
    settings
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    let settings = match load_config() {
        Ok(settings) => apply_cli(settings, &args),
        Err(e) => {
            eprintln!("invalid configuration: {}", e);
            return ExitCode::FAILURE;
        }
    };

    logging::init(settings.verbose);

    info!("-- MQTT message logger starting --");
    info!("press Ctrl+C to stop");

    match daemon::run(settings).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(_) => ExitCode::FAILURE,
    }
}
