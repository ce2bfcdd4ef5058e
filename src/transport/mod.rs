//! The `transport` module is responsible for the network leg of the daemon:
//! the single MQTT connection.
//!
//! It owns the broker session, (re-)establishes the topic subscription on
//! every successful connect, and hands received messages to the ingress
//! queue. The receive path never blocks and never touches the file system;
//! all file work happens on the worker task.

pub mod mqtt;

pub use mqtt::{MqttSource, ReconnectPolicy};
