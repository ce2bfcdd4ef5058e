//! The `ingress` module is the handoff point between the transport callback
//! task and the file-writing worker.
//!
//! It defines the received `Message` and the `IngressQueue`, a FIFO buffer
//! paired with a level-triggered wake signal. The transport enqueues and
//! signals; the worker waits, then drains until the queue is observed empty.

pub mod message;
pub mod queue;

pub use message::Message;
pub use queue::IngressQueue;
