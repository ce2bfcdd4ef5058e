use std::collections::VecDeque;
use std::sync::Mutex;

use tokio::sync::Notify;

use crate::ingress::message::Message;

/// Unbounded FIFO buffer between the transport task and the worker task,
/// paired with a wake signal.
///
/// The queue is safe for one concurrent producer (the connection manager's
/// receive path) and one concurrent consumer (the worker loop). `enqueue`
/// never blocks and never fails; unbounded growth is the accepted trade-off
/// when the producer outpaces the consumer.
///
/// The wake signal is level-triggered, not per-message: `signal` stores at
/// most one pending wake, so a consumer returning from `wait` must keep
/// dequeuing until the queue is observed empty before suspending again.
#[derive(Debug, Default)]
pub struct IngressQueue {
    pending: Mutex<VecDeque<Message>>,
    wake: Notify,
}

impl IngressQueue {
    /// Creates a new, empty queue.
    pub fn new() -> Self {
        Self {
            pending: Mutex::new(VecDeque::new()),
            wake: Notify::new(),
        }
    }

    /// Appends a message at the tail of the queue.
    ///
    /// Non-blocking; called from the transport task, which must never perform
    /// file I/O or wait on the consumer.
    pub fn enqueue(&self, msg: Message) {
        self.pending.lock().unwrap().push_back(msg);
    }

    /// Removes and returns the message at the head of the queue, or `None`
    /// when the queue is empty.
    pub fn dequeue(&self) -> Option<Message> {
        self.pending.lock().unwrap().pop_front()
    }

    /// Returns true when no messages are pending.
    pub fn is_empty(&self) -> bool {
        self.pending.lock().unwrap().is_empty()
    }

    /// Number of messages currently pending.
    pub fn len(&self) -> usize {
        self.pending.lock().unwrap().len()
    }

    /// Wakes the waiting consumer, or stores a single wake permit if none is
    /// waiting. Calling this repeatedly before the consumer runs is the same
    /// as calling it once.
    pub fn signal(&self) {
        self.wake.notify_one();
    }

    /// Suspends the calling task until `signal` is invoked. Returns
    /// immediately if a wake permit is already stored.
    pub async fn wait(&self) {
        self.wake.notified().await;
    }
}
