use rumqttc::Publish;

/// Represents one message received from the broker.
///
/// A message consists of the topic it arrived on, the raw payload bytes, and
/// the delivery metadata the broker attached to it. It is immutable once
/// constructed: the queue owns it until the worker dequeues it, after which
/// the worker owns it for the duration of formatting and writing.
///
/// # Fields
///
/// - `topic` - The topic this message was published on.
/// - `payload` - The raw payload bytes, decoded only at write time.
/// - `qos` - The quality-of-service level; treated as opaque metadata.
/// - `retained` - Whether the broker flagged this as a retained message.
#[derive(Debug, Clone)]
pub struct Message {
    pub topic: String,
    pub payload: Vec<u8>,
    pub qos: u8,
    pub retained: bool,
}

impl From<Publish> for Message {
    fn from(publish: Publish) -> Self {
        Self {
            topic: publish.topic,
            payload: publish.payload.to_vec(),
            qos: publish.qos as u8,
            retained: publish.retain,
        }
    }
}
