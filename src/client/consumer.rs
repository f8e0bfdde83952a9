use tokio::sync::mpsc::UnboundedSender;
use uuid::Uuid;

use crate::broker::Delivery;

pub type ConsumerTag = String;

/// A consumer attached to one queue.
///
/// The broker pushes deliveries into `sender`; whoever owns the matching
/// receiver processes them.
#[derive(Debug)]
pub struct Consumer {
    /// Unique tag identifying the consumer (`ctag-<uuid>`).
    pub tag: ConsumerTag,

    /// Queue the consumer reads from.
    pub queue: String,

    /// Channel the broker delivers into.
    pub sender: UnboundedSender<Delivery>,
}

impl Consumer {
    pub fn new(queue: impl Into<String>, sender: UnboundedSender<Delivery>) -> Self {
        Self {
            tag: format!("ctag-{}", Uuid::new_v4()),
            queue: queue.into(),
            sender,
        }
    }
}
