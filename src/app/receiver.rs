use std::sync::{Mutex, PoisonError};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use tracing::info;

use crate::app::message::CustomMessage;
use crate::client::MessageListener;
use crate::utils::latch::CountDownLatch;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReceiverState {
    Awaiting,
    Received,
}

/// Subscription endpoint for the demo queue.
///
/// Logs every message it gets and releases a one-shot latch on the first one;
/// later messages are still logged and counted but the latch stays released.
#[derive(Debug)]
pub struct Receiver {
    latch: CountDownLatch,
    received: AtomicUsize,
    last_message: Mutex<Option<CustomMessage>>,
}

impl Default for Receiver {
    fn default() -> Self {
        Self::new()
    }
}

impl Receiver {
    pub fn new() -> Self {
        Self {
            latch: CountDownLatch::new(1),
            received: AtomicUsize::new(0),
            last_message: Mutex::new(None),
        }
    }

    pub fn receive_message(&self, message: CustomMessage) {
        info!(
            text = message.text(),
            priority = message.priority(),
            secret = message.secret(),
            "Received Message > {message}"
        );

        self.received.fetch_add(1, Ordering::AcqRel);
        *self
            .last_message
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = Some(message);
        self.latch.count_down();
    }

    /// Wait for the first message. Returns `false` if `timeout` elapsed first.
    pub async fn wait_for_message(&self, timeout: Duration) -> bool {
        self.latch.wait(timeout).await
    }

    pub fn latch(&self) -> &CountDownLatch {
        &self.latch
    }

    pub fn state(&self) -> ReceiverState {
        if self.latch.is_released() {
            ReceiverState::Received
        } else {
            ReceiverState::Awaiting
        }
    }

    pub fn received_count(&self) -> usize {
        self.received.load(Ordering::Acquire)
    }

    pub fn last_message(&self) -> Option<CustomMessage> {
        self.last_message
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl MessageListener for Receiver {
    type Message = CustomMessage;

    fn on_message(&self, message: CustomMessage) {
        self.receive_message(message);
    }
}

#[cfg(test)]
mod lock_tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn message_recorded_after_lock_poisoned() {
        let receiver = Arc::new(Receiver::new());

        let poisoner = receiver.clone();
        let _ = std::thread::spawn(move || {
            let _guard = poisoner.last_message.lock().unwrap();
            panic!("poison the last-message lock");
        })
        .join();
        assert!(receiver.last_message.is_poisoned());

        receiver.receive_message(CustomMessage::new("still kept", 3, false));

        assert_eq!(
            receiver.last_message(),
            Some(CustomMessage::new("still kept", 3, false))
        );
        assert_eq!(receiver.state(), ReceiverState::Received);
    }
}
