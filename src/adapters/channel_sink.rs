//! Channel fan-out event sink.
//!
//! Every emitted [`GameEvent`] is cloned onto one `mpsc` channel per
//! subscriber. Consumers drain their receiver at their own pace, on any
//! thread. Subscribers whose receiver was dropped are pruned on the next
//! emit.

use std::sync::mpsc::{Receiver, Sender, channel};

use log::debug;

use crate::app::events::GameEvent;
use crate::app::ports::EventSink;

#[derive(Debug, Default)]
pub struct ChannelEventSink {
    subscribers: Vec<Sender<GameEvent>>,
}

impl ChannelEventSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new consumer. It sees every event emitted from now on.
    pub fn subscribe(&mut self) -> Receiver<GameEvent> {
        let (tx, rx) = channel();
        self.subscribers.push(tx);
        rx
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }
}

impl EventSink for ChannelEventSink {
    fn emit(&mut self, event: &GameEvent) {
        let before = self.subscribers.len();
        self.subscribers.retain(|tx| tx.send(event.clone()).is_ok());
        let dropped = before - self.subscribers.len();
        if dropped > 0 {
            debug!("ChannelEventSink: pruned {dropped} closed subscribers");
        }
    }
}
