//! Event sinks
//!
//! The stream loop hands every decoded event to an `EventSink`. Plain
//! closures work directly; `ChannelSink` bridges to a bounded channel for
//! callers that consume events on another thread.

use crossbeam::channel::{bounded, Receiver, Sender};

use crate::protocol::TapEvent;

/// Receives decoded events from a running stream
pub trait EventSink {
    fn on_event(&mut self, event: TapEvent);
}

impl<F: FnMut(TapEvent)> EventSink for F {
    fn on_event(&mut self, event: TapEvent) {
        self(event)
    }
}

/// Sink that forwards events into a bounded channel
///
/// A full channel applies backpressure to the read loop. If the receiver
/// is dropped mid-stream, the sink logs once and discards the rest; the
/// loop itself still runs to end-of-stream.
pub struct ChannelSink {
    tx: Sender<TapEvent>,
    disconnected: bool,
}

impl ChannelSink {
    /// Create a sink and its receiving half with the given capacity
    pub fn bounded(capacity: usize) -> (Self, Receiver<TapEvent>) {
        let (tx, rx) = bounded(capacity);
        (
            Self {
                tx,
                disconnected: false,
            },
            rx,
        )
    }
}

impl EventSink for ChannelSink {
    fn on_event(&mut self, event: TapEvent) {
        if self.disconnected {
            return;
        }
        if self.tx.send(event).is_err() {
            tracing::warn!("event receiver dropped; discarding remaining events");
            self.disconnected = true;
        }
    }
}
