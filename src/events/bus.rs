//! # Event bus for signalling a host.
//!
//! [`Bus`] is a thin wrapper around [`tokio::sync::broadcast`]. The embedded runner
//! publishes onto it; the host holds one or more receivers.
//!
//! ## Rules
//! - **Non-blocking publish**: `publish()` never blocks.
//! - **Bounded capacity**: a single ring buffer stores recent events for all receivers.
//! - **Lag handling**: slow receivers get `RecvError::Lagged(n)` and skip `n` oldest items.
//! - **No persistence**: events are lost if there are no active receivers at send time.

use tokio::sync::broadcast;

use super::event::Event;

/// Broadcast channel for runner events.
///
/// Cheap to clone (internally holds an `Arc`-backed sender).
#[derive(Clone, Debug)]
pub struct Bus {
    tx: broadcast::Sender<Event>,
}

impl Bus {
    /// Creates a new bus with the given channel capacity (min 1).
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        let (tx, _rx) = broadcast::channel::<Event>(capacity);
        Self { tx }
    }

    /// Publishes an event to all active receivers.
    ///
    /// If there are no receivers, the event is dropped.
    pub fn publish(&self, ev: Event) {
        let _ = self.tx.send(ev);
    }

    /// Creates a new receiver that will observe subsequent events.
    pub fn subscribe(&self) -> broadcast::Receiver<Event> {
        self.tx.subscribe()
    }

    /// Number of live receivers.
    pub fn receiver_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::EventKind;

    #[test]
    fn test_publish_without_receivers_is_dropped() {
        let bus = Bus::new(0);
        bus.publish(Event::new(EventKind::TaskStarted));
        assert_eq!(bus.receiver_count(), 0);
    }

    #[test]
    fn test_receiver_sees_later_events_only() {
        let bus = Bus::new(4);
        bus.publish(Event::new(EventKind::TaskStarted));
        let mut rx = bus.subscribe();
        bus.publish(Event::new(EventKind::TaskStopped));

        let ev = rx.try_recv().unwrap();
        assert_eq!(ev.kind, EventKind::TaskStopped);
        assert!(rx.try_recv().is_err());
    }
}
