//! Broadcast implementation of the notification bus.
//!
//! Fans preference-set events out to every subscriber over a tokio
//! broadcast channel. Publishing never blocks and never fails: with no
//! subscribers, or with a lagging subscriber, events are simply dropped.

use tokio::sync::broadcast;

use tonehub_types::notify::{NotifyBus, PrefSetEvent};

/// Default per-bus event buffer
const DEFAULT_BUFFER_SIZE: usize = 128;

#[derive(Debug)]
pub struct BroadcastBus {
	sender: broadcast::Sender<PrefSetEvent>,
}

impl BroadcastBus {
	pub fn new(buffer_size: usize) -> Self {
		let (sender, _) = broadcast::channel(buffer_size.max(1));
		Self { sender }
	}

	pub fn subscribe(&self) -> broadcast::Receiver<PrefSetEvent> {
		self.sender.subscribe()
	}
}

impl Default for BroadcastBus {
	fn default() -> Self {
		Self::new(DEFAULT_BUFFER_SIZE)
	}
}

impl NotifyBus for BroadcastBus {
	fn publish(&self, event: PrefSetEvent) {
		// Fire and forget: an error only means there are no subscribers
		let _ = self.sender.send(event);
	}
}

// vim: ts=4
