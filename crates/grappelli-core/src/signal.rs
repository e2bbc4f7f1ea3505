//! Explicit publish/subscribe channel.
//!
//! Nothing in the navigation system re-renders through hidden dependency
//! tracking: interested parties connect a receiver to a [`Signal`] and are
//! invoked on every emission until they disconnect.

use parking_lot::RwLock;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

/// Identifies a connected receiver for later disconnection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Receiver<T> = Arc<dyn Fn(&T) + Send + Sync>;

struct Slot<T> {
	id: SubscriptionId,
	receiver: Receiver<T>,
}

/// A typed signal: receivers run in connection order on every emit.
///
/// The receiver list is released before any receiver runs, so receivers may
/// connect, disconnect, or emit on the same signal without deadlocking.
pub struct Signal<T> {
	slots: RwLock<Vec<Slot<T>>>,
	next_id: AtomicU64,
}

impl<T> Signal<T> {
	/// Creates a signal with no receivers.
	pub fn new() -> Self {
		Self {
			slots: RwLock::new(Vec::new()),
			next_id: AtomicU64::new(1),
		}
	}

	/// Connects a receiver; the returned id disconnects it again.
	pub fn connect<F>(&self, receiver: F) -> SubscriptionId
	where
		F: Fn(&T) + Send + Sync + 'static,
	{
		let id = SubscriptionId(self.next_id.fetch_add(1, Ordering::Relaxed));
		self.slots.write().push(Slot {
			id,
			receiver: Arc::new(receiver),
		});
		id
	}

	/// Disconnects a receiver. Returns whether it was still connected.
	pub fn disconnect(&self, id: SubscriptionId) -> bool {
		let mut slots = self.slots.write();
		let before = slots.len();
		slots.retain(|slot| slot.id != id);
		slots.len() < before
	}

	/// Invokes every connected receiver with the value.
	pub fn emit(&self, value: &T) {
		let receivers: Vec<Receiver<T>> = self
			.slots
			.read()
			.iter()
			.map(|slot| slot.receiver.clone())
			.collect();

		for receiver in receivers {
			receiver(value);
		}
	}

	/// Number of currently connected receivers.
	pub fn receiver_count(&self) -> usize {
		self.slots.read().len()
	}
}

impl<T> Default for Signal<T> {
	fn default() -> Self {
		Self::new()
	}
}

impl<T> std::fmt::Debug for Signal<T> {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("Signal")
			.field("receivers", &self.receiver_count())
			.finish()
	}
}
