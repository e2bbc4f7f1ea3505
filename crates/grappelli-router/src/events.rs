//! Transition event bridge.
//!
//! Every stack movement, whether backend-emitted or announced by the
//! embedder on behalf of the host runtime, flows through [`EventBridge`].
//! It folds the event into the global [`ActiveContext`] under the
//! per-kind derivation rules, publishes the new context, and pokes the
//! reconciler with the new active path.

use crate::context::{ActiveContext, RouteContext};
use crate::history::HistoryBackend;
use crate::pattern::RoutePattern;
use crate::reconciler::Reconciler;
use crate::routes::RouteTable;
use grappelli_core::{Signal, TransitionEvent, TransitionKind, top_path};
use parking_lot::Mutex;
use std::sync::Arc;
use tracing::debug;

/// Maintains the global active context from the transition stream.
pub(crate) struct EventBridge {
	table: Arc<RouteTable>,
	backend: Arc<dyn HistoryBackend>,
	reconciler: Arc<Reconciler>,
	context: Mutex<ActiveContext>,
	updates: Signal<ActiveContext>,
}

impl std::fmt::Debug for EventBridge {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("EventBridge")
			.field("context", &self.context)
			.finish_non_exhaustive()
	}
}

impl EventBridge {
	/// Builds the bridge with an initial context taken from the backend's
	/// current entry. The initial kind is `None`: restored state activates
	/// no route until a real transition arrives.
	pub(crate) fn new(
		table: Arc<RouteTable>,
		backend: Arc<dyn HistoryBackend>,
		reconciler: Arc<Reconciler>,
	) -> Self {
		let initial = ActiveContext::resolve(&table, backend.path(), backend.state(), None);
		Self {
			table,
			backend,
			reconciler,
			context: Mutex::new(initial),
			updates: Signal::new(),
		}
	}

	/// The current global context.
	pub(crate) fn context(&self) -> ActiveContext {
		self.context.lock().clone()
	}

	/// Signal fired with the new context after every accepted transition.
	pub(crate) fn updates(&self) -> &Signal<ActiveContext> {
		&self.updates
	}

	/// Derives the context seen by one mounted instance.
	pub(crate) fn route_context(
		&self,
		pattern: &RoutePattern,
		mounted_path: &str,
	) -> RouteContext {
		RouteContext::derive(&self.context.lock(), pattern, mounted_path)
	}

	/// Folds one transition into the global context.
	///
	/// Path derivation is per kind: forward and reveal kinds take the
	/// event path, falling back to the stack top and then the last known
	/// path. A plain pop names the entry being left; when that differs
	/// from the current active path the reveal has already been applied
	/// and the event is dropped without touching the context.
	pub(crate) fn handle(&self, event: &TransitionEvent) {
		let previous = self.context.lock().clone();
		let stack = self.backend.stack();
		let stack_top = top_path(&stack).map(str::to_string);

		let new_active = match event.kind() {
			TransitionKind::Push | TransitionKind::PushNext | TransitionKind::PopNext => event
				.path()
				.map(str::to_string)
				.or(stack_top)
				.unwrap_or(previous.path),
			TransitionKind::Pop => match event.path() {
				Some(path) if path != previous.path => {
					debug!(left = %path, active = %previous.path, "pop of a non-active entry, context unchanged");
					return;
				}
				_ => stack_top.unwrap_or(previous.path),
			},
		};

		// State preference mirrors the path rules: an activating event's
		// own state wins, then the matching stack entry, then whatever the
		// backend reports as current. A pop's event state is the leaving
		// entry's and is never consulted.
		let entry_state = stack
			.iter()
			.rev()
			.find(|entry| entry.path == new_active)
			.and_then(|entry| entry.state.clone());
		let state = match event.kind() {
			TransitionKind::Pop => entry_state.or_else(|| self.backend.state()),
			_ => event
				.state()
				.cloned()
				.or(entry_state)
				.or_else(|| self.backend.state()),
		};

		let context = ActiveContext::resolve(&self.table, new_active, state, Some(event.kind()));
		debug!(path = %context.path, kind = %event.kind(), "active context updated");
		*self.context.lock() = context.clone();

		// Mounted set first so a new instance exists before subscribers
		// re-derive their route contexts.
		self.reconciler.recompute_with_active(&context.path);
		self.updates.emit(&context);
	}
}
