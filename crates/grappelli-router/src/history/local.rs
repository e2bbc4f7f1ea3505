//! In-process history backend.
//!
//! [`LocalHistory`] owns the navigation stack and mirrors pointer movement
//! into a [`HistoryMirror`] so the surrounding history mechanism (the
//! browser on wasm targets) stays consistent with it. Headless environments
//! use the [`NullMirror`].

use crate::error::Result;
use crate::history::{EntryList, HistoryBackend};
use grappelli_core::{Signal, StackEntry, TransitionEvent};
use parking_lot::Mutex;
use serde_json::Value;
use std::collections::VecDeque;
use std::sync::Arc;
use tracing::{debug, warn};

/// The surrounding history mechanism a [`LocalHistory`] mirrors into.
///
/// Mirrors are best-effort: implementations swallow environment failures
/// rather than surfacing them, since the in-process list stays the source
/// of truth.
pub trait HistoryMirror: Send + Sync {
	/// Appends a new location.
	fn push_state(&self, path: &str, state: Option<&Value>);

	/// Overwrites the current location.
	fn replace_state(&self, path: &str, state: Option<&Value>);

	/// Moves the mirrored pointer by `delta` entries.
	fn go(&self, delta: i64);

	/// The current location, when the environment can report one.
	fn current_path(&self) -> Option<String>;

	/// Whether a [`go`](HistoryMirror::go) issued here arrives back through
	/// the gesture wiring as an [`LocalHistory::apply_external_jump`] call.
	fn echoes_jumps(&self) -> bool {
		false
	}
}

/// The headless mirror: discards every call and reports no location.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullMirror;

impl HistoryMirror for NullMirror {
	fn push_state(&self, _path: &str, _state: Option<&Value>) {}

	fn replace_state(&self, _path: &str, _state: Option<&Value>) {}

	fn go(&self, _delta: i64) {}

	fn current_path(&self) -> Option<String> {
		None
	}
}

/// A history backend over an in-process entry list.
pub struct LocalHistory {
	list: Mutex<EntryList>,
	// Jumps this backend initiated through the mirror; consumed before a
	// reported jump is interpreted as a user gesture.
	pending_echoes: Mutex<VecDeque<i64>>,
	mirror: Box<dyn HistoryMirror>,
	transitions: Arc<Signal<TransitionEvent>>,
}

impl std::fmt::Debug for LocalHistory {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("LocalHistory")
			.field("list", &self.list)
			.finish_non_exhaustive()
	}
}

impl LocalHistory {
	/// Creates a backend mirrored into the given environment.
	///
	/// The first entry is seeded from the mirror's current location when it
	/// reports one, so deep links land on the right route; `/` otherwise.
	pub fn new(mirror: Box<dyn HistoryMirror>, transitions: Arc<Signal<TransitionEvent>>) -> Self {
		let initial = mirror
			.current_path()
			.unwrap_or_else(|| "/".to_string());
		debug!(path = %initial, "local history seeded");

		Self {
			list: Mutex::new(EntryList::new(StackEntry::bare(initial))),
			pending_echoes: Mutex::new(VecDeque::new()),
			mirror,
			transitions,
		}
	}

	/// Creates a backend with no surrounding history mechanism.
	pub fn headless(transitions: Arc<Signal<TransitionEvent>>) -> Self {
		Self::new(Box::new(NullMirror), transitions)
	}

	/// Applies a back/forward gesture reported by the environment.
	///
	/// The gesture wiring feeds every reported jump here, including the
	/// echoes of jumps this backend itself issued through the mirror; those
	/// are consumed without touching the already-committed list.
	pub fn apply_external_jump(&self, delta: i64) -> Result<()> {
		{
			let mut echoes = self.pending_echoes.lock();
			if echoes.front() == Some(&delta) {
				echoes.pop_front();
				debug!(delta, "mirror echo consumed");
				return Ok(());
			}
		}

		let jumped = self.list.lock().jump(delta);
		let (from, to) = match jumped {
			Some(moved) => moved,
			None => {
				warn!(delta, "external jump out of range, ignoring");
				return Ok(());
			}
		};

		debug!(delta, from = %from.path, to = %to.path, "external jump applied");
		if delta < 0 {
			self.emit_pop_pair(&from, &to);
		} else {
			self.transitions.emit(&TransitionEvent::Push {
				path: Some(to.path),
				state: to.state,
			});
		}
		Ok(())
	}

	/// Issues a mirror jump, remembering it so the echo is not taken for a
	/// gesture.
	fn mirror_go(&self, delta: i64) {
		if self.mirror.echoes_jumps() {
			self.pending_echoes.lock().push_back(delta);
		}
		self.mirror.go(delta);
	}

	fn emit_pop_pair(&self, left: &StackEntry, revealed: &StackEntry) {
		// Reveal before leave, matching the host observer order the event
		// bridge is written against.
		self.transitions.emit(&TransitionEvent::PopNext {
			path: Some(revealed.path.clone()),
			state: revealed.state.clone(),
		});
		self.transitions.emit(&TransitionEvent::Pop {
			path: Some(left.path.clone()),
		});
	}

	fn emit_push_pair(&self, covered: Option<&StackEntry>, path: &str, state: Option<Value>) {
		if let Some(covered) = covered {
			self.transitions.emit(&TransitionEvent::PushNext {
				path: Some(covered.path.clone()),
				state: covered.state.clone(),
			});
		}
		self.transitions.emit(&TransitionEvent::Push {
			path: Some(path.to_string()),
			state,
		});
	}
}

impl HistoryBackend for LocalHistory {
	fn path(&self) -> String {
		self.list.lock().current().path.clone()
	}

	fn state(&self) -> Option<Value> {
		self.list.lock().current().state.clone()
	}

	fn stack(&self) -> Vec<StackEntry> {
		self.list.lock().stack()
	}

	fn push_named(&self, path: &str, state: Option<Value>) -> Result<()> {
		let covered = self
			.list
			.lock()
			.push(StackEntry::new(path, state.clone()));

		self.mirror.push_state(path, state.as_ref());
		debug!(path = %path, "pushed");
		self.emit_push_pair(Some(&covered), path, state);
		Ok(())
	}

	fn replace_current(&self, path: &str, state: Option<Value>) -> Result<()> {
		let replaced = self
			.list
			.lock()
			.replace(StackEntry::new(path, state.clone()));

		self.mirror.replace_state(path, state.as_ref());
		debug!(path = %path, replaced = %replaced.path, "replaced current entry");
		self.emit_push_pair(None, path, state);
		Ok(())
	}

	fn pop(&self, result: Option<Value>) -> Result<bool> {
		let popped = self.list.lock().pop();
		let (left, revealed) = match popped {
			Some(moved) => moved,
			None => {
				debug!("pop refused, already at the root entry");
				return Ok(false);
			}
		};

		if let Some(result) = result {
			// Nothing awaits pop results without a host attached.
			debug!(result = ?result, "pop result dropped");
		}

		self.mirror_go(-1);
		debug!(left = %left.path, revealed = %revealed.path, "popped");
		self.emit_pop_pair(&left, &revealed);
		Ok(true)
	}

	fn can_pop(&self) -> bool {
		self.list.lock().can_pop()
	}

	fn pop_until(&self, target_path: &str) -> Result<()> {
		let rewound = self.list.lock().pop_until(target_path);
		let (steps, left, revealed) = match rewound {
			Some(outcome) => outcome,
			None => {
				warn!(target = %target_path, "pop_until target not in stack, ignoring");
				return Ok(());
			}
		};

		if steps == 0 {
			return Ok(());
		}

		self.mirror_go(-(steps as i64));
		debug!(target = %target_path, steps, "rewound");
		self.emit_pop_pair(&left, &revealed);
		Ok(())
	}

	fn push_and_remove_until(
		&self,
		new_path: &str,
		until_path: &str,
		state: Option<Value>,
	) -> Result<()> {
		let entry = StackEntry::new(new_path, state.clone());
		let (found, covered, back_steps) = {
			let mut list = self.list.lock();
			let before = list.stack();
			let target = before.iter().rposition(|e| e.path == until_path);
			let (found, covered) = list.remove_until_and_push(until_path, entry);
			// Steps from the old top down to the kept match, or to the root
			// when nothing matched.
			let back_steps = before.len() - 1 - target.unwrap_or(0);
			(found, covered, back_steps)
		};

		// The mirror cannot remove interior entries; walking back to the
		// survivor before pushing leaves the stale tail where the next push
		// truncates it. With no survivor the rewound root is replaced.
		if back_steps > 0 {
			self.mirror_go(-(back_steps as i64));
		}
		if found {
			self.mirror.push_state(new_path, state.as_ref());
		} else {
			self.mirror.replace_state(new_path, state.as_ref());
		}

		debug!(
			path = %new_path,
			until = %until_path,
			found,
			"pushed with removal"
		);
		self.emit_push_pair(covered.as_ref(), new_path, state);
		Ok(())
	}
}
