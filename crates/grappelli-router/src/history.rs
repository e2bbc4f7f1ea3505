//! Navigation history backends.
//!
//! [`HistoryBackend`] abstracts the navigation host behind the imperative
//! surface the router exposes. Two interchangeable implementations exist:
//! [`local::LocalHistory`] keeps the stack in process and mirrors it into
//! the surrounding history mechanism, while [`host::HostHistory`] forwards
//! every mutation to an external stack-based runtime and caches its view of
//! the stack. [`UnconfiguredHistory`] is the fail-fast placeholder used when
//! neither is set up.

pub mod host;
pub mod local;
#[cfg(all(target_family = "wasm", target_os = "unknown"))]
pub mod web;

use crate::error::{NavigationError, Result};
use grappelli_core::StackEntry;
use serde_json::Value;
use tracing::warn;

/// The contract every navigation backend satisfies.
///
/// Read accessors report the committed view. Mutators commit their change
/// before any transition is announced on the shared channel, so a
/// subscriber reacting to a transition always observes the post-mutation
/// stack.
pub trait HistoryBackend: Send + Sync {
	/// Current concrete path.
	fn path(&self) -> String;

	/// Opaque state of the current entry.
	fn state(&self) -> Option<Value>;

	/// The navigation stack, root first, current entry last.
	fn stack(&self) -> Vec<StackEntry>;

	/// Appends a new entry and makes it current.
	fn push_named(&self, path: &str, state: Option<Value>) -> Result<()>;

	/// Overwrites the current entry in place, without growing the stack.
	fn replace_current(&self, path: &str, state: Option<Value>) -> Result<()>;

	/// Moves back one entry. Returns whether a pop happened. The result
	/// value is handed to the host when one is attached.
	fn pop(&self, result: Option<Value>) -> Result<bool>;

	/// Whether there is an entry beneath the current one.
	fn can_pop(&self) -> bool;

	/// Pops only when possible. Returns whether a pop happened.
	fn maybe_pop(&self, result: Option<Value>) -> Result<bool> {
		if self.can_pop() {
			self.pop(result)
		} else {
			Ok(false)
		}
	}

	/// Rewinds to the nearest earlier entry with the given path. A missing
	/// target leaves the stack untouched.
	fn pop_until(&self, target_path: &str) -> Result<()>;

	/// Removes every entry above the nearest one matching `until_path` (the
	/// match itself is kept), then pushes a new entry. When nothing matches,
	/// the whole stack is replaced by the new entry.
	fn push_and_remove_until(
		&self,
		new_path: &str,
		until_path: &str,
		state: Option<Value>,
	) -> Result<()>;

	/// Pops the current entry, then pushes a new one.
	fn pop_and_push(&self, path: &str, state: Option<Value>) -> Result<()> {
		self.pop(None)?;
		self.push_named(path, state)
	}
}

/// The pointer-indexed entry list the in-process backends share.
///
/// Entries ahead of the pointer are the forward tail left behind by pops
/// and external back gestures; a push drops it. `stack()` reports only the
/// live range up to the pointer.
#[derive(Debug, Clone)]
pub(crate) struct EntryList {
	entries: Vec<StackEntry>,
	index: usize,
}

impl EntryList {
	pub(crate) fn new(initial: StackEntry) -> Self {
		Self {
			entries: vec![initial],
			index: 0,
		}
	}

	pub(crate) fn current(&self) -> &StackEntry {
		&self.entries[self.index]
	}

	pub(crate) fn stack(&self) -> Vec<StackEntry> {
		self.entries[..=self.index].to_vec()
	}

	pub(crate) fn depth(&self) -> usize {
		self.index + 1
	}

	/// Appends an entry, dropping any forward tail. Returns the entry it
	/// covers.
	pub(crate) fn push(&mut self, entry: StackEntry) -> StackEntry {
		let covered = self.entries[self.index].clone();
		self.entries.truncate(self.index + 1);
		self.entries.push(entry);
		self.index += 1;
		covered
	}

	/// Overwrites the current entry. Returns the replaced entry.
	pub(crate) fn replace(&mut self, entry: StackEntry) -> StackEntry {
		std::mem::replace(&mut self.entries[self.index], entry)
	}

	pub(crate) fn can_pop(&self) -> bool {
		self.index > 0
	}

	/// Moves the pointer back one entry. Returns the entry being left and
	/// the entry revealed.
	pub(crate) fn pop(&mut self) -> Option<(StackEntry, StackEntry)> {
		if self.index == 0 {
			return None;
		}
		let left = self.entries[self.index].clone();
		self.index -= 1;
		Some((left, self.entries[self.index].clone()))
	}

	/// Rewinds to the nearest live entry (current included) whose path
	/// equals `path`. Returns the number of entries stepped over plus the
	/// left and revealed entries; `None` when no live entry matches.
	pub(crate) fn pop_until(&mut self, path: &str) -> Option<(usize, StackEntry, StackEntry)> {
		let target = self.entries[..=self.index]
			.iter()
			.rposition(|entry| entry.path == path)?;
		let steps = self.index - target;
		let left = self.entries[self.index].clone();
		self.index = target;
		Some((steps, left, self.entries[self.index].clone()))
	}

	/// Drops every live entry above the nearest one matching `until_path`
	/// (the match is kept), then pushes `entry`. Returns whether a match
	/// was found and the entry the push covers, if any survives.
	pub(crate) fn remove_until_and_push(
		&mut self,
		until_path: &str,
		entry: StackEntry,
	) -> (bool, Option<StackEntry>) {
		self.entries.truncate(self.index + 1);
		match self.entries.iter().rposition(|e| e.path == until_path) {
			Some(target) => {
				self.entries.truncate(target + 1);
				let covered = self.entries[target].clone();
				self.entries.push(entry);
				self.index = target + 1;
				(true, Some(covered))
			}
			None => {
				self.entries.clear();
				self.entries.push(entry);
				self.index = 0;
				(false, None)
			}
		}
	}

	/// Repositions the pointer by `delta` without dropping entries. Returns
	/// the entry being left and the new current entry; `None` when the jump
	/// lands out of bounds or `delta` is zero.
	pub(crate) fn jump(&mut self, delta: i64) -> Option<(StackEntry, StackEntry)> {
		if delta == 0 {
			return None;
		}
		let target = self.index as i64 + delta;
		if target < 0 || target as usize >= self.entries.len() {
			return None;
		}
		let from = self.entries[self.index].clone();
		self.index = target as usize;
		Some((from, self.entries[self.index].clone()))
	}

	/// Replaces the whole list. An empty snapshot resets to a bare root.
	pub(crate) fn reset(&mut self, entries: Vec<StackEntry>) {
		if entries.is_empty() {
			self.entries = vec![StackEntry::bare("/")];
			self.index = 0;
		} else {
			self.index = entries.len() - 1;
			self.entries = entries;
		}
	}
}

/// The fail-fast backend used when no navigation environment is set up.
///
/// Mutating operations fail with [`NavigationError::NotConfigured`]; reads
/// degrade to a bare root so probing accessors stay total.
#[derive(Debug, Default, Clone, Copy)]
pub struct UnconfiguredHistory;

impl HistoryBackend for UnconfiguredHistory {
	fn path(&self) -> String {
		warn!("history backend not configured, reporting root path");
		"/".to_string()
	}

	fn state(&self) -> Option<Value> {
		None
	}

	fn stack(&self) -> Vec<StackEntry> {
		warn!("history backend not configured, reporting empty stack");
		Vec::new()
	}

	fn push_named(&self, _path: &str, _state: Option<Value>) -> Result<()> {
		Err(NavigationError::NotConfigured)
	}

	fn replace_current(&self, _path: &str, _state: Option<Value>) -> Result<()> {
		Err(NavigationError::NotConfigured)
	}

	fn pop(&self, _result: Option<Value>) -> Result<bool> {
		Err(NavigationError::NotConfigured)
	}

	fn can_pop(&self) -> bool {
		false
	}

	fn maybe_pop(&self, _result: Option<Value>) -> Result<bool> {
		Err(NavigationError::NotConfigured)
	}

	fn pop_until(&self, _target_path: &str) -> Result<()> {
		Err(NavigationError::NotConfigured)
	}

	fn push_and_remove_until(
		&self,
		_new_path: &str,
		_until_path: &str,
		_state: Option<Value>,
	) -> Result<()> {
		Err(NavigationError::NotConfigured)
	}
}
