//! Host-bridge history backend.
//!
//! [`HostHistory`] forwards every mutation to an external stack-based
//! navigation runtime as a serialized [`HostCommand`] and keeps a
//! synchronous cache of the stack so read accessors answer without a round
//! trip. The host stays authoritative: the embedder overwrites the cache
//! with [`HostHistory::sync_snapshot`] whenever the host moved on its own,
//! and announces the host's transition events on the shared channel.

use crate::error::Result;
use crate::history::{EntryList, HistoryBackend};
use grappelli_core::StackEntry;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

/// A navigation command forwarded to the host runtime.
///
/// The wire shape is `{ "command": "...", ... }` with camelCase command
/// tags.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "camelCase")]
pub enum HostCommand {
	/// Push a new entry.
	Push {
		path: String,
		#[serde(default, skip_serializing_if = "Option::is_none")]
		state: Option<Value>,
	},
	/// Replace the current entry.
	Replace {
		path: String,
		#[serde(default, skip_serializing_if = "Option::is_none")]
		state: Option<Value>,
	},
	/// Pop the current entry, optionally handing a result to its awaiter.
	Pop {
		#[serde(default, skip_serializing_if = "Option::is_none")]
		result: Option<Value>,
	},
	/// Pop until the named entry is current.
	PopUntil { path: String },
	/// Push a new entry after removing everything above the named one.
	PushAndRemoveUntil {
		path: String,
		until: String,
		#[serde(default, skip_serializing_if = "Option::is_none")]
		state: Option<Value>,
	},
	/// Pop the current entry and push a new one in a single host step.
	PopAndPush {
		path: String,
		#[serde(default, skip_serializing_if = "Option::is_none")]
		state: Option<Value>,
		#[serde(default, skip_serializing_if = "Option::is_none")]
		result: Option<Value>,
	},
}

/// The channel into the host runtime; implemented by the embedder.
pub trait HostConnector: Send + Sync {
	/// Delivers one command. Failures surface as
	/// [`NavigationError::Bridge`](crate::error::NavigationError::Bridge).
	fn send(&self, command: HostCommand) -> Result<()>;
}

/// A history backend bridged to an external navigation host.
pub struct HostHistory {
	cache: Mutex<EntryList>,
	connector: Box<dyn HostConnector>,
}

impl std::fmt::Debug for HostHistory {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("HostHistory")
			.field("cache", &self.cache)
			.finish_non_exhaustive()
	}
}

impl HostHistory {
	/// Creates a backend over the given connector, seeded at the root path.
	pub fn new(connector: Box<dyn HostConnector>) -> Self {
		Self::with_initial(connector, StackEntry::bare("/"))
	}

	/// Creates a backend seeded with a known current entry, for embedders
	/// that attach after the host already navigated.
	pub fn with_initial(connector: Box<dyn HostConnector>, initial: StackEntry) -> Self {
		Self {
			cache: Mutex::new(EntryList::new(initial)),
			connector,
		}
	}

	/// Overwrites the cached stack with the host's authoritative snapshot.
	///
	/// Call this before announcing the transition that moved the host, so
	/// subscribers reacting to the event observe the post-change stack. An
	/// empty snapshot resets the cache to a bare root.
	pub fn sync_snapshot(&self, entries: Vec<StackEntry>) {
		debug!(depth = entries.len(), "host snapshot applied");
		self.cache.lock().reset(entries);
	}
}

impl HistoryBackend for HostHistory {
	fn path(&self) -> String {
		self.cache.lock().current().path.clone()
	}

	fn state(&self) -> Option<Value> {
		self.cache.lock().current().state.clone()
	}

	fn stack(&self) -> Vec<StackEntry> {
		self.cache.lock().stack()
	}

	fn push_named(&self, path: &str, state: Option<Value>) -> Result<()> {
		// Dispatch first: a failed bridge must leave the cache untouched.
		self.connector.send(HostCommand::Push {
			path: path.to_string(),
			state: state.clone(),
		})?;

		self.cache.lock().push(StackEntry::new(path, state));
		debug!(path = %path, "push forwarded to host");
		Ok(())
	}

	fn replace_current(&self, path: &str, state: Option<Value>) -> Result<()> {
		self.connector.send(HostCommand::Replace {
			path: path.to_string(),
			state: state.clone(),
		})?;

		self.cache.lock().replace(StackEntry::new(path, state));
		debug!(path = %path, "replace forwarded to host");
		Ok(())
	}

	fn pop(&self, result: Option<Value>) -> Result<bool> {
		if !self.cache.lock().can_pop() {
			debug!("pop refused, cached stack is at the root entry");
			return Ok(false);
		}

		self.connector.send(HostCommand::Pop { result })?;
		self.cache.lock().pop();
		Ok(true)
	}

	fn can_pop(&self) -> bool {
		self.cache.lock().can_pop()
	}

	fn pop_until(&self, target_path: &str) -> Result<()> {
		{
			let cache = self.cache.lock();
			let stack = cache.stack();
			match stack.iter().rposition(|e| e.path == target_path) {
				None => {
					warn!(target = %target_path, "pop_until target not in cached stack, ignoring");
					return Ok(());
				}
				Some(pos) if pos + 1 == stack.len() => return Ok(()),
				Some(_) => {}
			}
		}

		self.connector.send(HostCommand::PopUntil {
			path: target_path.to_string(),
		})?;
		self.cache.lock().pop_until(target_path);
		Ok(())
	}

	fn push_and_remove_until(
		&self,
		new_path: &str,
		until_path: &str,
		state: Option<Value>,
	) -> Result<()> {
		self.connector.send(HostCommand::PushAndRemoveUntil {
			path: new_path.to_string(),
			until: until_path.to_string(),
			state: state.clone(),
		})?;

		self.cache
			.lock()
			.remove_until_and_push(until_path, StackEntry::new(new_path, state));
		Ok(())
	}

	fn pop_and_push(&self, path: &str, state: Option<Value>) -> Result<()> {
		// One host step instead of the default pop-then-push sequence.
		self.connector.send(HostCommand::PopAndPush {
			path: path.to_string(),
			state: state.clone(),
			result: None,
		})?;

		let mut cache = self.cache.lock();
		cache.pop();
		cache.push(StackEntry::new(path, state));
		Ok(())
	}
}
