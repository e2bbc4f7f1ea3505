//! Navigation stack entries.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One entry in the host's navigation stack.
///
/// Stacks are ordered root first, current top last. Entries are appended on
/// push and truncated on pop/remove-until, never reordered.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StackEntry {
	/// Concrete pathname of the entry.
	pub path: String,
	/// Opaque state attached by whoever pushed the entry.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub state: Option<Value>,
}

impl StackEntry {
	/// Creates an entry with attached state.
	pub fn new(path: impl Into<String>, state: Option<Value>) -> Self {
		Self {
			path: path.into(),
			state,
		}
	}

	/// Creates a stateless entry.
	pub fn bare(path: impl Into<String>) -> Self {
		Self {
			path: path.into(),
			state: None,
		}
	}
}

/// Returns the path of the top (current) entry, if any.
pub fn top_path(stack: &[StackEntry]) -> Option<&str> {
	stack.last().map(|entry| entry.path.as_str())
}

/// Whether any entry in the stack carries the given concrete path.
pub fn contains_path(stack: &[StackEntry], path: &str) -> bool {
	stack.iter().any(|entry| entry.path == path)
}
