//! Navigation transition vocabulary.
//!
//! The host runtime reports every stack movement as one of four transition
//! kinds. [`TransitionEvent`] is the closed union the event bridge consumes;
//! [`TransitionKind`] is the fieldless discriminant used wherever only the
//! kind matters (context derivation, logging).

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The four ways a stack movement is reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TransitionKind {
	/// Forward navigation onto a new or replaced current entry.
	Push,
	/// A new entry was stacked on top of the reported one.
	PushNext,
	/// The reported entry is being left by a pop.
	Pop,
	/// The reported entry is revealed by popping the entry above it.
	PopNext,
}

impl std::fmt::Display for TransitionKind {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			Self::Push => write!(f, "push"),
			Self::PushNext => write!(f, "pushNext"),
			Self::Pop => write!(f, "pop"),
			Self::PopNext => write!(f, "popNext"),
		}
	}
}

/// A host- or backend-emitted navigation transition.
///
/// Each variant carries exactly what its kind provides: forward kinds and
/// pop-reveal may name the destination path and its state; a plain pop only
/// names the entry being left, whose state is never consulted. The wire
/// shape is `{ "kind": "...", "path": ..., "state": ... }` with camelCase
/// kind tags.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum TransitionEvent {
	/// Forward navigation: the destination becomes current.
	Push {
		#[serde(default, skip_serializing_if = "Option::is_none")]
		path: Option<String>,
		#[serde(default, skip_serializing_if = "Option::is_none")]
		state: Option<Value>,
	},
	/// A new entry was pushed on top of the reported one.
	PushNext {
		#[serde(default, skip_serializing_if = "Option::is_none")]
		path: Option<String>,
		#[serde(default, skip_serializing_if = "Option::is_none")]
		state: Option<Value>,
	},
	/// The reported entry is being left by a pop.
	Pop {
		#[serde(default, skip_serializing_if = "Option::is_none")]
		path: Option<String>,
	},
	/// The reported entry is revealed by a pop of the entry above it.
	PopNext {
		#[serde(default, skip_serializing_if = "Option::is_none")]
		path: Option<String>,
		#[serde(default, skip_serializing_if = "Option::is_none")]
		state: Option<Value>,
	},
}

impl TransitionEvent {
	/// Returns the discriminant of this event.
	pub fn kind(&self) -> TransitionKind {
		match self {
			Self::Push { .. } => TransitionKind::Push,
			Self::PushNext { .. } => TransitionKind::PushNext,
			Self::Pop { .. } => TransitionKind::Pop,
			Self::PopNext { .. } => TransitionKind::PopNext,
		}
	}

	/// Returns the path reported with this event, if any.
	pub fn path(&self) -> Option<&str> {
		match self {
			Self::Push { path, .. }
			| Self::PushNext { path, .. }
			| Self::Pop { path }
			| Self::PopNext { path, .. } => path.as_deref(),
		}
	}

	/// Returns the state reported with this event. A pop never carries one.
	pub fn state(&self) -> Option<&Value> {
		match self {
			Self::Push { state, .. }
			| Self::PushNext { state, .. }
			| Self::PopNext { state, .. } => state.as_ref(),
			Self::Pop { .. } => None,
		}
	}

	/// Whether this is a forward-kind transition (push or stacked push).
	pub fn is_forward(&self) -> bool {
		matches!(self, Self::Push { .. } | Self::PushNext { .. })
	}
}
