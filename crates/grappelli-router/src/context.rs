//! Active-path context layers.
//!
//! [`ActiveContext`] is the global layer the event bridge publishes after
//! every accepted transition. [`RouteContext`] is the per-instance layer a
//! render collaborator derives for each mounted route; its params, state and
//! kind are populated only while that instance is the active one.

use crate::pattern::RoutePattern;
use crate::routes::RouteTable;
use grappelli_core::TransitionKind;
use serde_json::Value;
use std::collections::HashMap;

/// The global navigation context: which concrete path is on screen, with
/// what state, which declared pattern owns it, and which transition kind
/// put it there.
#[derive(Debug, Clone, PartialEq)]
pub struct ActiveContext {
	/// The concrete path currently considered on screen.
	pub path: String,
	/// Opaque state attached to the active entry.
	pub state: Option<Value>,
	/// The best-matching declared pattern, if any matches the active path.
	pub pattern: Option<String>,
	/// Parameters extracted by the best-matching pattern.
	pub params: HashMap<String, String>,
	/// The transition kind that produced this context. `None` until the
	/// first transition is observed.
	pub kind: Option<TransitionKind>,
}

impl ActiveContext {
	/// Builds the context for an active path by resolving its owning pattern
	/// against the declared routes.
	pub fn resolve(
		table: &RouteTable,
		path: String,
		state: Option<Value>,
		kind: Option<TransitionKind>,
	) -> Self {
		let (pattern, params) = match table.best_match(&path) {
			Some((pattern, found)) => (Some(pattern.pattern().to_string()), found.params),
			None => (None, HashMap::new()),
		};

		Self {
			path,
			state,
			pattern,
			params,
			kind,
		}
	}

	/// Whether the transition kind that produced this context marks the
	/// active path's instance as active. Pops never do, and neither does
	/// the pre-transition initial context.
	pub fn is_activating(&self) -> bool {
		matches!(self.kind, Some(kind) if kind != TransitionKind::Pop)
	}
}

/// The context one mounted route instance observes.
#[derive(Debug, Clone, PartialEq)]
pub struct RouteContext {
	/// The pattern string of the route this instance belongs to.
	pub pattern: String,
	/// The concrete path this instance is mounted at.
	pub mounted_path: String,
	/// Parameters extracted from the mounted path by this instance's own
	/// pattern. Empty while inactive.
	pub params: HashMap<String, String>,
	/// State of the active entry. `None` while inactive.
	pub state: Option<Value>,
	/// The global active path at derivation time.
	pub active_path: String,
	/// The transition kind that activated this instance. `None` while
	/// inactive.
	pub kind: Option<TransitionKind>,
}

impl RouteContext {
	/// Derives the layer one instance sees from the global context.
	///
	/// The instance is active only when its mounted path equals the global
	/// active path under an activating kind. Params come from re-matching
	/// the instance's own pattern, which may differ from the globally
	/// best-matching one when a less specific route was pinned at the same
	/// concrete path.
	pub fn derive(global: &ActiveContext, pattern: &RoutePattern, mounted_path: &str) -> Self {
		let active = global.path == mounted_path && global.is_activating();

		let params = if active {
			pattern
				.matches(mounted_path)
				.map(|found| found.params)
				.unwrap_or_default()
		} else {
			HashMap::new()
		};

		Self {
			pattern: pattern.pattern().to_string(),
			mounted_path: mounted_path.to_string(),
			params,
			state: if active { global.state.clone() } else { None },
			active_path: global.path.clone(),
			kind: if active { global.kind } else { None },
		}
	}

	/// Whether this instance is the active one. The kind field is populated
	/// only while active, so presence is the test.
	pub fn is_active(&self) -> bool {
		self.kind.is_some()
	}
}
