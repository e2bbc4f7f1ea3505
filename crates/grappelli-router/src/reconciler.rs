//! Mounted-set reconciliation.
//!
//! The reconciler folds every source of "this path needs a live instance"
//! into one ordered assignment list: statically mounted declarations, the
//! navigation stack, pre-mount holds, and the active path. The render
//! collaborator subscribes to the output and materializes one instance per
//! assignment.

use crate::history::HistoryBackend;
use crate::mount::PendingMounts;
use crate::pattern::RoutePattern;
use crate::routes::RouteTable;
use grappelli_core::Signal;
use parking_lot::Mutex;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::debug;

/// One instance the render collaborator must keep alive: the owning route
/// pattern and the concrete path the instance is mounted at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteAssignment {
	/// Pattern of the route that renders this instance.
	pub pattern: RoutePattern,
	/// Concrete path the instance is mounted at.
	pub mounted_path: String,
}

/// Recomputes the mounted set and publishes it when it changes.
pub struct Reconciler {
	table: Arc<RouteTable>,
	backend: Arc<dyn HistoryBackend>,
	pending: Arc<PendingMounts>,
	active_path: Mutex<Option<String>>,
	last: Mutex<Vec<RouteAssignment>>,
	updates: Signal<Vec<RouteAssignment>>,
}

impl std::fmt::Debug for Reconciler {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("Reconciler")
			.field("active_path", &self.active_path)
			.field("last", &self.last)
			.finish_non_exhaustive()
	}
}

impl Reconciler {
	pub(crate) fn new(
		table: Arc<RouteTable>,
		backend: Arc<dyn HistoryBackend>,
		pending: Arc<PendingMounts>,
	) -> Self {
		Self {
			table,
			backend,
			pending,
			active_path: Mutex::new(None),
			last: Mutex::new(Vec::new()),
			updates: Signal::new(),
		}
	}

	/// The assignment list as of the last recompute.
	pub fn assignments(&self) -> Vec<RouteAssignment> {
		self.last.lock().clone()
	}

	/// Signal fired with the full assignment list whenever it changes.
	pub fn updates(&self) -> &Signal<Vec<RouteAssignment>> {
		&self.updates
	}

	/// Recomputes with the cached active path.
	pub fn recompute(&self) {
		let assignments = self.compute();
		self.publish(assignments);
	}

	/// Records a new active path, then recomputes.
	pub fn recompute_with_active(&self, path: &str) {
		*self.active_path.lock() = Some(path.to_string());
		self.recompute();
	}

	fn publish(&self, assignments: Vec<RouteAssignment>) {
		{
			let mut last = self.last.lock();
			if *last == assignments {
				return;
			}
			*last = assignments.clone();
		}
		debug!(count = assignments.len(), "mounted set recomputed");
		self.updates.emit(&assignments);
	}

	fn compute(&self) -> Vec<RouteAssignment> {
		let routes = self.table.snapshot();
		let stack = self.backend.stack();
		let stack_paths: Vec<String> = stack.into_iter().map(|entry| entry.path).collect();

		// Holds that landed in the stack have served their purpose.
		self.pending.prune_landed(&stack_paths);

		let mut assignments: Vec<RouteAssignment> = Vec::new();
		let mut seen: HashSet<String> = HashSet::new();

		// Statically mounted declarations own their paths outright and are
		// never re-matched against the table.
		for route in &routes {
			for path in route.static_mounts() {
				if seen.insert(path.clone()) {
					assignments.push(RouteAssignment {
						pattern: route.pattern().clone(),
						mounted_path: path.clone(),
					});
				}
			}
		}

		// Everything else in priority order: live stack entries, pre-mount
		// holds, then the active path. First occurrence of a concrete path
		// wins.
		let mut dynamic = stack_paths;
		dynamic.extend(self.pending.force_included());
		if let Some(active) = self.active_path.lock().clone() {
			dynamic.push(active);
		}

		for path in dynamic {
			if seen.contains(&path) {
				continue;
			}
			match self.table.best_match(&path) {
				Some((pattern, _)) => {
					seen.insert(path.clone());
					assignments.push(RouteAssignment {
						pattern,
						mounted_path: path,
					});
				}
				None => {
					debug!(path = %path, "no declared route matches, left out of mounted set");
				}
			}
		}

		assignments
	}
}
