//! Router assembly and imperative surface.
//!
//! [`RouterBuilder`] wires the route table, the chosen history backend, the
//! mount coordinator, the reconciler and the event bridge into a [`Router`].
//! Navigations that introduce a new path suspend on the mount handshake
//! before they reach the backend, so the destination instance is live by
//! the time the history moves.

use crate::context::{ActiveContext, RouteContext};
use crate::error::{NavigationError, Result};
use crate::events::EventBridge;
use crate::history::host::{HostConnector, HostHistory};
use crate::history::local::{HistoryMirror, LocalHistory};
use crate::history::{HistoryBackend, UnconfiguredHistory};
use crate::mount::{MountCoordinator, MountRegistry, PendingMounts};
use crate::reconciler::{Reconciler, RouteAssignment};
use crate::routes::{Route, RouteTable};
use grappelli_core::{Signal, StackEntry, SubscriptionId, TransitionEvent};
use serde_json::Value;
use std::sync::Arc;
use tracing::debug;

enum BackendChoice {
	Unconfigured,
	Local { mirror: Box<dyn HistoryMirror> },
	LocalHeadless,
	Host {
		connector: Box<dyn HostConnector>,
		initial: Option<StackEntry>,
	},
}

/// Configures and assembles a [`Router`].
pub struct RouterBuilder {
	routes: Vec<Route>,
	backend: BackendChoice,
}

impl std::fmt::Debug for RouterBuilder {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("RouterBuilder")
			.field("routes", &self.routes)
			.finish_non_exhaustive()
	}
}

impl Default for RouterBuilder {
	fn default() -> Self {
		Self::new()
	}
}

impl RouterBuilder {
	/// Starts a builder with no routes and no backend.
	pub fn new() -> Self {
		Self {
			routes: Vec::new(),
			backend: BackendChoice::Unconfigured,
		}
	}

	/// Declares a route.
	pub fn route(mut self, route: Route) -> Self {
		self.routes.push(route);
		self
	}

	/// Uses the in-process backend, mirroring into the given history
	/// mechanism. The initial entry is seeded from the mirror's current
	/// location, which picks up deep links.
	pub fn local_history(mut self, mirror: Box<dyn HistoryMirror>) -> Self {
		self.backend = BackendChoice::Local { mirror };
		self
	}

	/// Uses the in-process backend without any surrounding history.
	pub fn headless_history(mut self) -> Self {
		self.backend = BackendChoice::LocalHeadless;
		self
	}

	/// Forwards every navigation to an external stack-based host.
	pub fn host_history(mut self, connector: Box<dyn HostConnector>) -> Self {
		self.backend = BackendChoice::Host {
			connector,
			initial: None,
		};
		self
	}

	/// Like [`RouterBuilder::host_history`], seeded with the entry the host
	/// launched on instead of a bare root.
	pub fn host_history_seeded(
		mut self,
		connector: Box<dyn HostConnector>,
		initial: StackEntry,
	) -> Self {
		self.backend = BackendChoice::Host {
			connector,
			initial: Some(initial),
		};
		self
	}

	/// Wires everything together.
	pub fn build(self) -> Router {
		let table = Arc::new(RouteTable::new());
		for route in self.routes {
			table.declare(route);
		}

		let transitions: Arc<Signal<TransitionEvent>> = Arc::new(Signal::new());

		let mut local = None;
		let mut host = None;
		let backend: Arc<dyn HistoryBackend> = match self.backend {
			BackendChoice::Unconfigured => Arc::new(UnconfiguredHistory),
			BackendChoice::Local { mirror } => {
				let history = Arc::new(LocalHistory::new(mirror, Arc::clone(&transitions)));
				local = Some(Arc::clone(&history));
				history
			}
			BackendChoice::LocalHeadless => {
				let history = Arc::new(LocalHistory::headless(Arc::clone(&transitions)));
				local = Some(Arc::clone(&history));
				history
			}
			BackendChoice::Host { connector, initial } => {
				let history = Arc::new(match initial {
					Some(entry) => HostHistory::with_initial(connector, entry),
					None => HostHistory::new(connector),
				});
				host = Some(Arc::clone(&history));
				history
			}
		};

		let registry = Arc::new(MountRegistry::new());
		let pending = Arc::new(PendingMounts::default());
		let reconciler = Arc::new(Reconciler::new(
			Arc::clone(&table),
			Arc::clone(&backend),
			Arc::clone(&pending),
		));
		let coordinator = Arc::new(MountCoordinator::new(
			Arc::clone(&registry),
			Arc::clone(&table),
			pending,
			Arc::clone(&reconciler),
		));
		let bridge = Arc::new(EventBridge::new(
			Arc::clone(&table),
			Arc::clone(&backend),
			Arc::clone(&reconciler),
		));

		// Backends announce transitions on the shared channel; the bridge
		// folds them into the active context. Weak, so tearing the router
		// down severs the subscription instead of leaking a cycle.
		let folding = Arc::downgrade(&bridge);
		transitions.connect(move |event| {
			if let Some(bridge) = folding.upgrade() {
				bridge.handle(event);
			}
		});

		let initial_path = bridge.context().path;
		reconciler.recompute_with_active(&initial_path);
		debug!(path = %initial_path, "router assembled");

		Router {
			table,
			backend,
			local,
			host,
			registry,
			coordinator,
			reconciler,
			bridge,
			transitions,
		}
	}
}

/// The assembled navigation runtime.
pub struct Router {
	table: Arc<RouteTable>,
	backend: Arc<dyn HistoryBackend>,
	local: Option<Arc<LocalHistory>>,
	host: Option<Arc<HostHistory>>,
	registry: Arc<MountRegistry>,
	coordinator: Arc<MountCoordinator>,
	reconciler: Arc<Reconciler>,
	bridge: Arc<EventBridge>,
	transitions: Arc<Signal<TransitionEvent>>,
}

impl std::fmt::Debug for Router {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("Router")
			.field("context", &self.bridge.context())
			.finish_non_exhaustive()
	}
}

impl Router {
	/// Starts an empty [`RouterBuilder`].
	pub fn builder() -> RouterBuilder {
		RouterBuilder::new()
	}

	// --- imperative navigation ---

	/// Pushes a new entry, waiting for the destination instance to be
	/// mounted first.
	pub async fn push(&self, path: &str, state: Option<Value>) -> Result<()> {
		self.coordinator.ensure_mounted(path).await?;
		self.backend.push_named(path, state)
	}

	/// Replaces the current entry in place, waiting for the destination
	/// instance to be mounted first.
	pub async fn replace(&self, path: &str, state: Option<Value>) -> Result<()> {
		self.coordinator.ensure_mounted(path).await?;
		self.backend.replace_current(path, state)
	}

	/// Pops the current entry and pushes a new one, waiting for the
	/// destination instance to be mounted first.
	pub async fn pop_and_push(&self, path: &str, state: Option<Value>) -> Result<()> {
		self.coordinator.ensure_mounted(path).await?;
		self.backend.pop_and_push(path, state)
	}

	/// Removes every entry above the nearest one matching `until_path`,
	/// then pushes a new entry, waiting for the destination instance to be
	/// mounted first.
	pub async fn push_and_remove_until(
		&self,
		path: &str,
		until_path: &str,
		state: Option<Value>,
	) -> Result<()> {
		self.coordinator.ensure_mounted(path).await?;
		self.backend.push_and_remove_until(path, until_path, state)
	}

	/// Pops the current entry. Returns whether a pop happened; the result
	/// value is handed to the host when one is attached.
	pub fn pop(&self, result: Option<Value>) -> Result<bool> {
		self.backend.pop(result)
	}

	/// Moves back one entry, same as a pop with no result.
	pub fn back(&self) -> Result<bool> {
		self.backend.pop(None)
	}

	/// Pops only when an entry remains beneath the current one.
	pub fn maybe_pop(&self, result: Option<Value>) -> Result<bool> {
		self.backend.maybe_pop(result)
	}

	/// Rewinds to the nearest earlier entry with the given path.
	pub fn pop_until(&self, path: &str) -> Result<()> {
		self.backend.pop_until(path)
	}

	/// Whether there is an entry beneath the current one.
	pub fn can_pop(&self) -> bool {
		self.backend.can_pop()
	}

	// --- committed view ---

	/// Current concrete path.
	pub fn path(&self) -> String {
		self.backend.path()
	}

	/// Opaque state of the current entry.
	pub fn state(&self) -> Option<Value> {
		self.backend.state()
	}

	/// The navigation stack, root first.
	pub fn stack(&self) -> Vec<StackEntry> {
		self.backend.stack()
	}

	// --- context and subscriptions ---

	/// The current global context.
	pub fn context(&self) -> ActiveContext {
		self.bridge.context()
	}

	/// Derives the context one mounted instance observes.
	pub fn route_context(&self, assignment: &RouteAssignment) -> RouteContext {
		self.bridge
			.route_context(&assignment.pattern, &assignment.mounted_path)
	}

	/// Subscribes to global context updates.
	pub fn on_context<F>(&self, receiver: F) -> SubscriptionId
	where
		F: Fn(&ActiveContext) + Send + Sync + 'static,
	{
		self.bridge.updates().connect(receiver)
	}

	/// Drops a context subscription.
	pub fn disconnect_context(&self, id: SubscriptionId) -> bool {
		self.bridge.updates().disconnect(id)
	}

	/// The assignment list as of the last reconciliation.
	pub fn assignments(&self) -> Vec<RouteAssignment> {
		self.reconciler.assignments()
	}

	/// Subscribes to mounted-set updates.
	pub fn on_assignments<F>(&self, receiver: F) -> SubscriptionId
	where
		F: Fn(&Vec<RouteAssignment>) + Send + Sync + 'static,
	{
		self.reconciler.updates().connect(receiver)
	}

	/// Drops an assignment subscription.
	pub fn disconnect_assignments(&self, id: SubscriptionId) -> bool {
		self.reconciler.updates().disconnect(id)
	}

	/// The raw transition channel, for observers that want the events
	/// themselves rather than the folded context.
	pub fn transitions(&self) -> &Signal<TransitionEvent> {
		&self.transitions
	}

	// --- route declarations ---

	/// Declares a route at runtime. Re-declaring a pattern replaces it in
	/// place.
	pub fn declare(&self, route: Route) {
		self.table.declare(route);
		self.reconciler.recompute();
	}

	/// Removes a declared route. Outstanding pre-mount requests for paths
	/// it matched are discarded at the next settle pass.
	pub fn undeclare(&self, pattern: &str) -> bool {
		let removed = self.table.undeclare(pattern);
		if removed {
			self.reconciler.recompute();
		}
		removed
	}

	// --- mount collaboration ---

	/// The registry the render collaborator confirms instances in.
	pub fn registry(&self) -> &Arc<MountRegistry> {
		&self.registry
	}

	/// Suspends until an instance for `pathname` is confirmed mounted.
	pub async fn ensure_mounted(&self, pathname: &str) -> Result<()> {
		self.coordinator.ensure_mounted(pathname).await
	}

	/// Sweeps outstanding pre-mount requests. The render collaborator
	/// calls this after applying every render pass.
	pub fn settle(&self) {
		self.coordinator.settle()
	}

	// --- host integration ---

	/// Feeds one transition into the router, on behalf of a host runtime
	/// that observed the movement. For host-initiated pops, sync the stack
	/// snapshot first so fallbacks resolve against the post-pop view.
	pub fn announce_transition(&self, event: TransitionEvent) {
		self.transitions.emit(&event);
	}

	/// Replaces the cached host stack with an authoritative snapshot.
	pub fn sync_host_snapshot(&self, stack: Vec<StackEntry>) -> Result<()> {
		match &self.host {
			Some(host) => {
				host.sync_snapshot(stack);
				Ok(())
			}
			None => Err(NavigationError::NotConfigured),
		}
	}

	/// Applies an externally observed history jump of `delta` entries to
	/// the in-process backend. The caller derives the delta, for example
	/// from an index stamped into the surrounding history's state.
	pub fn apply_external_jump(&self, delta: i64) -> Result<()> {
		match &self.local {
			Some(local) => local.apply_external_jump(delta),
			None => Err(NavigationError::NotConfigured),
		}
	}
}
