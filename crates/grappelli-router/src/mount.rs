//! Mount coordination.
//!
//! Before an imperative navigation reaches the backend, the target path's
//! route instance must already exist in the render tree, otherwise the host
//! switches screens to a view that is not there yet. [`MountCoordinator`]
//! brokers that handshake: [`MountCoordinator::ensure_mounted`] registers a
//! pre-mount request and suspends until the render collaborator confirms
//! the instance in the [`MountRegistry`] and runs a
//! [`MountCoordinator::settle`] pass.

use crate::reconciler::Reconciler;
use crate::routes::RouteTable;
use parking_lot::{Mutex, RwLock};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tokio::sync::oneshot;
use tracing::{debug, warn};

/// The explicit record of which concrete paths have a live instance.
///
/// The render collaborator is the only writer: it confirms a path when the
/// instance for it is applied and withdraws it when the instance is
/// removed. `is_mounted` is the sole mount-detection primitive.
#[derive(Debug, Default)]
pub struct MountRegistry {
	mounted: RwLock<HashSet<String>>,
}

impl MountRegistry {
	/// Creates an empty registry.
	pub fn new() -> Self {
		Self::default()
	}

	/// Records that an instance exists for the given concrete path.
	pub fn confirm(&self, path: impl Into<String>) {
		let path = path.into();
		if self.mounted.write().insert(path.clone()) {
			debug!(path = %path, "mount confirmed");
		}
	}

	/// Records that the instance for the given path was removed.
	///
	/// Returns whether it was present.
	pub fn withdraw(&self, path: &str) -> bool {
		let removed = self.mounted.write().remove(path);
		if removed {
			debug!(path = %path, "mount withdrawn");
		}
		removed
	}

	/// Whether an instance exists for the given concrete path.
	pub fn is_mounted(&self, path: &str) -> bool {
		self.mounted.read().contains(path)
	}

	/// The currently confirmed paths, sorted for deterministic reads.
	pub fn mounted_paths(&self) -> Vec<String> {
		let mut paths: Vec<String> = self.mounted.read().iter().cloned().collect();
		paths.sort();
		paths
	}
}

/// Pre-mount bookkeeping shared between the coordinator and the reconciler.
///
/// `holds` are the paths force-included in the mounted-set computation. A
/// hold outlives its resolved request: it is withdrawn once the path lands
/// in the navigation stack (see [`PendingMounts::prune_landed`]) or its
/// request is discarded by the orphan policy. Hold order is insertion
/// order, which keeps reconciliation output deterministic.
#[derive(Debug, Default)]
pub(crate) struct PendingMounts {
	inner: Mutex<PendingInner>,
}

#[derive(Debug, Default)]
struct PendingInner {
	resolvers: HashMap<String, Vec<oneshot::Sender<()>>>,
	holds: Vec<String>,
}

impl PendingMounts {
	/// Registers a resolver for a pathname and places its hold.
	pub(crate) fn register(&self, path: &str, tx: oneshot::Sender<()>) {
		let mut inner = self.inner.lock();
		inner
			.resolvers
			.entry(path.to_string())
			.or_default()
			.push(tx);
		if !inner.holds.iter().any(|held| held == path) {
			inner.holds.push(path.to_string());
		}
	}

	/// Paths with outstanding resolvers.
	pub(crate) fn pending_paths(&self) -> Vec<String> {
		self.inner.lock().resolvers.keys().cloned().collect()
	}

	/// Paths force-included in the mounted set, in request order.
	pub(crate) fn force_included(&self) -> Vec<String> {
		self.inner.lock().holds.clone()
	}

	/// Takes the resolvers for a confirmed path. Its hold stays until the
	/// path lands in the stack.
	pub(crate) fn resolve(&self, path: &str) -> Vec<oneshot::Sender<()>> {
		self.inner.lock().resolvers.remove(path).unwrap_or_default()
	}

	/// Takes the resolvers for a discarded path and drops its hold.
	pub(crate) fn evict(&self, path: &str) -> Vec<oneshot::Sender<()>> {
		let mut inner = self.inner.lock();
		inner.holds.retain(|held| held != path);
		inner.resolvers.remove(path).unwrap_or_default()
	}

	/// Withdraws holds whose path is now present in the navigation stack.
	pub(crate) fn prune_landed(&self, stack_paths: &[String]) {
		self.inner
			.lock()
			.holds
			.retain(|held| !stack_paths.iter().any(|p| p == held));
	}

	/// Drops resolverless holds rejected by `keep`. Returns whether any
	/// hold was dropped.
	pub(crate) fn sweep_holds(&self, keep: impl Fn(&str) -> bool) -> bool {
		let mut inner = self.inner.lock();
		let before = inner.holds.len();
		let resolving: HashSet<String> = inner.resolvers.keys().cloned().collect();
		inner
			.holds
			.retain(|held| resolving.contains(held) || keep(held));
		inner.holds.len() != before
	}
}

/// Brokers the ensure-mounted handshake between imperative navigation and
/// the render collaborator.
pub struct MountCoordinator {
	registry: Arc<MountRegistry>,
	table: Arc<RouteTable>,
	pending: Arc<PendingMounts>,
	reconciler: Arc<Reconciler>,
}

impl std::fmt::Debug for MountCoordinator {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("MountCoordinator")
			.field("pending", &self.pending)
			.finish_non_exhaustive()
	}
}

impl MountCoordinator {
	pub(crate) fn new(
		registry: Arc<MountRegistry>,
		table: Arc<RouteTable>,
		pending: Arc<PendingMounts>,
		reconciler: Arc<Reconciler>,
	) -> Self {
		Self {
			registry,
			table,
			pending,
			reconciler,
		}
	}

	/// The registry this coordinator checks requests against.
	pub fn registry(&self) -> &Arc<MountRegistry> {
		&self.registry
	}

	/// Suspends until an instance for `pathname` is confirmed mounted.
	///
	/// Resolves immediately when the instance already exists or when no
	/// declared route matches the pathname (there is nothing to wait for).
	/// Otherwise the pathname is force-included in the mounted set, a
	/// recomputation is triggered so a render pass runs, and the returned
	/// future resolves at the settle pass that finds the instance
	/// confirmed. There is no timeout.
	pub async fn ensure_mounted(&self, pathname: &str) -> crate::error::Result<()> {
		if self.registry.is_mounted(pathname) {
			return Ok(());
		}
		if !self.table.matches_any(pathname) {
			debug!(path = %pathname, "no declared route matches, nothing to pre-mount");
			return Ok(());
		}

		let (tx, rx) = oneshot::channel();
		self.pending.register(pathname, tx);
		debug!(path = %pathname, "pre-mount requested");
		self.reconciler.recompute();

		// A synchronous collaborator may have confirmed and settled during
		// the recompute; resolve directly if the instance is there now.
		if self.registry.is_mounted(pathname) {
			for tx in self.pending.resolve(pathname) {
				let _ = tx.send(());
			}
		}

		if rx.await.is_err() {
			// Coordinator torn down with the request outstanding; treat it
			// as resolved so the caller is not wedged.
			debug!(path = %pathname, "pre-mount request dropped unresolved");
		}
		Ok(())
	}

	/// Sweeps outstanding requests against the registry and the declared
	/// routes.
	///
	/// The render collaborator calls this after applying every render pass.
	/// Requests whose instance is now confirmed resolve (their hold stays
	/// until the path lands in the stack); requests whose pathname no
	/// longer matches any declared route resolve as no-ops and are evicted
	/// together with their hold.
	pub fn settle(&self) {
		let mut to_fire: Vec<oneshot::Sender<()>> = Vec::new();
		let mut evicted_any = false;

		for path in self.pending.pending_paths() {
			if self.registry.is_mounted(&path) {
				debug!(path = %path, "pre-mount confirmed");
				to_fire.extend(self.pending.resolve(&path));
			} else if !self.table.matches_any(&path) {
				warn!(path = %path, "pre-mount request no longer matches any route, discarding");
				to_fire.extend(self.pending.evict(&path));
				evicted_any = true;
			}
		}

		// Holds left behind by resolved requests are subject to the same
		// orphan policy once their pattern disappears.
		if self.pending.sweep_holds(|path| self.table.matches_any(path)) {
			evicted_any = true;
		}

		for tx in to_fire {
			// A waiter that went away is fine.
			let _ = tx.send(());
		}

		if evicted_any {
			self.reconciler.recompute();
		}
	}
}
