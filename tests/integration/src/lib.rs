//! Shared doubles for the integration suites.
//!
//! [`RenderCollaborator`] plays the render layer's part in the mount
//! handshake; [`ScriptedConnector`] and [`RecordingMirror`] stand in for a
//! host bridge and a surrounding history mechanism.

use grappelli::{
	HistoryMirror, HostCommand, HostConnector, NavigationError, Route, RouteAssignment, Router,
	RouterBuilder,
};
use parking_lot::Mutex;
use serde_json::Value;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Builds a router builder with the given patterns declared.
pub fn declared(patterns: &[&str]) -> RouterBuilder {
	let mut builder = Router::builder();
	for pattern in patterns {
		builder = builder.route(Route::new(pattern).expect("test pattern compiles"));
	}
	builder
}

/// A render layer double.
///
/// It keeps one confirmed instance per assignment, and settles after every
/// pass it applies. In immediate mode every published pass is applied on
/// the spot; in manual mode passes queue up until the test steps them with
/// [`RenderCollaborator::apply_next`].
pub struct RenderCollaborator {
	router: Arc<Router>,
	queued: Mutex<Vec<Vec<RouteAssignment>>>,
	live: Mutex<Vec<String>>,
	immediate: bool,
}

impl RenderCollaborator {
	/// Attaches in immediate mode.
	pub fn attach(router: &Arc<Router>) -> Arc<Self> {
		Self::new(router, true)
	}

	/// Attaches in manual mode: nothing mounts until the test applies a
	/// pass.
	pub fn attach_manual(router: &Arc<Router>) -> Arc<Self> {
		Self::new(router, false)
	}

	fn new(router: &Arc<Router>, immediate: bool) -> Arc<Self> {
		let collaborator = Arc::new(Self {
			router: Arc::clone(router),
			queued: Mutex::new(Vec::new()),
			live: Mutex::new(Vec::new()),
			immediate,
		});

		let applying = Arc::clone(&collaborator);
		router.on_assignments(move |assignments| {
			applying.queued.lock().push(assignments.clone());
			if applying.immediate {
				applying.apply_all();
			}
		});

		// Catch up with the pass published before the subscription existed.
		collaborator.queued.lock().push(router.assignments());
		if immediate {
			collaborator.apply_all();
		}
		collaborator
	}

	/// Applies the oldest queued pass. Returns whether one was applied.
	pub fn apply_next(&self) -> bool {
		let pass = {
			let mut queued = self.queued.lock();
			if queued.is_empty() {
				None
			} else {
				Some(queued.remove(0))
			}
		};
		match pass {
			Some(pass) => {
				self.apply(&pass);
				true
			}
			None => false,
		}
	}

	/// Applies every queued pass, including ones queued while applying.
	pub fn apply_all(&self) {
		while self.apply_next() {}
	}

	fn apply(&self, pass: &[RouteAssignment]) {
		let registry = self.router.registry();
		let next: Vec<String> = pass.iter().map(|a| a.mounted_path.clone()).collect();
		{
			let mut live = self.live.lock();
			for path in live.iter() {
				if !next.contains(path) {
					registry.withdraw(path);
				}
			}
			for path in &next {
				registry.confirm(path.clone());
			}
			*live = next;
		}
		self.router.settle();
	}

	/// The paths currently kept alive, in assignment order.
	pub fn mounted(&self) -> Vec<String> {
		self.live.lock().clone()
	}

	/// Passes published but not yet applied.
	pub fn queued_passes(&self) -> usize {
		self.queued.lock().len()
	}
}

/// A host connector double: records every command, optionally refuses, and
/// runs a probe at dispatch time.
#[derive(Clone, Default)]
pub struct ScriptedConnector {
	sent: Arc<Mutex<Vec<HostCommand>>>,
	refuse: Arc<AtomicBool>,
	probe: Arc<Mutex<Option<Box<dyn Fn(&HostCommand) + Send + Sync>>>>,
}

impl std::fmt::Debug for ScriptedConnector {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("ScriptedConnector")
			.field("sent", &self.sent)
			.finish_non_exhaustive()
	}
}

impl ScriptedConnector {
	pub fn new() -> Self {
		Self::default()
	}

	/// Commands dispatched so far.
	pub fn sent(&self) -> Vec<HostCommand> {
		self.sent.lock().clone()
	}

	/// Makes subsequent sends fail at the bridge.
	pub fn refuse(&self, refuse: bool) {
		self.refuse.store(refuse, Ordering::SeqCst);
	}

	/// Installs a hook that observes each command before it is recorded.
	pub fn set_probe(&self, probe: impl Fn(&HostCommand) + Send + Sync + 'static) {
		*self.probe.lock() = Some(Box::new(probe));
	}
}

impl HostConnector for ScriptedConnector {
	fn send(&self, command: HostCommand) -> grappelli::Result<()> {
		if self.refuse.load(Ordering::SeqCst) {
			return Err(NavigationError::bridge("host rejected the command"));
		}
		if let Some(probe) = self.probe.lock().as_ref() {
			probe(&command);
		}
		self.sent.lock().push(command);
		Ok(())
	}
}

/// A surrounding-history double: records mirror calls and reports a
/// scripted current location, the way a browser would.
#[derive(Clone, Default)]
pub struct RecordingMirror {
	location: Arc<Mutex<Option<String>>>,
	ops: Arc<Mutex<Vec<String>>>,
}

impl std::fmt::Debug for RecordingMirror {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("RecordingMirror")
			.field("location", &self.location)
			.finish_non_exhaustive()
	}
}

impl RecordingMirror {
	pub fn new() -> Self {
		Self::default()
	}

	/// A mirror already sitting at `path`, as after following a deep link.
	pub fn at(path: &str) -> Self {
		let mirror = Self::default();
		*mirror.location.lock() = Some(path.to_string());
		mirror
	}

	/// The mirror calls observed so far, in order.
	pub fn ops(&self) -> Vec<String> {
		self.ops.lock().clone()
	}
}

impl HistoryMirror for RecordingMirror {
	fn push_state(&self, path: &str, _state: Option<&Value>) {
		*self.location.lock() = Some(path.to_string());
		self.ops.lock().push(format!("push:{path}"));
	}

	fn replace_state(&self, path: &str, _state: Option<&Value>) {
		*self.location.lock() = Some(path.to_string());
		self.ops.lock().push(format!("replace:{path}"));
	}

	fn go(&self, delta: i64) {
		self.ops.lock().push(format!("go:{delta}"));
	}

	fn current_path(&self) -> Option<String> {
		self.location.lock().clone()
	}

	fn echoes_jumps(&self) -> bool {
		true
	}
}
