//! Route declarations.
//!
//! A [`RouteTable`] holds the declared [`Route`]s and is shared by the
//! reconciler, the event bridge, and the mount coordinator. The table is
//! mutable at runtime; declaration order is the tie-break when two patterns
//! match a pathname with equal specificity.

use crate::error::Result;
use crate::pattern::{self, RouteMatch, RoutePattern};
use parking_lot::RwLock;
use tracing::debug;

/// A declared route: a compiled pattern plus the concrete paths, if any,
/// that must stay mounted regardless of the navigation stack.
#[derive(Debug, Clone)]
pub struct Route {
	pattern: RoutePattern,
	static_mounts: Vec<String>,
}

impl Route {
	/// Declares a route for the given pattern string.
	///
	/// # Errors
	///
	/// Returns an error if the pattern fails to compile.
	pub fn new(pattern: &str) -> Result<Self> {
		Ok(Self {
			pattern: RoutePattern::new(pattern)?,
			static_mounts: Vec::new(),
		})
	}

	/// Keeps an instance of this route mounted at the pattern string itself.
	///
	/// Only meaningful for literal patterns; parameterized patterns should
	/// use [`Route::keep_mounted_at`] with a concrete path.
	pub fn keep_mounted(self) -> Self {
		let path = self.pattern.pattern().to_string();
		self.keep_mounted_at(path)
	}

	/// Keeps an instance of this route mounted at the given concrete path.
	pub fn keep_mounted_at(mut self, path: impl Into<String>) -> Self {
		self.static_mounts.push(path.into());
		self
	}

	/// Returns the compiled pattern.
	pub fn pattern(&self) -> &RoutePattern {
		&self.pattern
	}

	/// Returns the concrete paths this route keeps mounted unconditionally.
	pub fn static_mounts(&self) -> &[String] {
		&self.static_mounts
	}
}

/// The shared, runtime-mutable set of declared routes.
#[derive(Debug, Default)]
pub struct RouteTable {
	routes: RwLock<Vec<Route>>,
}

impl RouteTable {
	/// Creates an empty table.
	pub fn new() -> Self {
		Self::default()
	}

	/// Declares a route.
	///
	/// Redeclaring a pattern already in the table replaces the earlier
	/// declaration in place, keeping its position in the tie-break order.
	pub fn declare(&self, route: Route) {
		let mut routes = self.routes.write();
		let pattern = route.pattern().pattern().to_string();

		match routes
			.iter_mut()
			.find(|r| r.pattern().pattern() == pattern)
		{
			Some(existing) => *existing = route,
			None => routes.push(route),
		}
		debug!(pattern = %pattern, "route declared");
	}

	/// Removes the route declared for the given pattern string.
	///
	/// Returns whether a declaration was removed.
	pub fn undeclare(&self, pattern: &str) -> bool {
		let mut routes = self.routes.write();
		let before = routes.len();
		routes.retain(|r| r.pattern().pattern() != pattern);
		let removed = routes.len() != before;
		if removed {
			debug!(pattern = %pattern, "route undeclared");
		}
		removed
	}

	/// Returns whether a route is declared for the given pattern string.
	pub fn is_declared(&self, pattern: &str) -> bool {
		self.routes
			.read()
			.iter()
			.any(|r| r.pattern().pattern() == pattern)
	}

	/// Picks the best-scoring declared pattern matching `pathname`.
	pub fn best_match(&self, pathname: &str) -> Option<(RoutePattern, RouteMatch)> {
		let routes = self.routes.read();
		pattern::find_best_match(routes.iter().map(Route::pattern), pathname)
			.map(|(index, found)| (routes[index].pattern().clone(), found))
	}

	/// Returns whether any declared pattern matches `pathname`.
	pub fn matches_any(&self, pathname: &str) -> bool {
		self.routes
			.read()
			.iter()
			.any(|r| r.pattern().is_match(pathname))
	}

	/// Clones the current declarations, in declaration order.
	pub fn snapshot(&self) -> Vec<Route> {
		self.routes.read().clone()
	}

	/// Returns the number of declared routes.
	pub fn len(&self) -> usize {
		self.routes.read().len()
	}

	/// Returns whether the table has no declarations.
	pub fn is_empty(&self) -> bool {
		self.routes.read().is_empty()
	}
}
