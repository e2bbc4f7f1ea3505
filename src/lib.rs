//! # Grappelli
//!
//! Hybrid navigation reconciliation for Rust applications that render
//! declaratively but navigate through a stack-based history, whether that
//! stack lives in process, in the browser's History API, or inside an
//! external host runtime reached over a bridge.
//!
//! ## Core Pieces
//!
//! - **Route table**: patterns with `:params` and `*` wildcards, matched
//!   against concrete paths by specificity, declared up front or at runtime
//! - **History backends**: one imperative surface over an in-process stack
//!   (optionally mirrored into a surrounding history mechanism) or a remote
//!   host-owned stack reached through a command connector
//! - **Mount handshake**: navigations suspend until the render collaborator
//!   confirms the destination instance, so the history never moves onto a
//!   view that is not there yet
//! - **Reconciler**: folds statics, the live stack, pre-mount holds and the
//!   active path into one ordered list of instances to keep alive
//!
//! ## Quick Example
//!
//! ```rust,ignore
//! use grappelli::prelude::*;
//!
//! let router = Router::builder()
//!     .route(Route::new("/")?)
//!     .route(Route::new("/users/:id")?)
//!     .headless_history()
//!     .build();
//!
//! // The render collaborator keeps one instance per assignment alive,
//! // confirms each in the registry, then settles.
//! router.on_assignments(|assignments| { /* render pass */ });
//!
//! router.push("/users/42", Some(json!({ "from": "home" }))).await?;
//! assert_eq!(router.context().params["id"], "42");
//! ```

// Module re-exports following the crate layout
pub mod core;
pub mod router;

// Unified prelude for simplified imports
pub mod prelude;

// Re-export shared vocabulary
pub use grappelli_core::{
	Signal, StackEntry, SubscriptionId, TransitionEvent, TransitionKind, contains_path, top_path,
};

// Re-export route declaration and matching
pub use grappelli_router::{Route, RouteMatch, RoutePattern, RouteTable, find_best_match};

// Re-export history backends
pub use grappelli_router::{
	HistoryBackend, HistoryMirror, HostCommand, HostConnector, HostHistory, LocalHistory,
	NullMirror, UnconfiguredHistory,
};
#[cfg(all(target_family = "wasm", target_os = "unknown"))]
pub use grappelli_router::WebHistoryMirror;

// Re-export context layers, reconciliation and assembly
pub use grappelli_router::{
	ActiveContext, MountRegistry, NavigationError, Result, RouteAssignment, RouteContext, Router,
	RouterBuilder,
};

// Re-export common external dependencies
pub use serde_json;
