//! # Grappelli Router
//!
//! Hybrid navigation reconciliation. A declarative route table is matched
//! against concrete paths by specificity; interchangeable history backends
//! keep the navigation stack either in process (optionally mirrored into a
//! surrounding history mechanism such as the browser's) or inside an
//! external stack-based host runtime; and a mount handshake guarantees the
//! destination instance exists before any navigation reaches the backend.
//!
//! # Example
//!
//! ```ignore
//! use grappelli_router::{Route, Router};
//!
//! let router = Router::builder()
//!     .route(Route::new("/").unwrap())
//!     .route(Route::new("/users/:id").unwrap())
//!     .headless_history()
//!     .build();
//!
//! // A render collaborator subscribes, materializes instances, confirms
//! // them in the registry and settles; pushes then resolve.
//! router.on_assignments(|assignments| {
//!     for assignment in assignments {
//!         println!("mount {} at {}", assignment.pattern, assignment.mounted_path);
//!     }
//! });
//! ```

// Route declaration and matching
pub mod pattern;
pub mod routes;

// History backends
pub mod history;

// Context layers and transition folding
pub mod context;
mod events;

// Mount handshake and mounted-set reconciliation
pub mod mount;
pub mod reconciler;

// Assembly and the imperative surface
pub mod router;

// Error types
pub mod error;

// Re-export the working surface
pub use context::{ActiveContext, RouteContext};
pub use error::{NavigationError, Result};
pub use history::host::{HostCommand, HostConnector, HostHistory};
pub use history::local::{HistoryMirror, LocalHistory, NullMirror};
#[cfg(all(target_family = "wasm", target_os = "unknown"))]
pub use history::web::WebHistoryMirror;
pub use history::{HistoryBackend, UnconfiguredHistory};
pub use mount::MountRegistry;
pub use pattern::{RouteMatch, RoutePattern, find_best_match};
pub use reconciler::RouteAssignment;
pub use router::{Router, RouterBuilder};
pub use routes::{Route, RouteTable};
