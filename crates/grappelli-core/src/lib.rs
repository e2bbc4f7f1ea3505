//! # Grappelli Core
//!
//! Shared vocabulary for the Grappelli navigation system: the closed
//! transition-event union, navigation stack entries, and the explicit
//! publish/subscribe signal components use to observe each other.
//!
//! # Example
//!
//! ```ignore
//! use grappelli_core::{Signal, TransitionEvent};
//!
//! let transitions = Signal::<TransitionEvent>::new();
//! transitions.connect(|event| println!("kind = {}", event.kind()));
//! transitions.emit(&TransitionEvent::Push {
//!     path: Some("/users/42".into()),
//!     state: None,
//! });
//! ```

pub mod signal;
pub mod stack;
pub mod transition;

pub use signal::{Signal, SubscriptionId};
pub use stack::{StackEntry, contains_path, top_path};
pub use transition::{TransitionEvent, TransitionKind};
