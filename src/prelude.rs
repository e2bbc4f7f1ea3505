//! One-stop imports for typical use.
//!
//! ```rust,no_run
//! use grappelli::prelude::*;
//! ```

pub use crate::{
	ActiveContext, HistoryBackend, NavigationError, Route, RouteAssignment, RouteContext, Router,
	RouterBuilder, StackEntry, TransitionEvent, TransitionKind,
};

// External
pub use serde_json::{Value, json};
