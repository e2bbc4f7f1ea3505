//! Shared vocabulary module.
//!
//! This module provides access to the transition-event union, navigation
//! stack entries, and the publish/subscribe signal primitive.
//!
//! # Examples
//!
//! ```rust,no_run
//! use grappelli::core::{Signal, TransitionEvent};
//!
//! let transitions = Signal::<TransitionEvent>::new();
//! transitions.connect(|event| println!("kind = {}", event.kind()));
//! ```

pub use grappelli_core::*;
