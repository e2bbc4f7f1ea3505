//! Navigation module.
//!
//! This module provides access to route patterns, history backends, the
//! mount handshake, reconciliation, and the assembled [`Router`](crate::Router).
//!
//! # Examples
//!
//! ```rust,no_run
//! use grappelli::router::{Route, Router};
//!
//! let router = Router::builder()
//!     .route(Route::new("/settings/:section").unwrap())
//!     .headless_history()
//!     .build();
//! ```

pub use grappelli_router::*;
