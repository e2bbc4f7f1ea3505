//! Router error types.

use thiserror::Error;

/// Errors produced by navigation operations.
#[derive(Debug, Error)]
pub enum NavigationError {
	/// No history backend is configured for this router.
	#[error("no history backend is configured; imperative navigation is unavailable")]
	NotConfigured,

	/// A route pattern failed to compile.
	#[error("invalid route pattern `{pattern}`: {detail}")]
	InvalidPattern { pattern: String, detail: String },

	/// A route pattern exceeded the maximum allowed length.
	#[error("pattern length {length} exceeds maximum allowed length of {max} bytes")]
	PatternTooLong { length: usize, max: usize },

	/// A route pattern contained too many path segments.
	#[error("pattern has {count} path segments, exceeding maximum of {max}")]
	TooManySegments { count: usize, max: usize },

	/// The host connector rejected or failed to deliver a command.
	#[error("host bridge dispatch failed: {reason}")]
	Bridge { reason: String },
}

impl NavigationError {
	/// Builds a [`NavigationError::Bridge`] from any displayable cause.
	pub fn bridge(reason: impl std::fmt::Display) -> Self {
		Self::Bridge {
			reason: reason.to_string(),
		}
	}
}

/// Convenience alias used across the crate.
pub type Result<T> = std::result::Result<T, NavigationError>;
