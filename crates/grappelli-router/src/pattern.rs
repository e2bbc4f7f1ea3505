//! Route pattern matching.
//!
//! Patterns use the `/literal/:param/*` syntax: colon-prefixed segments bind
//! named parameters, a lone `*` segment matches the rest of the path, and
//! everything else is matched literally.

use crate::error::{NavigationError, Result};
use std::collections::HashMap;

/// A successful match of a concrete pathname against a pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteMatch {
	/// The pattern string that matched.
	pub pattern: String,
	/// Extracted parameter values, keyed by their `:name`.
	pub params: HashMap<String, String>,
	/// Whether the pattern is purely literal (no parameters, no wildcard).
	pub is_exact: bool,
}

/// A compiled route pattern.
///
/// Supports patterns like:
/// - `/users` - Exact match
/// - `/users/:id` - Single path parameter
/// - `/users/:id/posts/:post_id` - Multiple parameters
/// - `/shop/:cat/*` - Trailing wildcard (rest of path)
/// - `*` - Bare wildcard, the lowest-specificity catch-all
#[derive(Debug, Clone)]
pub struct RoutePattern {
	/// The original pattern string.
	pattern: String,
	/// Compiled regex.
	regex: regex::Regex,
	/// Parameter names in declaration order.
	param_names: Vec<String>,
	/// Whether this pattern is purely literal.
	is_exact: bool,
	/// Precomputed specificity score.
	score: u32,
}

/// Maximum allowed length for a pattern string in bytes.
const MAX_PATTERN_LENGTH: usize = 1024;

/// Maximum allowed number of path segments in a pattern.
const MAX_PATTERN_SEGMENTS: usize = 32;

/// Maximum allowed size for a compiled pattern regex (in bytes).
const MAX_COMPILED_PATTERN_SIZE: usize = 1 << 20; // 1 MiB

impl RoutePattern {
	/// Compiles a pattern string.
	///
	/// # Errors
	///
	/// Returns an error if the pattern exceeds the length or segment limits,
	/// or compiles to an invalid regex (for example a `:param` name that is
	/// not a valid identifier, or the same name bound twice).
	pub fn new(pattern: &str) -> Result<Self> {
		if pattern.len() > MAX_PATTERN_LENGTH {
			return Err(NavigationError::PatternTooLong {
				length: pattern.len(),
				max: MAX_PATTERN_LENGTH,
			});
		}

		let segment_count = pattern.split('/').count();
		if segment_count > MAX_PATTERN_SEGMENTS {
			return Err(NavigationError::TooManySegments {
				count: segment_count,
				max: MAX_PATTERN_SEGMENTS,
			});
		}

		let (regex_str, param_names) = Self::compile_pattern(pattern);

		// Build with a size limit so a hostile pattern cannot balloon the
		// compiled automaton.
		let regex = regex::RegexBuilder::new(&regex_str)
			.size_limit(MAX_COMPILED_PATTERN_SIZE)
			.build()
			.map_err(|e| NavigationError::InvalidPattern {
				pattern: pattern.to_string(),
				detail: e.to_string(),
			})?;

		Ok(Self {
			pattern: pattern.to_string(),
			regex,
			param_names,
			is_exact: !pattern.split('/').any(|s| s.starts_with(':') || s == "*"),
			score: Self::specificity(pattern),
		})
	}

	/// Rewrites a pattern string into a regex and collects parameter names.
	fn compile_pattern(pattern: &str) -> (String, Vec<String>) {
		let mut regex_str = String::from("^");
		let mut param_names = Vec::new();
		let mut first = true;

		for segment in pattern.split('/') {
			if !first {
				regex_str.push_str("\\/");
			}
			first = false;

			if let Some(name) = segment.strip_prefix(':') {
				param_names.push(name.to_string());
				regex_str.push_str(&format!("(?P<{}>[^/]+)", name));
			} else if segment == "*" {
				// Wildcard: matches anything, including path separators.
				regex_str.push_str(".*");
			} else {
				for c in segment.chars() {
					match c {
						'.' | '+' | '*' | '?' | '(' | ')' | '[' | ']' | '^' | '$' | '|' | '\\' => {
							regex_str.push('\\');
							regex_str.push(c);
						}
						_ => regex_str.push(c),
					}
				}
			}
		}

		regex_str.push('$');
		(regex_str, param_names)
	}

	/// Computes the specificity score for a pattern string.
	///
	/// A bare wildcard scores 0. Otherwise each segment contributes weighted
	/// points (wildcard 1, parameter 2, literal 3); the sum is multiplied by
	/// 100 and the raw segment count added, so "more literal" patterns rank
	/// strictly ahead of more parameterized ones of equal length, and longer
	/// patterns ahead of shorter ones of equal per-segment weight.
	fn specificity(pattern: &str) -> u32 {
		if pattern == "*" {
			return 0;
		}

		let segments: Vec<&str> = pattern.split('/').filter(|s| !s.is_empty()).collect();
		let weight: u32 = segments
			.iter()
			.map(|segment| {
				if *segment == "*" {
					1
				} else if segment.starts_with(':') {
					2
				} else {
					3
				}
			})
			.sum();

		weight * 100 + segments.len() as u32
	}

	/// Returns the original pattern string.
	pub fn pattern(&self) -> &str {
		&self.pattern
	}

	/// Returns the parameter names in declaration order.
	pub fn param_names(&self) -> &[String] {
		&self.param_names
	}

	/// Returns the precomputed specificity score.
	pub fn score(&self) -> u32 {
		self.score
	}

	/// Returns whether this pattern is purely literal.
	pub fn is_exact(&self) -> bool {
		self.is_exact
	}

	/// Checks whether this pattern would match the given pathname.
	pub fn is_match(&self, pathname: &str) -> bool {
		self.regex.is_match(pathname)
	}

	/// Attempts to match a concrete pathname against this pattern.
	pub fn matches(&self, pathname: &str) -> Option<RouteMatch> {
		self.regex.captures(pathname).map(|caps| {
			let params: HashMap<String, String> = self
				.param_names
				.iter()
				.filter_map(|name| {
					caps.name(name)
						.map(|m| (name.clone(), m.as_str().to_string()))
				})
				.collect();

			RouteMatch {
				pattern: self.pattern.clone(),
				params,
				is_exact: self.is_exact,
			}
		})
	}
}

impl PartialEq for RoutePattern {
	fn eq(&self, other: &Self) -> bool {
		self.pattern == other.pattern
	}
}

impl Eq for RoutePattern {}

impl std::fmt::Display for RoutePattern {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "{}", self.pattern)
	}
}

/// Picks the highest-scoring pattern matching `pathname`.
///
/// Every pattern is evaluated; ties keep the first encountered, so
/// declaration order is a deterministic tie-break. Returns the winning
/// pattern's index alongside the match.
pub fn find_best_match<'a, I>(patterns: I, pathname: &str) -> Option<(usize, RouteMatch)>
where
	I: IntoIterator<Item = &'a RoutePattern>,
{
	let mut best: Option<(usize, u32, RouteMatch)> = None;

	for (index, pattern) in patterns.into_iter().enumerate() {
		let found = match pattern.matches(pathname) {
			Some(found) => found,
			None => continue,
		};

		let better = match &best {
			Some((_, best_score, _)) => pattern.score() > *best_score,
			None => true,
		};
		if better {
			best = Some((index, pattern.score(), found));
		}
	}

	best.map(|(index, _, found)| (index, found))
}
