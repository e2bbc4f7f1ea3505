//! Browser history mirror.

use crate::history::local::HistoryMirror;
use serde_json::Value;
use tracing::warn;
use wasm_bindgen::JsValue;

/// [`HistoryMirror`] over the browser History API.
///
/// Entry state is mirrored as its JSON text; the in-process list keeps the
/// structured value. Environment failures are logged and swallowed since
/// the list stays the source of truth.
#[derive(Debug, Default, Clone, Copy)]
pub struct WebHistoryMirror;

impl WebHistoryMirror {
	/// Creates a mirror bound to the surrounding window.
	pub fn new() -> Self {
		Self
	}

	fn history() -> Option<web_sys::History> {
		web_sys::window().and_then(|window| window.history().ok())
	}

	fn js_state(state: Option<&Value>) -> JsValue {
		match state {
			Some(value) => JsValue::from_str(&value.to_string()),
			None => JsValue::NULL,
		}
	}
}

impl HistoryMirror for WebHistoryMirror {
	fn push_state(&self, path: &str, state: Option<&Value>) {
		let history = match Self::history() {
			Some(history) => history,
			None => return,
		};
		if let Err(error) = history.push_state_with_url(&Self::js_state(state), "", Some(path)) {
			warn!(path = %path, ?error, "browser pushState failed");
		}
	}

	fn replace_state(&self, path: &str, state: Option<&Value>) {
		let history = match Self::history() {
			Some(history) => history,
			None => return,
		};
		if let Err(error) = history.replace_state_with_url(&Self::js_state(state), "", Some(path))
		{
			warn!(path = %path, ?error, "browser replaceState failed");
		}
	}

	fn go(&self, delta: i64) {
		let history = match Self::history() {
			Some(history) => history,
			None => return,
		};
		if let Err(error) = history.go_with_delta(delta as i32) {
			warn!(delta, ?error, "browser history.go failed");
		}
	}

	fn current_path(&self) -> Option<String> {
		web_sys::window()?.location().pathname().ok()
	}

	// go() lands back in the popstate wiring as an apply_external_jump.
	fn echoes_jumps(&self) -> bool {
		true
	}
}
