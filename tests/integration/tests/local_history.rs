//! The in-process backend against a surrounding history mechanism.

use grappelli::TransitionKind;
use grappelli_integration_tests::{RecordingMirror, RenderCollaborator, declared};
use serde_json::json;
use std::sync::Arc;

#[tokio::test]
async fn test_deep_link_seeds_the_initial_entry() {
	let mirror = RecordingMirror::at("/users/7");
	let router = Arc::new(
		declared(&["/", "/users/:id"])
			.local_history(Box::new(mirror.clone()))
			.build(),
	);
	let collaborator = RenderCollaborator::attach(&router);

	assert_eq!(router.path(), "/users/7");
	assert_eq!(collaborator.mounted(), vec!["/users/7"]);

	// Resolved, but not yet activated by any transition.
	let context = router.context();
	assert_eq!(context.params["id"], "7");
	assert!(!context.is_activating());
}

#[tokio::test]
async fn test_pop_until_rewinds_past_intermediates() {
	let mirror = RecordingMirror::at("/root");
	let router = Arc::new(
		declared(&["/root", "/a", "/b"])
			.local_history(Box::new(mirror.clone()))
			.build(),
	);
	let collaborator = RenderCollaborator::attach(&router);

	router.push("/a", None).await.unwrap();
	router.push("/b", None).await.unwrap();

	router.pop_until("/root").unwrap();

	let paths: Vec<String> = router.stack().into_iter().map(|e| e.path).collect();
	assert_eq!(paths, vec!["/root"]);
	assert_eq!(router.context().path, "/root");
	assert_eq!(router.context().kind, Some(TransitionKind::PopNext));
	assert_eq!(collaborator.mounted(), vec!["/root"]);

	// The mirror stepped back across both entries in one move.
	assert_eq!(mirror.ops(), vec!["push:/a", "push:/b", "go:-2"]);
}

#[tokio::test]
async fn test_pop_until_missing_target_is_a_no_op() {
	let router = Arc::new(declared(&["/", "/a"]).headless_history().build());
	let _collaborator = RenderCollaborator::attach(&router);
	router.push("/a", None).await.unwrap();

	router.pop_until("/missing").unwrap();

	let paths: Vec<String> = router.stack().into_iter().map(|e| e.path).collect();
	assert_eq!(paths, vec!["/", "/a"]);
	assert_eq!(router.context().path, "/a");
}

#[tokio::test]
async fn test_external_back_gesture_is_a_reveal() {
	let mirror = RecordingMirror::at("/");
	let router = Arc::new(
		declared(&["/", "/users/:id"])
			.local_history(Box::new(mirror.clone()))
			.build(),
	);
	let _collaborator = RenderCollaborator::attach(&router);
	router.push("/users/1", Some(json!({"n": 1}))).await.unwrap();
	router.push("/users/2", None).await.unwrap();

	router.apply_external_jump(-1).unwrap();

	let context = router.context();
	assert_eq!(context.path, "/users/1");
	assert_eq!(context.kind, Some(TransitionKind::PopNext));
	assert_eq!(context.state, Some(json!({"n": 1})));

	// Forward across the kept tail.
	router.apply_external_jump(1).unwrap();
	assert_eq!(router.context().path, "/users/2");
	assert_eq!(router.context().kind, Some(TransitionKind::Push));
}

#[tokio::test]
async fn test_out_of_range_gesture_is_ignored() {
	let router = Arc::new(declared(&["/", "/a"]).headless_history().build());
	let _collaborator = RenderCollaborator::attach(&router);
	router.push("/a", None).await.unwrap();

	router.apply_external_jump(-5).unwrap();
	router.apply_external_jump(3).unwrap();

	assert_eq!(router.path(), "/a");
}

#[tokio::test]
async fn test_own_pop_echo_is_not_applied_twice() {
	let mirror = RecordingMirror::at("/");
	let router = Arc::new(
		declared(&["/", "/users/:id"])
			.local_history(Box::new(mirror.clone()))
			.build(),
	);
	let _collaborator = RenderCollaborator::attach(&router);
	router.push("/users/1", None).await.unwrap();
	router.push("/users/2", None).await.unwrap();

	router.pop(None).unwrap();
	assert_eq!(router.path(), "/users/1");

	// The mirror reports the go(-1) back through the gesture wiring, the
	// way a browser fires popstate for a scripted history.go call. It must
	// not move the stack a second time.
	router.apply_external_jump(-1).unwrap();
	assert_eq!(router.path(), "/users/1");

	// A real gesture afterwards still works.
	router.apply_external_jump(-1).unwrap();
	assert_eq!(router.path(), "/");
}

#[tokio::test]
async fn test_remove_until_approximates_with_rewind_and_push() {
	let mirror = RecordingMirror::at("/");
	let router = Arc::new(
		declared(&["/", "/step/:n", "/login"])
			.local_history(Box::new(mirror.clone()))
			.build(),
	);
	let _collaborator = RenderCollaborator::attach(&router);
	router.push("/step/1", None).await.unwrap();
	router.push("/step/2", None).await.unwrap();

	router.push_and_remove_until("/login", "/", None).await.unwrap();

	let paths: Vec<String> = router.stack().into_iter().map(|e| e.path).collect();
	assert_eq!(paths, vec!["/", "/login"]);
	// A surrounding history cannot drop interior entries, so the mirror
	// rewinds to the survivor and pushes over the stale tail.
	assert_eq!(
		mirror.ops(),
		vec!["push:/step/1", "push:/step/2", "go:-2", "push:/login"]
	);
}

#[tokio::test]
async fn test_remove_until_without_match_replaces_outright() {
	let mirror = RecordingMirror::at("/");
	let router = Arc::new(
		declared(&["/", "/a", "/login"])
			.local_history(Box::new(mirror.clone()))
			.build(),
	);
	let _collaborator = RenderCollaborator::attach(&router);
	router.push("/a", None).await.unwrap();

	router
		.push_and_remove_until("/login", "/missing", None)
		.await
		.unwrap();

	let paths: Vec<String> = router.stack().into_iter().map(|e| e.path).collect();
	assert_eq!(paths, vec!["/login"]);
	assert_eq!(mirror.ops(), vec!["push:/a", "go:-1", "replace:/login"]);
}
