//! Active-context derivation from announced transitions.
//!
//! These suites drive the router the way a host embedder does: stack
//! snapshots are synced first, then per-entry transition notifications are
//! announced in the host's order.

use grappelli::{Router, StackEntry, TransitionEvent, TransitionKind};
use grappelli_integration_tests::{RenderCollaborator, ScriptedConnector, declared};
use parking_lot::Mutex;
use rstest::rstest;
use serde_json::json;
use std::sync::Arc;

fn host_router(patterns: &[&str]) -> (ScriptedConnector, Arc<Router>) {
	let connector = ScriptedConnector::new();
	let router = Arc::new(
		declared(patterns)
			.host_history(Box::new(connector.clone()))
			.build(),
	);
	(connector, router)
}

#[rstest]
#[case::push_names_the_destination(
	TransitionEvent::Push { path: Some("/detail".to_string()), state: None },
	"/detail"
)]
#[case::push_falls_back_to_stack_top(
	TransitionEvent::Push { path: None, state: None },
	"/detail"
)]
#[case::reveal_falls_back_to_stack_top(
	TransitionEvent::PopNext { path: None, state: None },
	"/detail"
)]
#[case::leave_without_path_falls_back(TransitionEvent::Pop { path: None }, "/detail")]
#[case::leave_of_inactive_entry_is_ignored(
	TransitionEvent::Pop { path: Some("/gone".to_string()) },
	"/"
)]
fn test_active_path_derivation(#[case] event: TransitionEvent, #[case] expected: &str) {
	// Arrange
	let (_, router) = host_router(&["/", "/detail", "/gone"]);
	router
		.sync_host_snapshot(vec![StackEntry::bare("/"), StackEntry::bare("/detail")])
		.unwrap();

	// Act
	router.announce_transition(event);

	// Assert
	assert_eq!(router.context().path, expected);
}

#[test]
fn test_reveal_then_leave_keeps_the_reveal() {
	// Arrange: the host popped /b and reports both sides of the movement.
	let (_, router) = host_router(&["/", "/a", "/b"]);
	router
		.sync_host_snapshot(vec![StackEntry::bare("/"), StackEntry::bare("/a")])
		.unwrap();

	// Act
	router.announce_transition(TransitionEvent::PopNext {
		path: Some("/a".to_string()),
		state: None,
	});
	router.announce_transition(TransitionEvent::Pop {
		path: Some("/b".to_string()),
	});

	// Assert: the trailing leave notification does not clobber the reveal.
	let context = router.context();
	assert_eq!(context.path, "/a");
	assert_eq!(context.kind, Some(TransitionKind::PopNext));
	assert!(context.is_activating());
}

#[test]
fn test_lone_leave_does_not_activate() {
	// Arrange
	let (_, router) = host_router(&["/", "/a", "/b"]);
	router
		.sync_host_snapshot(vec![StackEntry::bare("/"), StackEntry::bare("/a")])
		.unwrap();
	router.announce_transition(TransitionEvent::Push {
		path: Some("/b".to_string()),
		state: None,
	});

	// Act: only the leave side arrives for the pop of /b.
	router.announce_transition(TransitionEvent::Pop {
		path: Some("/b".to_string()),
	});

	// Assert: the path falls back to the synced stack top, but a plain
	// pop marks no route active.
	let context = router.context();
	assert_eq!(context.path, "/a");
	assert_eq!(context.kind, Some(TransitionKind::Pop));
	assert!(!context.is_activating());
}

#[test]
fn test_initial_restore_activates_nothing() {
	// Arrange: launched directly on a detail entry.
	let connector = ScriptedConnector::new();
	let router = Arc::new(
		declared(&["/", "/users/:id"])
			.host_history_seeded(
				Box::new(connector.clone()),
				StackEntry::new("/users/9", Some(json!({"restored": true}))),
			)
			.build(),
	);
	let _collaborator = RenderCollaborator::attach(&router);

	// Assert: the context is resolved but nothing is activated until a
	// real transition arrives.
	let context = router.context();
	assert_eq!(context.path, "/users/9");
	assert_eq!(context.params["id"], "9");
	assert_eq!(context.kind, None);
	assert!(!context.is_activating());

	let assignment = router
		.assignments()
		.into_iter()
		.find(|a| a.mounted_path == "/users/9")
		.unwrap();
	assert!(!router.route_context(&assignment).is_active());
}

#[tokio::test]
async fn test_each_side_of_a_push_is_reported() {
	// Arrange
	let router = Arc::new(declared(&["/", "/users/:id"]).headless_history().build());
	let _collaborator = RenderCollaborator::attach(&router);
	router.push("/users/1", None).await.unwrap();

	let seen = Arc::new(Mutex::new(Vec::new()));
	let log = Arc::clone(&seen);
	router.on_context(move |context| {
		log.lock().push((context.kind, context.path.clone()));
	});

	// Act
	router.push("/users/2", None).await.unwrap();

	// Assert: the covered entry is reported before the new one.
	assert_eq!(
		seen.lock().as_slice(),
		&[
			(Some(TransitionKind::PushNext), "/users/1".to_string()),
			(Some(TransitionKind::Push), "/users/2".to_string()),
		]
	);
}

#[test]
fn test_event_state_wins_for_activating_kinds() {
	// Arrange
	let (_, router) = host_router(&["/", "/detail"]);
	router
		.sync_host_snapshot(vec![
			StackEntry::bare("/"),
			StackEntry::new("/detail", Some(json!({"cached": true}))),
		])
		.unwrap();

	// Act
	router.announce_transition(TransitionEvent::Push {
		path: Some("/detail".to_string()),
		state: Some(json!({"fresh": true})),
	});

	// Assert
	assert_eq!(router.context().state, Some(json!({"fresh": true})));
}

#[test]
fn test_reveal_without_state_reads_the_stack_entry() {
	// Arrange
	let (_, router) = host_router(&["/", "/detail"]);
	router
		.sync_host_snapshot(vec![
			StackEntry::new("/", Some(json!({"home": 1}))),
			StackEntry::new("/detail", None),
		])
		.unwrap();
	router.announce_transition(TransitionEvent::Push {
		path: Some("/detail".to_string()),
		state: None,
	});

	// The host pops /detail.
	router.sync_host_snapshot(vec![StackEntry::new("/", Some(json!({"home": 1})))]).unwrap();

	// Act
	router.announce_transition(TransitionEvent::PopNext {
		path: Some("/".to_string()),
		state: None,
	});

	// Assert
	assert_eq!(router.context().state, Some(json!({"home": 1})));
}
