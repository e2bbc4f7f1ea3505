//! The host-owned backend: command dispatch, cache discipline, and
//! host-announced transitions.

use grappelli::{HostCommand, StackEntry, TransitionEvent, TransitionKind};
use grappelli_integration_tests::{RenderCollaborator, ScriptedConnector, declared};
use serde_json::json;
use std::sync::Arc;

fn host_router(patterns: &[&str]) -> (ScriptedConnector, Arc<grappelli::Router>) {
	let connector = ScriptedConnector::new();
	let router = Arc::new(
		declared(patterns)
			.host_history(Box::new(connector.clone()))
			.build(),
	);
	(connector, router)
}

#[tokio::test]
async fn test_commands_cross_in_call_order() {
	let (connector, router) = host_router(&["/", "/users/:id"]);
	let _collaborator = RenderCollaborator::attach(&router);

	router.push("/users/1", Some(json!({"n": 1}))).await.unwrap();
	router.push("/users/2", None).await.unwrap();
	router.pop(Some(json!(42))).unwrap();

	assert_eq!(
		connector.sent(),
		vec![
			HostCommand::Push {
				path: "/users/1".to_string(),
				state: Some(json!({"n": 1})),
			},
			HostCommand::Push {
				path: "/users/2".to_string(),
				state: None,
			},
			HostCommand::Pop {
				result: Some(json!(42)),
			},
		]
	);
}

#[tokio::test]
async fn test_refused_command_leaves_the_cache_clean() {
	let (connector, router) = host_router(&["/", "/a"]);
	let _collaborator = RenderCollaborator::attach(&router);

	connector.refuse(true);
	let denied = router.push("/a", None).await;
	assert!(denied.is_err());
	assert_eq!(router.path(), "/");
	assert_eq!(router.stack().len(), 1);

	// The same destination goes through once the host recovers.
	connector.refuse(false);
	router.push("/a", None).await.unwrap();
	assert_eq!(router.path(), "/a");
}

#[tokio::test]
async fn test_host_pop_is_synced_then_announced() {
	let (_, router) = host_router(&["/", "/a"]);
	let collaborator = RenderCollaborator::attach(&router);
	router.push("/a", None).await.unwrap();

	// The host popped its own stack. It hands over the surviving entries
	// first, then reports the movement.
	router.sync_host_snapshot(vec![StackEntry::bare("/".to_string())]).unwrap();
	router.announce_transition(TransitionEvent::PopNext {
		path: Some("/".to_string()),
		state: None,
	});
	router.announce_transition(TransitionEvent::Pop {
		path: Some("/a".to_string()),
	});

	assert_eq!(router.path(), "/");
	let context = router.context();
	assert_eq!(context.path, "/");
	assert_eq!(context.kind, Some(TransitionKind::PopNext));
	assert_eq!(collaborator.mounted(), vec!["/"]);
}

#[tokio::test]
async fn test_pop_and_push_is_a_single_command() {
	let (connector, router) = host_router(&["/", "/a", "/b"]);
	let _collaborator = RenderCollaborator::attach(&router);
	router.push("/a", None).await.unwrap();

	router.pop_and_push("/b", None).await.unwrap();

	assert_eq!(router.path(), "/b");
	assert_eq!(router.stack().len(), 2);
	assert_eq!(
		connector.sent().last(),
		Some(&HostCommand::PopAndPush {
			path: "/b".to_string(),
			state: None,
			result: None,
		})
	);
}

#[tokio::test]
async fn test_pop_at_the_root_sends_nothing() {
	let (connector, router) = host_router(&["/"]);
	let _collaborator = RenderCollaborator::attach(&router);

	assert!(!router.pop(None).unwrap());
	assert!(!router.can_pop());
	assert!(connector.sent().is_empty());
}

#[tokio::test]
async fn test_pop_until_missing_target_sends_nothing() {
	let (connector, router) = host_router(&["/", "/a"]);
	let _collaborator = RenderCollaborator::attach(&router);
	router.push("/a", None).await.unwrap();
	let sent_before = connector.sent().len();

	router.pop_until("/missing").unwrap();

	assert_eq!(router.path(), "/a");
	assert_eq!(connector.sent().len(), sent_before);
}

#[tokio::test]
async fn test_seeded_restore_skips_the_handshake_for_the_initial_entry() {
	let connector = ScriptedConnector::new();
	let router = Arc::new(
		declared(&["/", "/users/:id"])
			.host_history_seeded(
				Box::new(connector.clone()),
				StackEntry::new("/users/9", Some(json!({"restored": true}))),
			)
			.build(),
	);
	let collaborator = RenderCollaborator::attach(&router);

	// Restoring state the host already owns must not re-dispatch it.
	assert!(connector.sent().is_empty());
	assert_eq!(router.path(), "/users/9");
	assert_eq!(router.state(), Some(json!({"restored": true})));
	assert_eq!(collaborator.mounted(), vec!["/users/9"]);
}
