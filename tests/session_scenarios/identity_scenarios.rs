//! Identity transitions and what gets loaded for each identity.

use std::time::Duration;

use bookpath::{
    AuthEvent, BookPathConfig, EditOutcome, IdentityId, IdentityKind, IdentityState, Noop, Notice,
    UserProfile,
};
use serde_json::json;

use crate::test_utils::Harness;

#[tokio::test]
async fn test_each_identity_sees_its_own_tree() {
    let mut h = Harness::new(BookPathConfig::default());
    h.remote.insert(
        IdentityId::from("alice"),
        json!({"nodes": [{"id": "1", "data": {"label": "Emma"}}], "edges": [], "nextId": 2}),
    );
    h.remote.insert(
        IdentityId::from("bob"),
        json!({"nodes": [{"id": 1, "data": {"label": "Dune"}}, {"id": 2, "data": {"label": "Hyperion"}}]}),
    );

    h.session
        .handle_auth_event(AuthEvent::SignedIn(UserProfile::new("alice", None)))
        .await;
    assert_eq!(h.session.controller().snapshot().nodes[0].label(), "Emma");

    h.session.handle_auth_event(AuthEvent::SignedOut).await;
    h.session
        .handle_auth_event(AuthEvent::SignedIn(UserProfile::new("bob", None)))
        .await;
    let snap = h.session.controller().snapshot();
    assert_eq!(snap.node_count(), 2);
    assert_eq!(snap.nodes[1].id, "2");
    assert_eq!(snap.next_id, 3);
}

#[tokio::test]
async fn test_sign_out_falls_back_and_drops_stale_writes() {
    let mut h = Harness::new(BookPathConfig::default());
    h.session
        .handle_auth_event(AuthEvent::SignedIn(UserProfile::new("alice", None)))
        .await;
    let created = h.remote.version_of(&IdentityId::from("alice"));

    // The next save is slow; queue another edit behind it, then sign out.
    h.remote.push_save_delay(Duration::from_millis(40));
    h.session.controller_mut().add_root_node("Emma");
    tokio::task::yield_now().await;
    h.session.controller_mut().add_root_node("Persuasion");

    let identity = h.session.handle_auth_event(AuthEvent::SignedOut).await;
    assert_eq!(identity.kind, IdentityKind::Fallback);
    assert_eq!(
        h.session.ctx().identity(),
        IdentityState::Resolved(identity.clone())
    );
    h.session.flush().await;

    // The started write landed; the queued one was discarded.
    let doc = h.remote.document(&IdentityId::from("alice")).unwrap();
    assert_eq!(doc["nodes"].as_array().unwrap().len(), 1);
    assert_ne!(h.remote.version_of(&IdentityId::from("alice")), created);
    assert!(h.remote.document(&identity.id).is_none());
}

#[tokio::test]
async fn test_load_failure_uses_local_mirror() {
    let mut h = Harness::new(BookPathConfig::default());
    h.session.handle_auth_event(AuthEvent::NoSession).await;
    h.session.controller_mut().add_root_node("Dune");
    h.session.flush().await;

    h.remote.fail_loads(true);
    h.session
        .handle_auth_event(AuthEvent::SignedIn(UserProfile::new("carol", None)))
        .await;

    assert_eq!(h.session.controller().node_count(), 1);
    assert_eq!(h.session.controller().snapshot().next_id, 2);
    let notices = h.presenter.notices();
    assert_eq!(notices.len(), 1);
    match &notices[0] {
        Notice::LoadFailed { identity, reason } => {
            assert_eq!(identity.as_str(), "carol");
            assert!(!reason.is_empty());
        }
        other => panic!("unexpected notice {:?}", other),
    }
}

#[tokio::test]
async fn test_read_only_fallback_cannot_edit() {
    let mut h = Harness::new(BookPathConfig::default().fallback_read_only(true));
    h.remote.insert(
        IdentityId::from("lined-admin"),
        json!({"nodes": [{"id": "1", "data": {"label": "Dune"}}], "edges": [], "nextId": 2}),
    );
    h.session.handle_auth_event(AuthEvent::NoSession).await;

    let graph = h.session.controller_mut();
    assert_eq!(graph.node_count(), 1);
    assert_eq!(
        graph.add_root_node("Emma"),
        EditOutcome::Ignored(Noop::IdentityUnresolved)
    );
    assert!(graph.clear_all().is_err());
}

#[tokio::test]
async fn test_malformed_remote_document_is_coerced() {
    let mut h = Harness::new(BookPathConfig::default());
    h.remote.insert(
        IdentityId::from("dave"),
        json!({
            "nodes": [
                {"id": "4", "data": {"label": "Dune"}},
                {"id": "5"},
                "garbage"
            ],
            "edges": [{"source": "4", "target": "4"}, {"source": "4"}],
            "nextId": "seven"
        }),
    );
    h.session
        .handle_auth_event(AuthEvent::SignedIn(UserProfile::new("dave", None)))
        .await;
    let snap = h.session.controller().snapshot();
    assert_eq!(snap.node_count(), 1);
    assert_eq!(snap.edge_count(), 1);
    assert_eq!(snap.edges[0].id, "4-4");
    assert_eq!(snap.next_id, 5);
    assert!(h.presenter.notices().is_empty());
}

#[tokio::test]
async fn test_huge_remote_counter_cannot_break_adds() {
    let mut h = Harness::new(BookPathConfig::default());
    h.remote.insert(
        IdentityId::from("erin"),
        json!({"nodes": [], "edges": [], "nextId": 1e30}),
    );
    h.session
        .handle_auth_event(AuthEvent::SignedIn(UserProfile::new("erin", None)))
        .await;
    assert_eq!(h.session.controller().snapshot().next_id, 1);
    assert_eq!(
        h.session.controller_mut().add_root_node("Dune"),
        EditOutcome::NodeAdded {
            node_id: "1".to_string()
        }
    );
}

#[tokio::test]
async fn test_counter_at_limit_stops_cleanly() {
    let mut h = Harness::new(BookPathConfig::default());
    h.remote.insert(
        IdentityId::from("erin"),
        json!({
            "nodes": [{"id": "18446744073709551615", "data": {"label": "Far"}}],
            "edges": [],
            "nextId": 9007199254740992u64
        }),
    );
    h.session
        .handle_auth_event(AuthEvent::SignedIn(UserProfile::new("erin", None)))
        .await;

    let graph = h.session.controller_mut();
    assert_eq!(
        graph.add_root_node("Dune"),
        EditOutcome::NodeAdded {
            node_id: "9007199254740992".to_string()
        }
    );
    assert_eq!(
        graph.add_root_node("Emma"),
        EditOutcome::Ignored(Noop::IdsExhausted)
    );
    assert_eq!(graph.node_count(), 2);
}

#[tokio::test]
async fn test_denied_identity_keeps_the_mirror_graph() {
    let mut h = Harness::new(BookPathConfig::default());
    h.session.handle_auth_event(AuthEvent::NoSession).await;
    h.session.controller_mut().add_root_node("Dune");
    h.session.flush().await;

    let dave = IdentityId::from("dave");
    h.remote.deny(dave.clone());
    h.session
        .handle_auth_event(AuthEvent::SignedIn(UserProfile::new("dave", None)))
        .await;
    match h.presenter.notices().as_slice() {
        [Notice::LoadFailed { identity, reason }] => {
            assert_eq!(identity, &dave);
            assert_eq!(reason, "permission denied for 'dave'");
        }
        other => panic!("unexpected notices {:?}", other),
    }
    assert_eq!(h.session.controller().node_count(), 1);

    h.session.controller_mut().add_root_node("Emma");
    h.session.flush().await;
    assert_eq!(h.remote.document(&dave), None);

    // Once access returns, the carried-over graph lands in dave's tree.
    h.remote.allow(&dave);
    h.session.controller_mut().add_root_node("Ulysses");
    h.session.flush().await;
    let doc = h.remote.document(&dave).unwrap();
    assert_eq!(doc["nodes"].as_array().unwrap().len(), 3);
}
