//! Clearing the graph.

use bookpath::{
    AuthEvent, BookPathConfig, ClearOutcome, GraphSnapshot, IdentityId, Notice, SessionError,
    UserProfile,
};

use crate::test_utils::Harness;

#[tokio::test]
async fn test_clear_with_unresolved_identity_aborts() {
    let mut h = Harness::new(BookPathConfig::default());
    let before = h.session.controller().snapshot().clone();

    let err = h.session.controller_mut().clear_all().unwrap_err();
    assert!(matches!(err, SessionError::IdentityRequired));

    h.session.flush().await;
    assert_eq!(*h.session.controller().snapshot(), before);
    assert_eq!(h.presenter.notices(), vec![Notice::IdentityRequired]);
    assert!(h.presenter.prompts().is_empty());
    assert!(h.local.is_empty());
    assert_eq!(h.remote.save_count(), 0);
}

#[tokio::test]
async fn test_clear_empties_both_stores() {
    let mut h = Harness::new(BookPathConfig::default());
    h.session
        .handle_auth_event(AuthEvent::SignedIn(UserProfile::new("reader-1", Some("Ada"))))
        .await;
    let graph = h.session.controller_mut();
    graph.add_root_node("Dune");
    graph.select_node("1");
    graph.add_connected_node("Foundation");
    h.session.flush().await;
    assert!(!h.local.is_empty());

    let outcome = h.session.controller_mut().clear_all().unwrap();
    assert_eq!(outcome, ClearOutcome::Cleared);
    h.session.flush().await;

    let graph = h.session.controller();
    assert_eq!(*graph.snapshot(), GraphSnapshot::empty());
    assert_eq!(graph.selected(), None);
    assert_eq!(graph.last_saved(), None);
    assert!(h.local.is_empty());
    assert_eq!(
        h.remote.document(&IdentityId::from("reader-1")),
        Some(serde_json::json!({"nodes": [], "edges": [], "nextId": 1}))
    );
}

#[tokio::test]
async fn test_declined_clear_keeps_graph() {
    let mut h = Harness::new(BookPathConfig::default());
    h.session.handle_auth_event(AuthEvent::NoSession).await;
    h.session.controller_mut().add_root_node("Dune");
    h.presenter.set_answer(false);

    assert_eq!(
        h.session.controller_mut().clear_all().unwrap(),
        ClearOutcome::Declined
    );
    assert_eq!(h.session.controller().node_count(), 1);
}
