//! Edit gestures against a resolved identity.

use bookpath::{AuthEvent, BookPathConfig, EditOutcome, IdentityId, Noop};

use crate::test_utils::Harness;

#[tokio::test]
async fn test_dune_foundation_scenario() {
    let mut h = Harness::new(BookPathConfig::default().fallback_identity("admin"));
    let identity = h.session.handle_auth_event(AuthEvent::NoSession).await;
    assert_eq!(identity.id.as_str(), "admin");

    let graph = h.session.controller_mut();
    assert_eq!(
        graph.add_root_node("Dune"),
        EditOutcome::NodeAdded {
            node_id: "1".to_string()
        }
    );
    assert_eq!(graph.snapshot().node_count(), 1);
    assert_eq!(graph.snapshot().nodes[0].label(), "Dune");
    assert_eq!(graph.snapshot().next_id, 2);

    graph.select_node("1");
    assert_eq!(
        graph.add_connected_node("Foundation"),
        EditOutcome::NodeAndEdgeAdded {
            node_id: "2".to_string(),
            edge_id: "1-2".to_string()
        }
    );
    assert_eq!(graph.snapshot().node_count(), 2);
    assert_eq!(graph.snapshot().edge_count(), 1);

    // Existing label: no new node, a literal self-edge from the selection.
    assert_eq!(
        graph.add_connected_node("Dune"),
        EditOutcome::EdgeAdded {
            edge_id: "1-1".to_string()
        }
    );
    let snap = graph.snapshot().clone();
    assert_eq!(snap.node_count(), 2);
    let edge_ids: Vec<_> = snap.edges.iter().map(|e| e.id.as_str()).collect();
    assert_eq!(edge_ids, vec!["1-2", "1-1"]);
    assert_eq!(snap.edges[1].source, "1");
    assert_eq!(snap.edges[1].target, "1");

    h.session.flush().await;
    let stored = h.remote.document(&IdentityId::from("admin")).unwrap();
    assert_eq!(stored["edges"][1]["id"], "1-1");
    assert_eq!(stored["nextId"], 3);
}

#[tokio::test]
async fn test_connected_node_twice_same_label() {
    let mut h = Harness::new(BookPathConfig::default());
    h.session.handle_auth_event(AuthEvent::NoSession).await;
    let graph = h.session.controller_mut();
    graph.add_root_node("Emma");
    graph.select_node("1");

    graph.add_connected_node("Persuasion");
    graph.add_connected_node("Persuasion");

    let snap = graph.snapshot();
    assert_eq!(snap.node_count(), 2);
    assert_eq!(snap.edge_count(), 2);
    assert!(snap.edges.iter().all(|e| e.id == "1-2"));
}

#[tokio::test]
async fn test_gestures_before_identity_are_ignored() {
    let mut h = Harness::new(BookPathConfig::default());
    let graph = h.session.controller_mut();
    assert_eq!(
        graph.add_root_node("Dune"),
        EditOutcome::Ignored(Noop::IdentityUnresolved)
    );
    assert!(graph.snapshot().is_empty());
    h.session.flush().await;
    assert!(h.local.is_empty());
    assert_eq!(h.remote.shard_count(), 0);
}

#[tokio::test]
async fn test_labels_are_trimmed_and_case_sensitive() {
    let mut h = Harness::new(BookPathConfig::default());
    h.session.handle_auth_event(AuthEvent::NoSession).await;
    let graph = h.session.controller_mut();
    assert!(graph.add_root_node("  Dune  ").is_applied());
    assert_eq!(
        graph.add_root_node("Dune"),
        EditOutcome::Ignored(Noop::DuplicateLabel)
    );
    assert!(graph.add_root_node("DUNE").is_applied());
    assert_eq!(graph.find_by_label("Dune").map(|n| n.id.as_str()), Some("1"));
}
