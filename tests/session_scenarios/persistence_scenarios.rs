//! Local mirror durability and round-trips.

use std::sync::Arc;

use bookpath::{
    AuthEvent, BookPathConfig, Connection, FileMirrorStore, LocalMirror, MemoryMirrorStore,
    RecordingPresenter, Session, ShardedDocumentStore, StorageKeys, StructuralChange,
};
use tempfile::TempDir;

use crate::test_utils::Harness;

#[tokio::test]
async fn test_file_mirror_survives_restart() {
    let temp_dir = TempDir::new().unwrap();
    let config = BookPathConfig::default().mirror_dir(temp_dir.path().join("mirror"));
    let remote = Arc::new(ShardedDocumentStore::new());

    // Phase 1: edit, then go away.
    let saved = {
        let mut session = Session::open(
            config.clone(),
            remote.clone(),
            Arc::new(RecordingPresenter::default()),
        )
        .unwrap();
        session.handle_auth_event(AuthEvent::NoSession).await;
        let graph = session.controller_mut();
        graph.add_root_node("Dune");
        graph.select_node("1");
        graph.add_connected_node("Foundation");
        graph.add_root_node("Emma");
        session.flush().await;
        session.controller().snapshot().clone()
    };

    // Phase 2: read the mirror directly, no session, no remote.
    let store = FileMirrorStore::open(temp_dir.path().join("mirror")).unwrap();
    let mirror = LocalMirror::new(Arc::new(store), StorageKeys::default());
    let restored = mirror.read_snapshot();
    assert_eq!(restored, saved);
    let labels: Vec<_> = restored.nodes.iter().map(|n| n.label()).collect();
    assert_eq!(labels, vec!["Dune", "Foundation", "Emma"]);
    assert_eq!(restored.next_id, 4);
    assert!(mirror.last_saved().is_some());
}

#[tokio::test]
async fn test_mirror_entries_use_configured_keys() {
    let keys = StorageKeys {
        nodes: "n".to_string(),
        edges: "e".to_string(),
        next_id: "c".to_string(),
        last_save: "t".to_string(),
    };
    let mut h = Harness::new(BookPathConfig::default().storage_keys(keys.clone()));
    h.session.handle_auth_event(AuthEvent::NoSession).await;
    h.session.controller_mut().add_root_node("Dune");

    let mirror = LocalMirror::new(h.local.clone(), keys);
    assert_eq!(mirror.read_or::<u64>("c", 0), 2);
    assert_eq!(h.local.len(), 4);
}

#[tokio::test]
async fn test_connect_gesture_round_trips_handles() {
    let mut h = Harness::new(BookPathConfig::default());
    h.session.handle_auth_event(AuthEvent::NoSession).await;
    let graph = h.session.controller_mut();
    graph.add_root_node("Dune");
    graph.add_root_node("Emma");
    let mut connection = Connection::new("2", "1");
    connection.source_handle = Some("bottom".to_string());
    connection.target_handle = Some("top".to_string());
    assert_eq!(
        graph.apply_structural_change(StructuralChange::Connect(connection)),
        1
    );

    let restored = LocalMirror::new(h.local.clone(), StorageKeys::default()).read_snapshot();
    assert_eq!(restored.edges[0].id, "2-1");
    assert_eq!(restored.edges[0].source_handle.as_deref(), Some("bottom"));
    assert_eq!(restored.edges[0].target_handle.as_deref(), Some("top"));
}

#[tokio::test]
async fn test_unwritable_mirror_does_not_block_remote() {
    let mut h = Harness::new(BookPathConfig::default());
    h.session.handle_auth_event(AuthEvent::NoSession).await;
    h.local.set_read_only(true);
    h.session.controller_mut().add_root_node("Dune");
    h.session.flush().await;

    assert!(h.local.is_empty());
    assert!(h.session.controller().last_saved().is_none());
    assert_eq!(h.remote.save_count(), 1);
}

#[test]
fn test_memory_mirror_defaults_when_empty() {
    let mirror = LocalMirror::new(Arc::new(MemoryMirrorStore::new()), StorageKeys::default());
    let snap = mirror.read_snapshot();
    assert!(snap.is_empty());
    assert_eq!(snap.next_id, 1);
    assert!(mirror.last_saved().is_none());
}
