//! Remote write ordering under both write policies.

use std::time::Duration;

use bookpath::{AuthEvent, BookPathConfig, IdentityId, UserProfile, WritePolicy};

use crate::test_utils::Harness;

async fn signed_in(policy: WritePolicy) -> Harness {
    let mut h = Harness::new(BookPathConfig::default().write_policy(policy));
    h.session
        .handle_auth_event(AuthEvent::SignedIn(UserProfile::new("reader", None)))
        .await;
    h
}

fn stored_labels(h: &Harness) -> Vec<String> {
    let doc = h.remote.document(&IdentityId::from("reader")).unwrap();
    doc["nodes"]
        .as_array()
        .unwrap()
        .iter()
        .map(|n| n["data"]["label"].as_str().unwrap().to_string())
        .collect()
}

#[tokio::test]
async fn test_single_flight_keeps_last_submitted() {
    let mut h = signed_in(WritePolicy::SingleFlight).await;
    h.remote.push_save_delay(Duration::from_millis(40));

    h.session.controller_mut().add_root_node("Dune");
    tokio::task::yield_now().await;
    for label in ["Emma", "Hyperion", "Ulysses"] {
        h.session.controller_mut().add_root_node(label);
    }
    h.session.flush().await;

    assert_eq!(stored_labels(&h), vec!["Dune", "Emma", "Hyperion", "Ulysses"]);
}

#[tokio::test]
async fn test_last_completed_lets_slow_write_win() {
    let mut h = signed_in(WritePolicy::LastCompleted).await;
    h.remote.push_save_delay(Duration::from_millis(40));

    h.session.controller_mut().add_root_node("Dune");
    tokio::time::sleep(Duration::from_millis(5)).await;
    h.session.controller_mut().add_root_node("Emma");
    h.session.flush().await;

    // The older snapshot finished last and overwrote the newer one.
    assert_eq!(stored_labels(&h), vec!["Dune"]);
    assert_eq!(h.session.controller().node_count(), 2);
}

#[tokio::test]
async fn test_failed_remote_write_keeps_local_state() {
    let mut h = signed_in(WritePolicy::SingleFlight).await;
    h.remote.fail_saves(true);
    h.session.controller_mut().add_root_node("Dune");
    h.session.flush().await;

    assert!(stored_labels(&h).is_empty());
    assert!(h.session.controller().last_saved().is_some());
}
