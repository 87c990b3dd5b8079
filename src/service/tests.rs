use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

use tokio::time::timeout;

use super::Services;
use crate::client::ClientSync;
use crate::config::BrokerSettings;
use crate::log::Message;
use crate::utils::error::{SubscriptionError, ValidationError};

fn services() -> Services {
    Services::new(&BrokerSettings {
        queue_capacity: 256,
    })
}

#[test]
fn test_submit_returns_the_stored_record() {
    let services = services();

    let first = services
        .ingest
        .submit("Alice".to_string(), "hi".to_string(), false)
        .unwrap();
    assert_eq!(
        first,
        Message {
            id: 1,
            sender: "Alice".to_string(),
            payload: "hi".to_string(),
            is_image: false,
        }
    );

    let second = services
        .ingest
        .submit("Bob".to_string(), "yo".to_string(), false)
        .unwrap();
    assert_eq!(second.id, 2);

    assert_eq!(services.snapshot.list(), vec![first, second]);
}

#[test]
fn test_empty_payload_is_rejected_without_touching_the_log() {
    let services = services();

    let result = services
        .ingest
        .submit("Alice".to_string(), String::new(), false);
    assert_eq!(result, Err(ValidationError::EmptyPayload));
    assert!(services.snapshot.list().is_empty());
}

#[test]
fn test_image_payload_must_be_a_data_uri() {
    let services = services();

    let rejected = services
        .ingest
        .submit("Alice".to_string(), "cat.png".to_string(), true);
    assert_eq!(rejected, Err(ValidationError::NotADataUri));
    assert!(services.snapshot.list().is_empty());

    let accepted = services
        .ingest
        .submit(
            "Alice".to_string(),
            "data:image/png;base64,iVBORw0KGgo=".to_string(),
            true,
        )
        .unwrap();
    assert!(accepted.is_image);
    assert_eq!(services.snapshot.list().len(), 1);
}

#[tokio::test]
async fn test_subscriber_attached_midway_sees_only_later_messages() {
    let services = services();

    services
        .ingest
        .submit("Alice".to_string(), "hi".to_string(), false)
        .unwrap();

    let mut subscription = services.broker.subscribe();

    let second = services
        .ingest
        .submit("Bob".to_string(), "yo".to_string(), false)
        .unwrap();

    let live = timeout(Duration::from_secs(5), subscription.recv())
        .await
        .expect("timed out waiting for delivery")
        .unwrap();
    assert_eq!(live, second);

    let nothing_more = timeout(Duration::from_millis(50), subscription.recv()).await;
    assert!(nothing_more.is_err());
}

#[tokio::test]
async fn test_rejected_submission_reaches_no_subscriber() {
    let services = services();
    let mut subscription = services.broker.subscribe();

    services
        .ingest
        .submit("Alice".to_string(), String::new(), false)
        .unwrap_err();

    let nothing = timeout(Duration::from_millis(50), subscription.recv()).await;
    assert!(nothing.is_err());
}

#[test]
fn test_concurrent_submits_get_distinct_increasing_ids() {
    let services = Arc::new(services());
    let returned = Arc::new(Mutex::new(Vec::new()));
    let mut handles = Vec::new();

    for t in 0..4 {
        let services = services.clone();
        let returned = returned.clone();
        handles.push(thread::spawn(move || {
            for i in 0..25 {
                let message = services
                    .ingest
                    .submit(format!("writer-{t}"), format!("m{i}"), false)
                    .unwrap();
                returned.lock().unwrap().push(message.id);
            }
        }));
    }
    for handle in handles {
        handle.join().expect("writer thread panicked");
    }

    let mut ids = returned.lock().unwrap().clone();
    ids.sort_unstable();
    assert_eq!(ids, (1..=100).collect::<Vec<u64>>());

    let listed: Vec<u64> = services.snapshot.list().iter().map(|m| m.id).collect();
    assert_eq!(listed, (1..=100).collect::<Vec<u64>>());
}

// The join protocol: subscribe, then snapshot, then live events filtered by
// "already in snapshot". Run against a concurrent writer so publishes race
// the snapshot read; the result must be every message exactly once, in id
// order.
#[tokio::test]
async fn test_join_protocol_has_no_gaps_and_no_duplicates() {
    let services = Arc::new(services());

    let writer = {
        let services = services.clone();
        thread::spawn(move || {
            for i in 0..100 {
                services
                    .ingest
                    .submit("writer".to_string(), format!("m{i}"), false)
                    .unwrap();
            }
        })
    };

    let mut subscription = services.broker.subscribe();
    let mut sync = ClientSync::new();
    sync.apply_snapshot(services.snapshot.list());

    while sync.messages().len() < 100 {
        let event = timeout(Duration::from_secs(5), subscription.recv())
            .await
            .expect("timed out waiting for delivery")
            .unwrap();
        sync.apply_event(event);
    }
    writer.join().expect("writer thread panicked");

    let ids: Vec<u64> = sync.messages().iter().map(|m| m.id).collect();
    assert_eq!(ids, (1..=100).collect::<Vec<u64>>());
}

#[tokio::test]
async fn test_stalled_subscriber_overflow_is_isolated() {
    let services = Services::new(&BrokerSettings { queue_capacity: 4 });
    let mut stalled = services.broker.subscribe();
    let mut active = services.broker.subscribe();

    let submit = |i: u64| {
        services
            .ingest
            .submit("writer".to_string(), format!("m{i}"), false)
            .unwrap()
    };

    // The active subscriber keeps up; the stalled one never drains. Its
    // queue fills after four messages and the fifth disconnects it.
    for i in 1..=4 {
        submit(i);
    }
    for id in 1..=4 {
        let message = timeout(Duration::from_secs(5), active.recv())
            .await
            .expect("timed out waiting for delivery")
            .unwrap();
        assert_eq!(message.id, id);
    }

    for i in 5..=8 {
        submit(i);
    }
    for id in 5..=8 {
        let message = timeout(Duration::from_secs(5), active.recv())
            .await
            .expect("timed out waiting for delivery")
            .unwrap();
        assert_eq!(message.id, id);
    }

    assert_eq!(services.broker.subscriber_count(), 1);
    for id in 1..=4 {
        assert_eq!(stalled.recv().await.unwrap().id, id);
    }
    assert_eq!(stalled.recv().await, Err(SubscriptionError::Overflowed));
}
