use super::*;
use mg_core::{Direction, Version};
use std::path::PathBuf;

fn file(version: u64) -> MigrationFile {
    MigrationFile {
        version: Version::new(version),
        direction: Direction::Up,
        name: "a".to_string(),
        file_name: format!("{version}_a.up.sql"),
        path: PathBuf::from(format!("{version}_a.up.sql")),
    }
}

#[tokio::test]
async fn test_events_arrive_in_order_then_close() {
    let (tx, mut rx) = channel();
    let producer = tokio::spawn(async move {
        assert!(tx.info("starting").await);
        for v in 1..=20 {
            assert!(tx.file_applied(file(v)).await);
        }
    });

    let mut seen = Vec::new();
    let ok = rx
        .drain(|event| {
            if let ProgressEvent::FileApplied(f) = event {
                seen.push(f.version.get());
            }
        })
        .await;
    producer.await.unwrap();

    assert!(ok);
    assert_eq!(seen, (1..=20).collect::<Vec<_>>());
    assert!(rx.recv().await.is_none());
}

#[tokio::test]
async fn test_fail_is_last_and_marks_receiver() {
    let (tx, mut rx) = channel();
    tokio::spawn(async move {
        tx.file_applied(file(1)).await;
        tx.fail(MigrateError::Cancelled).await;
    });

    assert!(matches!(rx.recv().await, Some(ProgressEvent::FileApplied(_))));
    assert!(!rx.failed());
    assert!(matches!(
        rx.recv().await,
        Some(ProgressEvent::Error(MigrateError::Cancelled))
    ));
    assert!(rx.failed());
    assert!(rx.recv().await.is_none());
}

#[tokio::test]
async fn test_sender_notices_dropped_receiver() {
    let (tx, rx) = channel();
    drop(rx);
    assert!(!tx.info("nobody listening").await);
}

#[tokio::test]
async fn test_full_queue_applies_backpressure() {
    let (tx, mut rx) = channel();
    for v in 0..CHANNEL_CAPACITY as u64 {
        assert!(tx.file_applied(file(v)).await);
    }

    let blocked = tokio::time::timeout(
        std::time::Duration::from_millis(50),
        tx.file_applied(file(99)),
    )
    .await;
    assert!(blocked.is_err(), "send should wait for the consumer");

    assert!(rx.recv().await.is_some());
    assert!(tx.file_applied(file(99)).await);
}
