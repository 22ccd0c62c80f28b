// tests/service_test.rs - Async operation surface and change notification

use drafty::formatting::FormatKind;
use drafty::margin::MarginSide;
use drafty::service::DocumentService;
use drafty::store::SnapshotStore;
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;

fn service_in(dir: &TempDir) -> DocumentService {
    DocumentService::new(SnapshotStore::new(dir.path()))
}

#[tokio::test]
async fn test_every_mutation_bumps_the_version() {
    let dir = TempDir::new().unwrap();
    let service = service_in(&dir);

    let v0 = service.get_version().await;
    service.insert_text("Hello world", 0).await.unwrap();
    let v1 = service.get_version().await;
    assert!(v1 > v0);

    service
        .switch_formatting(0, 4, FormatKind::Bold)
        .await
        .unwrap();
    let v2 = service.get_version().await;
    assert!(v2 > v1);

    service.delete_range(0, 0).await.unwrap();
    let v3 = service.get_version().await;
    assert!(v3 > v2);

    service.set_margin(MarginSide::Left, 20.0).await;
    assert!(service.get_version().await > v3);
}

#[tokio::test]
async fn test_failed_mutations_do_not_bump_the_version() {
    let dir = TempDir::new().unwrap();
    let service = service_in(&dir);
    service.insert_text("abc", 0).await.unwrap();

    let version = service.get_version().await;
    assert!(service.delete_range(2, 1).await.is_err());
    assert!(service.delete_range(0, 99).await.is_err());
    assert!(service.switch_formatting(0, 3, FormatKind::Bold).await.is_err());
    assert!(service.load("no-such-snapshot").await.is_err());
    assert_eq!(service.get_version().await, version);
    assert_eq!(service.get_text().await, "abc");
}

#[tokio::test]
async fn test_wait_returns_immediately_for_stale_versions() {
    let dir = TempDir::new().unwrap();
    let service = service_in(&dir);
    service.insert_text("abc", 0).await.unwrap();

    let current = service.get_version().await;
    let seen = tokio::time::timeout(Duration::from_secs(1), service.wait_for_change(current - 1))
        .await
        .expect("stale wait should not block");
    assert_eq!(seen, current);
}

#[tokio::test]
async fn test_wait_blocks_until_the_next_mutation() {
    let dir = TempDir::new().unwrap();
    let service = service_in(&dir);
    let current = service.get_version().await;

    // Nothing has changed yet, so the wait must still be pending
    let pending =
        tokio::time::timeout(Duration::from_millis(50), service.wait_for_change(current)).await;
    assert!(pending.is_err());

    service.insert_text("x", 0).await.unwrap();
    let seen = tokio::time::timeout(Duration::from_secs(1), service.wait_for_change(current))
        .await
        .expect("wait should resolve after a mutation");
    assert_eq!(seen, current + 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_single_bump_releases_every_waiter() {
    let dir = TempDir::new().unwrap();
    let service = Arc::new(service_in(&dir));
    let current = service.get_version().await;

    let mut waiters = Vec::new();
    for _ in 0..4 {
        let service = Arc::clone(&service);
        waiters.push(tokio::spawn(
            async move { service.wait_for_change(current).await },
        ));
    }
    // Give the waiters time to park before the bump
    tokio::time::sleep(Duration::from_millis(50)).await;

    service.insert_text("x", 0).await.unwrap();
    for waiter in waiters {
        let seen = tokio::time::timeout(Duration::from_secs(1), waiter)
            .await
            .expect("waiter should be released by one bump")
            .unwrap();
        assert_eq!(seen, current + 1);
    }
}

#[tokio::test]
async fn test_save_load_round_trip_through_the_service() {
    let dir = TempDir::new().unwrap();
    let service = service_in(&dir);

    service.insert_text("Hello world", 0).await.unwrap();
    service
        .switch_formatting(0, 4, FormatKind::Bold)
        .await
        .unwrap();
    let markup = service.get_markup().await;
    service.save("draft").await.unwrap();

    service.delete_range(0, 10).await.unwrap();
    assert_eq!(service.get_text().await, "");

    service.load("draft").await.unwrap();
    assert_eq!(service.get_text().await, "Hello world");
    assert_eq!(service.get_markup().await, markup);
}

#[tokio::test]
async fn test_markup_carries_margins_and_tags() {
    let dir = TempDir::new().unwrap();
    let service = service_in(&dir);

    service.insert_text("note", 0).await.unwrap();
    service
        .switch_formatting(0, 3, FormatKind::Italic)
        .await
        .unwrap();
    service.set_margin(MarginSide::Top, 25.0).await;

    let markup = service.get_markup().await;
    assert!(markup.contains("<i>note</i>"));
    assert!(markup.contains("padding: 2.5cm"));
}

#[tokio::test]
async fn test_find_through_the_service() {
    let dir = TempDir::new().unwrap();
    let service = service_in(&dir);
    service.insert_text("ababab", 0).await.unwrap();

    assert_eq!(
        service.find("ab", 0, None).await,
        vec![(0, 1), (2, 3), (4, 5)]
    );
    assert_eq!(service.find("ab", 2, Some(3)).await, vec![(2, 3)]);
}
