//! Integration tests for core-async on native platforms.

use core_async::cancel::{cancellable, CancellationToken, Cancelled};
use core_async::{task, time};

#[tokio::test]
async fn test_task_spawn() {
    let handle = task::spawn(async { 42 });
    let result = handle.await.unwrap();
    assert_eq!(result, 42);
}

#[tokio::test]
async fn test_timeout_success() {
    let result = time::timeout(time::Duration::from_millis(100), async {
        time::sleep(time::Duration::from_millis(10)).await;
        42
    })
    .await;

    assert_eq!(result.unwrap(), 42);
}

#[tokio::test(start_paused = true)]
async fn test_timeout_failure() {
    let result = time::timeout(time::Duration::from_millis(10), async {
        time::sleep(time::Duration::from_millis(100)).await;
        42
    })
    .await;

    assert!(result.is_err());
}

#[tokio::test]
async fn test_child_token_follows_parent() {
    let parent = CancellationToken::new();
    let children: Vec<_> = (0..3).map(|_| parent.child_token()).collect();

    parent.cancel();

    for child in &children {
        assert!(child.is_cancelled());
    }
}

#[tokio::test]
async fn test_child_cancel_leaves_parent_alive() {
    let parent = CancellationToken::new();
    let child = parent.child_token();

    child.cancel();

    assert!(!parent.is_cancelled());
    assert_eq!(cancellable(&parent, async { 7 }).await, Ok(7));
    assert_eq!(cancellable(&child, async { 7 }).await, Err(Cancelled));
}

#[tokio::test(start_paused = true)]
async fn test_cancel_from_spawned_task() {
    let token = CancellationToken::new();
    let remote = token.clone();

    let canceller = task::spawn(async move {
        time::sleep(time::Duration::from_millis(5)).await;
        remote.cancel();
    });

    let outcome = cancellable(&token, time::sleep(time::Duration::from_secs(30))).await;
    canceller.await.unwrap();

    assert_eq!(outcome, Err(Cancelled));
}
