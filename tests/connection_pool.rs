// tests/connection_pool.rs

mod common;
use crate::common::init_tracing;

use std::time::Duration;

use beamline::errors::BeamlineError;
use beamline::remote::ConnectionPool;
use beamline_test_utils::fake_session::FakeSessionFactory;

const ACQUIRE_TIMEOUT: Duration = Duration::from_millis(100);

async fn pool_of(factory: &FakeSessionFactory, size: usize) -> ConnectionPool {
    ConnectionPool::connect(Box::new(factory.clone()), size, ACQUIRE_TIMEOUT)
        .await
        .expect("pool connects")
}

#[tokio::test]
async fn connects_eagerly() {
    init_tracing();
    let factory = FakeSessionFactory::new();
    let pool = pool_of(&factory, 3).await;

    assert_eq!(factory.constructed_count(), 3);
    assert_eq!(pool.idle_count(), 3);
}

#[tokio::test]
async fn construction_failure_aborts_with_wrapped_error() {
    init_tracing();
    let factory = FakeSessionFactory::new();
    factory.fail_connects("host unreachable");

    let err = ConnectionPool::connect(Box::new(factory), 2, ACQUIRE_TIMEOUT)
        .await
        .unwrap_err();
    match err {
        BeamlineError::Connection(msg) => {
            assert!(msg.contains("Failed to create initial sessions"), "{msg}");
            assert!(msg.contains("host unreachable"), "{msg}");
        }
        other => panic!("expected Connection error, got {other}"),
    }
}

#[tokio::test]
async fn acquire_blocks_until_release_and_times_out_distinctly() {
    init_tracing();
    let factory = FakeSessionFactory::new();
    let pool = pool_of(&factory, 1).await;

    let session = pool.acquire().await.expect("first acquire");
    assert_eq!(pool.idle_count(), 0);

    // Pool is empty: the second acquire times out with AcquireTimeout, not a
    // connection error.
    let err = pool.acquire().await.unwrap_err();
    assert!(matches!(err, BeamlineError::AcquireTimeout), "got {err}");

    pool.release(session).await;
    assert_eq!(pool.idle_count(), 1);
    assert!(pool.acquire().await.is_ok());
}

#[tokio::test]
async fn dead_session_is_replaced_on_release() {
    init_tracing();
    let factory = FakeSessionFactory::new();
    let pool = pool_of(&factory, 1).await;

    let session = pool.acquire().await.unwrap();
    factory.kill_session(0);
    pool.release(session).await;

    // The dead session was closed and a fresh one constructed in its place.
    assert_eq!(factory.constructed_count(), 2);
    assert_eq!(factory.closed_count(), 1);
    assert_eq!(pool.idle_count(), 1);
}

#[tokio::test]
async fn pool_shrinks_when_replacement_fails() {
    init_tracing();
    let factory = FakeSessionFactory::new();
    let pool = pool_of(&factory, 2).await;

    let session = pool.acquire().await.unwrap();
    factory.kill_session(0);
    factory.kill_session(1);
    factory.fail_connects("cluster is down");
    pool.release(session).await;

    // One slot is gone; the other session is still usable.
    assert_eq!(pool.idle_count(), 1);
    assert_eq!(factory.constructed_count(), 2);
}

#[tokio::test]
async fn with_session_releases_on_error_too() {
    init_tracing();
    let factory = FakeSessionFactory::new();
    let pool = pool_of(&factory, 1).await;

    let result: Result<(), _> = pool
        .with_session(|_session| {
            Box::pin(async { Err(BeamlineError::Transfer("scripted failure".to_string())) })
        })
        .await;
    assert!(result.is_err());

    // The session went back despite the failure.
    assert_eq!(pool.idle_count(), 1);

    let output = pool
        .with_session(|session| session.exec("hostname"))
        .await
        .expect("session still usable");
    assert!(output.success());
}
