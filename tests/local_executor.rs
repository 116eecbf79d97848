// tests/local_executor.rs

mod common;
use crate::common::init_tracing;

use beamline::exec::{Executor, LocalExecutor};

#[tokio::test]
async fn captures_stdout_and_exit_code() {
    init_tracing();
    let executor = LocalExecutor;

    let output = executor.execute("echo hello").await.expect("echo runs");
    assert!(output.success());
    assert_eq!(output.stdout.trim(), "hello");
}

#[tokio::test]
async fn nonzero_exit_is_reported_not_an_error() {
    init_tracing();
    let executor = LocalExecutor;

    let output = executor
        .execute("echo oops >&2; exit 3")
        .await
        .expect("command ran");
    assert!(!output.success());
    assert_eq!(output.exit_code, 3);
    assert_eq!(output.stderr.trim(), "oops");
}
