// tests/config.rs

mod common;
use crate::common::init_tracing;

use std::time::Duration;

use beamline::config::{load_and_validate, ConfigFile};
use beamline::errors::BeamlineError;
use beamline_test_utils::builders::ConfigFileBuilder;

const MINIMAL: &str = r#"
[app]
state_file = "var/state.json"

[ssh]
host = "gpu-cluster.internal"
username = "beamline"

[resources]
gpu_count = 8

[paths]
local_data = "/data/cases"
remote_workspace = "/workspace/cases"
"#;

fn write_config(contents: &str) -> (tempfile::TempDir, std::path::PathBuf) {
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("Beamline.toml");
    std::fs::write(&path, contents).unwrap();
    (dir, path)
}

#[test]
fn minimal_config_fills_in_defaults() {
    init_tracing();
    let (_dir, path) = write_config(MINIMAL);

    let config = load_and_validate(&path).expect("valid config");

    assert_eq!(config.app.scan_interval_secs, 60);
    assert_eq!(config.ssh.port, 22);
    assert_eq!(config.ssh.pool_size, 5);
    assert_eq!(config.ssh.connect_timeout(), Duration::from_secs(10));
    assert_eq!(config.ssh.acquire_timeout(), Duration::from_secs(30));
    assert!(config.ssh.key_file.is_none());
    assert_eq!(config.resources.gpus_per_job, 1);
    assert_eq!(config.retry.max_attempts, 3);
    assert_eq!(config.circuit_breaker.failure_threshold, 5);
    assert_eq!(
        config.circuit_breaker.recovery_timeout(),
        Duration::from_secs(30)
    );
}

#[test]
fn retry_section_maps_to_a_policy() {
    init_tracing();
    let (_dir, path) = write_config(&format!(
        "{MINIMAL}\n[retry]\nmax_attempts = 5\nbase_delay_ms = 50\nmax_delay_ms = 400\n"
    ));

    let config = load_and_validate(&path).unwrap();
    let policy = config.retry.policy();

    assert_eq!(policy.max_attempts, 5);
    assert_eq!(policy.base_delay, Duration::from_millis(50));
    assert_eq!(policy.max_delay, Duration::from_millis(400));
}

#[test]
fn malformed_toml_is_a_parse_error() {
    init_tracing();
    let (_dir, path) = write_config("[app\nstate_file =");

    let err = load_and_validate(&path).unwrap_err();
    assert!(matches!(err, BeamlineError::Toml(_)), "got {err}");
}

#[test]
fn missing_file_is_an_io_error() {
    init_tracing();
    let dir = tempfile::TempDir::new().unwrap();
    let err = load_and_validate(dir.path().join("nope.toml")).unwrap_err();
    assert!(matches!(err, BeamlineError::Io(_)), "got {err}");
}

#[test]
fn semantic_violations_are_config_errors() {
    init_tracing();

    let cases = [
        ConfigFileBuilder::new("state.json").host("   ").raw(),
        ConfigFileBuilder::new("state.json").pool_size(0).raw(),
        ConfigFileBuilder::new("state.json").gpu_count(0).raw(),
        // More GPUs per job than the inventory holds.
        ConfigFileBuilder::new("state.json")
            .gpu_count(2)
            .gpus_per_job(4)
            .raw(),
    ];

    for raw in cases {
        let err = ConfigFile::try_from(raw).unwrap_err();
        assert!(matches!(err, BeamlineError::Config(_)), "got {err}");
    }
}
