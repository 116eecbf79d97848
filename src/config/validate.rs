// src/config/validate.rs

use crate::config::model::{ConfigFile, RawConfigFile};
use crate::errors::{BeamlineError, Result};

impl TryFrom<RawConfigFile> for ConfigFile {
    type Error = crate::errors::BeamlineError;

    fn try_from(raw: RawConfigFile) -> std::result::Result<Self, Self::Error> {
        validate_raw_config(&raw)?;
        Ok(ConfigFile::new_unchecked(raw))
    }
}

fn validate_raw_config(cfg: &RawConfigFile) -> Result<()> {
    validate_app(cfg)?;
    validate_ssh(cfg)?;
    validate_resources(cfg)?;
    validate_resilience(cfg)?;
    Ok(())
}

fn validate_app(cfg: &RawConfigFile) -> Result<()> {
    if cfg.app.scan_interval_secs == 0 {
        return Err(BeamlineError::Config(
            "[app].scan_interval_secs must be >= 1 (got 0)".to_string(),
        ));
    }
    Ok(())
}

fn validate_ssh(cfg: &RawConfigFile) -> Result<()> {
    if cfg.ssh.host.trim().is_empty() {
        return Err(BeamlineError::Config(
            "[ssh].host must not be empty".to_string(),
        ));
    }
    if cfg.ssh.username.trim().is_empty() {
        return Err(BeamlineError::Config(
            "[ssh].username must not be empty".to_string(),
        ));
    }
    if cfg.ssh.pool_size == 0 {
        return Err(BeamlineError::Config(
            "[ssh].pool_size must be >= 1 (got 0)".to_string(),
        ));
    }
    if cfg.ssh.connect_timeout_secs == 0 {
        return Err(BeamlineError::Config(
            "[ssh].connect_timeout_secs must be >= 1 (got 0)".to_string(),
        ));
    }
    Ok(())
}

fn validate_resources(cfg: &RawConfigFile) -> Result<()> {
    if cfg.resources.gpu_count == 0 {
        return Err(BeamlineError::Config(
            "[resources].gpu_count must be >= 1 (got 0)".to_string(),
        ));
    }
    if cfg.resources.gpus_per_job == 0 {
        return Err(BeamlineError::Config(
            "[resources].gpus_per_job must be >= 1 (got 0)".to_string(),
        ));
    }
    if cfg.resources.gpus_per_job > cfg.resources.gpu_count {
        return Err(BeamlineError::Config(format!(
            "[resources].gpus_per_job ({}) exceeds gpu_count ({})",
            cfg.resources.gpus_per_job, cfg.resources.gpu_count
        )));
    }
    Ok(())
}

fn validate_resilience(cfg: &RawConfigFile) -> Result<()> {
    if cfg.retry.max_attempts == 0 {
        return Err(BeamlineError::Config(
            "[retry].max_attempts must be >= 1 (got 0)".to_string(),
        ));
    }
    if cfg.retry.exponential_base < 1.0 {
        return Err(BeamlineError::Config(format!(
            "[retry].exponential_base must be >= 1.0 (got {})",
            cfg.retry.exponential_base
        )));
    }
    if cfg.circuit_breaker.failure_threshold == 0 {
        return Err(BeamlineError::Config(
            "[circuit_breaker].failure_threshold must be >= 1 (got 0)".to_string(),
        ));
    }
    Ok(())
}
