// src/lib.rs

//! beamline: discovers compute cases in a local data directory and
//! orchestrates their processing on a remote GPU cluster over pooled SSH
//! sessions, with a crash-safe JSON state file as the source of truth.

pub mod cli;
pub mod config;
pub mod domain;
pub mod errors;
pub mod exec;
pub mod fs;
pub mod logging;
pub mod remote;
pub mod resilience;
pub mod resources;
pub mod services;
pub mod store;
pub mod types;

use std::sync::Arc;
use std::time::Duration;

use tracing::info;

use crate::cli::CliArgs;
use crate::config::ConfigFile;
use crate::domain::{TaskScheduler, WorkflowOrchestrator};
use crate::errors::Result;
use crate::exec::{Executor, RemoteExecutor};
use crate::fs::RealFileSystem;
use crate::remote::{ConnectionPool, SshMasterFactory};
use crate::resilience::{CircuitBreaker, CircuitBreakerExecutor, RetryingExecutor};
use crate::resources::GpuPool;
use crate::services::{CaseService, JobService, TransferService};
use crate::store::{StateCaseRepository, StateJobRepository, StateStore};

/// Fully wired application.
///
/// Besides the orchestrator driving the polling loop, the worker-facing
/// surface is exposed here: workers pull tasks from `scheduler`, allocate
/// `gpus_per_job` GPUs per job through `job_service`, and move case data
/// with `transfer`.
#[derive(Debug)]
pub struct App {
    pub orchestrator: WorkflowOrchestrator,
    pub scheduler: Arc<TaskScheduler>,
    pub job_service: Arc<JobService>,
    pub transfer: TransferService,
    pub gpus_per_job: usize,
    pub scan_interval: Duration,
}

/// Construct the application from validated configuration, leaves first.
///
/// Connects the SSH pool eagerly, so a misconfigured or unreachable host
/// fails at startup rather than on the first cycle. Every remote command
/// runs through breaker-around-retry.
pub async fn bootstrap(config: &ConfigFile) -> Result<App> {
    let store = Arc::new(StateStore::open(&config.app.state_file)?);
    let case_repo = Arc::new(StateCaseRepository::new(Arc::clone(&store)));
    let job_repo = Arc::new(StateJobRepository::new(Arc::clone(&store)));

    let gpus = Arc::new(GpuPool::new(config.resources.gpu_count));

    let case_service = Arc::new(CaseService::new(
        case_repo,
        Arc::new(RealFileSystem),
        config.paths.local_data.clone().into(),
    ));
    let job_service = Arc::new(JobService::new(job_repo, gpus));

    let factory = SshMasterFactory::new(config.ssh.clone())?;
    let pool = Arc::new(
        ConnectionPool::connect(
            Box::new(factory),
            config.ssh.pool_size,
            config.ssh.acquire_timeout(),
        )
        .await?,
    );

    let remote: Arc<dyn Executor> = Arc::new(CircuitBreakerExecutor::new(
        RetryingExecutor::new(RemoteExecutor::new(pool), config.retry.policy()),
        CircuitBreaker::new(
            config.circuit_breaker.failure_threshold,
            config.circuit_breaker.recovery_timeout(),
        ),
    ));

    let transfer = TransferService::new(
        remote,
        config.paths.local_data.clone(),
        config.paths.remote_workspace.clone(),
    );

    let scheduler = Arc::new(TaskScheduler::new(
        Arc::clone(&case_service),
        Arc::clone(&job_service),
    ));
    let orchestrator = WorkflowOrchestrator::new(case_service, Arc::clone(&scheduler));

    Ok(App {
        orchestrator,
        scheduler,
        job_service,
        transfer,
        gpus_per_job: config.resources.gpus_per_job as usize,
        scan_interval: Duration::from_secs(config.app.scan_interval_secs),
    })
}

/// Run the daemon according to the parsed CLI arguments.
///
/// `--dry-run` stops after config validation, `--once` runs a single cycle,
/// otherwise the polling loop runs until Ctrl-C.
pub async fn run(args: &CliArgs) -> Result<()> {
    let config = config::load_and_validate(&args.config)?;

    if args.dry_run {
        print_config_summary(&config);
        return Ok(());
    }

    let app = bootstrap(&config).await?;

    if args.once {
        app.orchestrator.process_new_cases();
        return Ok(());
    }

    info!(
        interval_secs = config.app.scan_interval_secs,
        "entering polling loop"
    );
    let mut ticker = tokio::time::interval(app.scan_interval);
    loop {
        tokio::select! {
            _ = ticker.tick() => app.orchestrator.process_new_cases(),
            _ = tokio::signal::ctrl_c() => {
                info!("shutdown signal received");
                return Ok(());
            }
        }
    }
}

fn print_config_summary(config: &ConfigFile) {
    println!("configuration OK");
    println!("  state file:        {}", config.app.state_file.display());
    println!("  scan interval:     {}s", config.app.scan_interval_secs);
    println!(
        "  ssh:               {}@{}:{} (pool size {})",
        config.ssh.username, config.ssh.host, config.ssh.port, config.ssh.pool_size
    );
    println!(
        "  gpus:              {} total, {} per job",
        config.resources.gpu_count, config.resources.gpus_per_job
    );
    println!("  local data:        {}", config.paths.local_data);
    println!("  remote workspace:  {}", config.paths.remote_workspace);
}
