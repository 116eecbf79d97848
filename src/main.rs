// src/main.rs

use anyhow::Result;

use beamline::{cli, logging, run};

#[tokio::main]
async fn main() -> Result<()> {
    let args = cli::parse();
    logging::init_logging(args.log_level)?;

    run(&args).await?;
    Ok(())
}
