pub mod analysis;
pub mod cli;
pub mod db;
pub mod metrics;
pub mod models;
pub mod progress;
pub mod sensing;
pub mod settings;
mod utils;

use anyhow::{Context, Result};
use clap::Parser;

use cli::Args;

pub fn run() -> Result<()> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();

    let args = Args::parse();

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("failed to build tokio runtime")?;

    runtime.block_on(cli::dispatch(args))
}
