mod aggregate;
mod config;
mod manager;
mod plot;
mod samples;

use crate::manager::Manager;
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(version, about)]
struct CLI {
    #[arg(long)]
    config: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    Render {
        #[arg(long)]
        job: Option<String>,
    },

    Aggregate {
        #[arg(long)]
        job: String,
    },
}

fn main() {
    env_logger::Builder::new()
        .format_timestamp_millis()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();

    if let Err(error) = run_cli() {
        log::error!("{error:#?}");
        std::process::exit(1);
    }
}

fn run_cli() -> Result<()> {
    let args = CLI::parse();
    log::info!("{args:#?}");

    let mgr = Manager::new(&args.config).context("failed to construct mgr")?;

    match args.command {
        Command::Render { job } => mgr.render_jobs(job.as_deref())?,
        Command::Aggregate { job } => mgr.print_aggregates(&job)?,
    }

    Ok(())
}
