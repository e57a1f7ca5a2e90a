#![recursion_limit = "256"]
//! # Main Entry Point
//!
//! Initializes the application:
//! - Domain: property groups, errors and collaborator traits
//! - Infrastructure: Matrix transport, RSS listing source
//! - Application: config store, scheduler, scrape, router, controller
//! - Interface: command handlers
//!

mod application;
mod domain;
mod infrastructure;
mod interface;
mod strings;
#[cfg(test)]
mod testing;

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;

use crate::application::controller::BotController;
use crate::infrastructure::matrix::MatrixConnector;
use crate::infrastructure::rss::RssListingSource;
use crate::strings::logs;

#[derive(Parser, Debug)]
#[command(version, about = "Chat bot that watches classifieds listings")]
struct Args {
    /// Directory holding the property documents and matrix.yaml
    #[arg(long, default_value = "data")]
    config_dir: PathBuf,

    /// Directory for session.log (defaults to the config directory)
    #[arg(long)]
    log_dir: Option<PathBuf>,

    /// Log to stdout only
    #[arg(long)]
    no_file_log: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let log_dir = (!args.no_file_log)
        .then(|| args.log_dir.clone().unwrap_or_else(|| args.config_dir.clone()));
    let _guard = application::logging::init(log_dir.as_deref())?;

    tracing::info!("Starting listing-watch...");

    let source = Arc::new(RssListingSource::new()?);
    let controller = BotController::start(&args.config_dir, &MatrixConnector, source)
        .await
        .context("Failed to start bot")?;

    match tokio::signal::ctrl_c().await {
        Ok(()) => tracing::info!("{}", logs::SHUTDOWN),
        Err(e) => tracing::error!("{}", logs::shutdown_fail(&e.to_string())),
    }

    controller.stop_handle().stop().await;
    controller.wait().await;
    Ok(())
}
