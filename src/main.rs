mod action;
mod app;
mod async_patch;
mod cli;
mod components;
mod config;
mod event;
mod git;
mod highlight;
mod logging;
mod state;
mod theme;
mod tui;

use anyhow::{Context, Result};
use clap::Parser;
use std::env;
use std::io;
use std::sync::Arc;
use tracing::{error, info};

use crate::app::{App, SharedRunner};
use crate::cli::Cli;
use crate::git::extract::extract;
use crate::git::{GitCommands, ProcessRunner};

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install().ok();
    tui::install_panic_hook();

    let cli = Cli::parse();
    let config = config::load_config();

    let log_path = cli
        .log_file
        .clone()
        .or_else(|| config.log_file.clone())
        .unwrap_or_else(logging::default_log_path);
    let log_guard = logging::init_or_disable(&log_path);
    info!(version = env!("CARGO_PKG_VERSION"), "starting");

    let cwd = env::current_dir().context("failed to read current directory")?;
    let runner: SharedRunner = Arc::new(ProcessRunner::new(&cwd));
    let commands = GitCommands::new(&config.git, &config.format_flag);

    // Resolve references before the terminal is taken over so errors land
    // on a normal stderr.
    let references = match extract(
        &cli.commits,
        &mut io::stdin().lock(),
        &runner,
        &commands.default_listing(),
    ) {
        Ok(references) => references,
        Err(e) => {
            error!(error = %e, "could not resolve references");
            eprintln!("vdiff: {e}");
            drop(log_guard);
            std::process::exit(1);
        }
    };
    info!(count = references.len(), "resolved references");

    let theme_name = cli.theme.as_deref().unwrap_or(&config.theme_name).to_string();
    let mut app = App::new(references, runner, commands, config, &theme_name)
        .context("failed to start patch worker")?;

    let mut terminal = tui::init()?;
    let result = app.run(&mut terminal).await;
    tui::restore()?;

    if let Err(ref e) = result {
        error!(error = %e, "exited with error");
        eprintln!("vdiff: {e:#}");
    }

    drop(log_guard);
    result
}
