//! Skiff console entry point.
//!
//! Runs a browser session on the headless engine with a text chrome.
//! Each stdin line is one command; `help` lists them. End of input quits.

mod commands;
mod console;

use std::io::{self, BufRead, IsTerminal};
use std::path::PathBuf;

use anyhow::Result;

use console::ConsoleChrome;
use skiff_browser::Session;
use skiff_engine::HeadlessEngine;
use skiff_types::config::ShellConfig;

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config_path = std::env::var_os("SKIFF_CONFIG")
        .map_or_else(|| PathBuf::from("skiff.toml"), PathBuf::from);
    let config = ShellConfig::load(&config_path)?;
    log::info!(
        "Starting {} (home: {}, history: {})",
        config.window_title,
        config.home_page.display(),
        config.history_file.display()
    );

    let engine = HeadlessEngine::new(config.http_cache_path(), config.storage_path());
    // Piped input has nobody to press Enter; dialogs must not eat commands.
    let chrome = ConsoleChrome::new(io::stdout(), io::stdin().is_terminal());
    let mut session = Session::start(config, engine, chrome)?;
    session.pump();

    // Dialogs read stdin too, so the lock is taken per line.
    commands::run(&mut session, |buf| io::stdin().lock().read_line(buf))?;

    log::info!("Skiff shut down cleanly");
    Ok(())
}
