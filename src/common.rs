//! Common constants and helper functions used by both the interactive and CLI applications

use anyhow::Context;
use log::LevelFilter;
use simplelog::{ColorChoice, CombinedLogger, SharedLogger, TermLogger, TerminalMode, WriteLogger};
use std::fs;
use std::fs::File;
use std::path::PathBuf;

pub const APP_NAME: &str = "Kiro Cleaner & Machine ID Reset Tool";

pub const APP_DIRECTORY_NAME: &str = "kiro-cleaner";

/// Path to the local application data folder
/// This is where the logs will be stored
pub fn local_data_directory() -> anyhow::Result<PathBuf> {
    let path = dirs::data_local_dir()
        .context("Unable to get data_local_dir()")?
        .join(APP_DIRECTORY_NAME);
    fs::create_dir_all(&path).context("Unable to create data directory")?;
    Ok(path)
}

/// Path to the local application config folder
/// This is where the cleaner config will be stored
pub fn config_directory() -> anyhow::Result<PathBuf> {
    let path = dirs::config_local_dir()
        .context("Unable to get config_local_dir()")?
        .join(APP_DIRECTORY_NAME);
    fs::create_dir_all(&path).context("Unable to create local config directory")?;
    Ok(path)
}

/// Installs the terminal logger, and optionally a file logger.
/// When `interactive` nothing is logged to the terminal (unless debugging), the menu prints its
/// own status lines.
pub fn install_logger(debug: bool, to_disk: bool, interactive: bool) -> anyhow::Result<()> {
    let filter = if debug {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    let term_filter = if interactive && !debug {
        LevelFilter::Off
    } else {
        filter
    };
    let config = simplelog::ConfigBuilder::default()
        .set_target_level(LevelFilter::Debug)
        .build();
    let mut loggers: Vec<Box<dyn SharedLogger>> = vec![TermLogger::new(
        term_filter,
        config.clone(),
        TerminalMode::Stderr,
        ColorChoice::Auto,
    )];
    if to_disk {
        let file = File::create(get_log_path()?).context("Unable to create log file")?;
        let file_logger = WriteLogger::new(filter, config, file);
        loggers.push(file_logger);
    }
    CombinedLogger::init(loggers)?;
    if debug {
        log::warn!("Debug logging enabled");
    }
    Ok(())
}

pub fn get_log_path() -> anyhow::Result<PathBuf> {
    Ok(local_data_directory()?.join("log.txt"))
}
