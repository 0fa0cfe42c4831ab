//! Entry point for CLI driven application
use anyhow::Context;
use clap::{Parser, Subcommand};
use kiro_cleaner::common::{install_logger, APP_NAME};
use kiro_cleaner::config::CleanerConfig;
use kiro_cleaner::elevation::is_elevated;
use kiro_cleaner::tasks::{StepStatus, Task, Tasks};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    debug: bool,
    /// Override the config file path
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Override the storage.json path
    #[arg(long, global = true)]
    storage: Option<PathBuf>,
    /// Run even without administrator rights
    #[arg(long, global = true)]
    skip_elevation_check: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Delete the application folders
    Uninstall,
    /// Delete the application registry keys
    CleanRegistry,
    /// Regenerate the telemetry identifiers in storage.json
    ResetIds,
    /// Uninstall, clean the registry, then reset the identifiers
    All,
    /// Print the effective configuration as TOML
    ShowConfig,
    /// Write the default configuration to the config file
    InitConfig {
        /// Replace an existing config file
        #[arg(long)]
        force: bool,
    },
}

impl Command {
    fn task(&self) -> Option<Task> {
        match self {
            Command::Uninstall => Some(Task::Uninstall),
            Command::CleanRegistry => Some(Task::CleanRegistry),
            Command::ResetIds => Some(Task::ResetMachineId),
            Command::All => Some(Task::RunAll),
            Command::ShowConfig | Command::InitConfig { .. } => None,
        }
    }
}

fn run(args: Args) -> anyhow::Result<()> {
    log::info!(
        "Starting {} (CLI), version: {}",
        APP_NAME,
        env!("CARGO_PKG_VERSION")
    );
    if let Command::InitConfig { force } = args.command {
        return init_config(args.config, force);
    }
    let config = CleanerConfig::load_or_default(args.config).context("Unable to load config")?;
    let task = match args.command.task() {
        Some(task) => task,
        None => {
            print!("{}", toml::to_string_pretty(&config)?);
            return Ok(());
        }
    };
    if !args.skip_elevation_check && !is_elevated() {
        anyhow::bail!("Administrator rights are required, relaunch as administrator");
    }
    let mut tasks = Tasks::new(config);
    if let Some(storage) = args.storage {
        tasks = tasks.with_storage_file(storage);
    }
    let reports = tasks.run(task);
    for report in &reports {
        println!("{}", report);
    }
    if reports.iter().any(|r| r.status == StepStatus::Failure) {
        anyhow::bail!("One or more steps failed");
    }
    Ok(())
}

fn init_config(path: Option<PathBuf>, force: bool) -> anyhow::Result<()> {
    let path = match path {
        Some(p) => p,
        None => CleanerConfig::default_path()?,
    };
    if path.exists() && !force {
        anyhow::bail!(
            "Config file {} already exists, use --force to replace it",
            path.display()
        );
    }
    CleanerConfig::default().save(&path)?;
    println!("Wrote default config to {}", path.display());
    Ok(())
}

fn main() {
    let args: Args = Args::parse();

    // Setup logging
    if let Err(e) = install_logger(args.debug, false, false) {
        eprintln!("Unable to install logger: {:#}", e);
        std::process::exit(1);
    }
    // Run the application logic
    if let Err(e) = run(args) {
        log::error!("{:#}", e);
        std::process::exit(1);
    }
}
