//! Entry point for the interactive menu application
use anyhow::Context;
use clap::Parser;
use kiro_cleaner::common::{install_logger, APP_NAME};
use kiro_cleaner::config::CleanerConfig;
use kiro_cleaner::elevation::is_elevated;
use kiro_cleaner::menu::run_menu;
use kiro_cleaner::tasks::Tasks;
use std::io::{self, BufRead};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,
    /// Override the config file path
    #[arg(long)]
    config: Option<PathBuf>,
}

fn run(args: Args) -> anyhow::Result<()> {
    log::info!(
        "Starting {}, version: {}",
        APP_NAME,
        env!("CARGO_PKG_VERSION")
    );
    let config = CleanerConfig::load_or_default(args.config).context("Unable to load config")?;
    console::Term::stdout().set_title(format!("{} Cleaner", config.app_name));
    let mut tasks = Tasks::new(config);
    let stdin = io::stdin();
    run_menu(&mut stdin.lock(), &mut io::stdout(), &mut tasks).context("Console error")?;
    Ok(())
}

fn main() {
    let args: Args = Args::parse();

    if !is_elevated() {
        println!("This tool must be run as administrator.");
        println!("Close it and relaunch it with 'Run as administrator'.");
        io::stdin().lock().read_line(&mut String::new()).ok();
        std::process::exit(1);
    }

    // Setup logging
    if let Err(e) = install_logger(args.debug, true, true) {
        eprintln!("Unable to install logger: {:#}", e);
        std::process::exit(1);
    }
    // Run the application logic
    if let Err(e) = run(args) {
        log::error!("{:#}", e);
        eprintln!("{:#}", e);
        std::process::exit(1);
    }
}
