use clap::Parser;
use eyre::{Context, Result};
use log::info;
use std::fs;
use std::path::PathBuf;

mod cli;
mod commands;
mod config;
mod generation;
mod persona;
mod profile;
mod semantic;

use cli::{Cli, Commands};
use config::{Config, LogLevel};

fn setup_logging(log_level: &LogLevel) -> Result<()> {
    let log_dir = dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("clearlist")
        .join("logs");

    fs::create_dir_all(&log_dir).context("Failed to create log directory")?;

    let log_file = log_dir.join("clearlist.log");

    let target = Box::new(
        fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&log_file)
            .context("Failed to open log file")?,
    );

    // RUST_LOG env var takes precedence, otherwise use config log_level
    let mut builder = env_logger::Builder::new();

    if std::env::var("RUST_LOG").is_ok() {
        builder.parse_default_env();
    } else {
        builder.filter_level(match log_level {
            LogLevel::Trace => log::LevelFilter::Trace,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Off => log::LevelFilter::Off,
        });
    }

    builder.target(env_logger::Target::Pipe(target)).init();

    info!("Logging initialized, writing to: {}", log_file.display());
    info!(
        "Log level: {} (from {})",
        log_level.as_filter(),
        if std::env::var("RUST_LOG").is_ok() { "RUST_LOG env" } else { "config" }
    );
    Ok(())
}

fn run(cli: Cli, mut config: Config) -> Result<()> {
    let Cli {
        config: config_path,
        profiles,
        command,
    } = cli;

    if let Some(dir) = profiles {
        config.paths.profiles = dir;
    }

    match command {
        Commands::List { format } => commands::profile::list(cli::OutputFormat::resolve(format), &config),
        Commands::Show { id, format } => commands::profile::show(&id, cli::OutputFormat::resolve(format), &config),
        Commands::Search { query, format } => {
            commands::profile::search(&query, cli::OutputFormat::resolve(format), &config)
        }
        Commands::Classify { question, format } => {
            commands::prompt::classify(&question, cli::OutputFormat::resolve(format))
        }
        Commands::Prompt { id, question, scores } => commands::prompt::prompt(&id, &question, scores, &config),
        Commands::Ask { id, question } => commands::chat::ask(&id, &question, &config),
        Commands::Chat { id } => commands::chat::run(id.as_deref(), &config),
        Commands::Config { action } => commands::config::run(action, &config, config_path.as_ref()),
        Commands::Completions { shell } => commands::completions::run(shell),
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration (before logging, so log messages in Config::load are silent)
    let config = Config::load(cli.config.as_ref()).context("Failed to load configuration")?;

    setup_logging(&config.log_level).context("Failed to setup logging")?;

    info!("Starting clearlist with config from: {:?}", cli.config);

    run(cli, config).context("Command failed")?;

    Ok(())
}
