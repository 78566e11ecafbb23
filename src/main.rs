// Only compile UI module when TUI feature is enabled
#[cfg(feature = "tui")]
mod ui;

use anyhow::{Context, Result};
use atm_simulator::{run_console, AtmConfig, Teller};
use clap::{Parser, Subcommand};
use std::fs::OpenOptions;
use std::io;
use std::path::PathBuf;
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "atm-simulator", version, about = "Single-account ATM simulator")]
struct Cli {
    /// JSON config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Opening balance (overrides config)
    #[arg(short, long)]
    balance: Option<f64>,

    /// Starting 4-digit PIN (overrides config; random when unset)
    #[arg(short, long)]
    pin: Option<String>,

    /// Write logs to this file (overrides config)
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Log filter, e.g. "debug" (overrides config; RUST_LOG wins over both)
    #[arg(long)]
    log_level: Option<String>,

    #[command(subcommand)]
    mode: Option<Mode>,
}

#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    /// Full-screen terminal UI (default)
    Tui,
    /// Line-oriented prompt on stdin/stdout
    Console,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let mode = cli.mode.unwrap_or(Mode::Tui);
    let config = resolve_config(&cli)?;

    init_logging(&config, mode)?;
    tracing::info!(?mode, initial_balance = config.initial_balance, "starting ATM simulator");

    let account = config.open_account()?;
    let mut teller = Teller::new(account);

    match mode {
        Mode::Tui => run_ui_mode(&mut teller)?,
        Mode::Console => {
            let stdin = io::stdin();
            run_console(&mut teller, stdin.lock(), io::stdout())?;
        }
    }

    tracing::info!("session ended");
    Ok(())
}

fn resolve_config(cli: &Cli) -> Result<AtmConfig> {
    let mut config = AtmConfig::load_or_default(cli.config.as_deref())?;

    if let Some(balance) = cli.balance {
        config.initial_balance = balance;
    }
    if let Some(pin) = &cli.pin {
        config.pin = Some(pin.clone());
    }
    if let Some(log_file) = &cli.log_file {
        config.log_file = Some(log_file.clone());
    }
    if let Some(log_level) = &cli.log_level {
        config.log_level = log_level.clone();
    }

    config.validate()?;
    Ok(config)
}

/// The TUI owns the terminal, so it only logs when a file is configured
fn init_logging(config: &AtmConfig, mode: Mode) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log_level))
        .context("Invalid log level")?;

    match (&config.log_file, mode) {
        (Some(path), _) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("Failed to open log file: {}", path.display()))?;

            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .init();
        }
        (None, Mode::Console) => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(io::stderr)
                .init();
        }
        (None, Mode::Tui) => {}
    }

    Ok(())
}

#[cfg(feature = "tui")]
fn run_ui_mode(teller: &mut Teller) -> Result<()> {
    let mut app = ui::App::new(teller);
    ui::run_ui(&mut app)
}

#[cfg(not(feature = "tui"))]
fn run_ui_mode(_teller: &mut Teller) -> Result<()> {
    eprintln!("❌ TUI mode not available!");
    eprintln!("   Rebuild with: cargo build --features tui");
    eprintln!("   Or use the line prompt: atm-simulator console");
    std::process::exit(1);
}
