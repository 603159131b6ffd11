// Only compile UI module when TUI feature is enabled
#[cfg(feature = "tui")]
mod ui;

use anyhow::Result;
use clap::{Parser, Subcommand};
use split_bill::{logging, Config, SplitApp};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "split-bill", version, about = "Split bills with friends and track who owes whom")]
struct Cli {
    /// JSON config file (defaults to $SPLIT_BILL_CONFIG, then built-in defaults)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Interactive terminal UI (default)
    Ui,
    /// Print the starting friend list and balances
    List,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::load(cli.config.as_deref())?;

    match cli.command.unwrap_or(Command::Ui) {
        Command::List => run_list(&config),
        Command::Ui => run_ui_mode(&config),
    }
}

fn run_list(config: &Config) -> Result<()> {
    let app = SplitApp::from_config(config);

    println!("👥 Friends ({})", app.friends().len());
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    for friend in app.friends() {
        println!("  {:<20} {}", friend.name, friend.describe_balance(app.currency()));
    }

    Ok(())
}

#[cfg(feature = "tui")]
fn run_ui_mode(config: &Config) -> Result<()> {
    logging::init_for_tui(&config.log_filter, config.log_file.as_deref())?;

    let core = SplitApp::from_config(config);
    tracing::info!(friends = core.friends().len(), "starting terminal UI");

    let mut app = ui::App::new(core);
    ui::run_ui(&mut app)?;

    Ok(())
}

#[cfg(not(feature = "tui"))]
fn run_ui_mode(_config: &Config) -> Result<()> {
    eprintln!("❌ TUI mode not available!");
    eprintln!("   Rebuild with: cargo build --features tui");
    eprintln!("   Or use the HTTP API: cargo run --bin split-server --features server");
    std::process::exit(1);
}
