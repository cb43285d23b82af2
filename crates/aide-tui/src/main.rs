use std::path::PathBuf;
use anyhow::Result;
use clap::{Parser, ValueEnum};
use colored::*;

mod app;
mod handler;
mod logging;
mod repl;
mod tui;
mod ui;

use aide_core::{sleep_until, Assistant, Config};
use app::App;
use tui::{EventHandler, TICK_RATE};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Mode {
    /// Full-screen terminal interface
    Tui,
    /// Line-oriented prompt on stdin/stdout
    Cli,
}

#[derive(Parser)]
#[command(name = "aide")]
#[command(version)]
#[command(about = "A small simulated desktop assistant for the terminal")]
struct Cli {
    /// Interface to run
    #[arg(short, long, value_enum, default_value = "tui")]
    mode: Mode,
    /// Config file to use instead of the default location
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// Seed for reproducible delays and replies
    #[arg(long)]
    seed: Option<u64>,
    /// Write the default config file and exit
    #[arg(long)]
    init_config: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.init_config {
        let config = Config::new();
        let path = match &cli.config {
            Some(path) => {
                config.save_to(path)?;
                path.clone()
            }
            None => config.save()?,
        };
        println!("{} {}", "Wrote default config to".green(), path.display());
        return Ok(());
    }

    let log_dir = logging::init()?;

    let config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    tracing::info!(mode = ?cli.mode, log_dir = %log_dir.display(), "starting");

    let mut assistant = Assistant::new(config);
    if let Some(seed) = cli.seed {
        assistant = assistant.with_seed(seed);
    }

    match cli.mode {
        Mode::Tui => run_tui(assistant).await,
        Mode::Cli => repl::run(assistant).await,
    }
}

async fn run_tui(assistant: Assistant) -> Result<()> {
    tui::install_panic_hook();
    let mut terminal = tui::init()?;

    let result = event_loop(&mut terminal, App::new(assistant)).await;

    tui::restore()?;
    result
}

async fn event_loop(terminal: &mut tui::Tui, mut app: App) -> Result<()> {
    let mut events = EventHandler::new(TICK_RATE);

    while !app.should_quit {
        terminal.draw(|frame| ui::render(&mut app, frame))?;

        tokio::select! {
            event = events.next() => match event {
                Some(event) => handler::handle_event(&mut app, event),
                None => break,
            },
            _ = sleep_until(app.assistant.next_deadline()) => {}
        }

        app.run_timers();
    }

    tracing::info!("tui session ended");
    Ok(())
}
