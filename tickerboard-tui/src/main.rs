//! Tickerboard TUI: single-screen closing-price dashboard.
//!
//! Layout:
//! - Controls: window length slider and price range handles
//! - Companies: multiselect over the fetched rows
//! - Closing prices: wide table of the selection
//! - Price chart: one line per selected company

mod app;
mod input;
mod theme;
mod ui;

#[cfg(test)]
mod test_helpers;

use std::fs::{self, File};
use std::io::{self, stdout};
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::event::{self, Event};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;

use tickerboard_core::data::{HistoryProvider, SyntheticProvider, YahooProvider};
use tickerboard_core::{Dashboard, DashboardConfig};

use crate::app::AppState;

#[derive(Parser, Debug)]
#[command(name = "tickerboard-tui", about = "Closing prices for a fixed set of companies")]
struct Args {
    /// Use deterministic synthetic prices instead of Yahoo Finance.
    #[arg(long)]
    offline: bool,

    /// Seed for the synthetic provider.
    #[arg(long, default_value_t = 42)]
    seed: u64,
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging();
    log::info!("starting with {args:?}");

    let provider: Box<dyn HistoryProvider> = if args.offline {
        let today = chrono::Local::now().date_naive();
        Box::new(SyntheticProvider::new(args.seed, today))
    } else {
        Box::new(YahooProvider::new().context("building HTTP client")?)
    };
    let mut app = AppState::new(Dashboard::new(DashboardConfig::default(), provider));

    // Install a panic hook that restores the terminal before printing the panic.
    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stderr(), LeaveAlternateScreen);
        default_hook(info);
    }));

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    let result = run_app(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

/// Log to a file under the user cache dir; stderr belongs to the terminal UI.
/// Logging stays off if the file cannot be created.
fn init_logging() {
    let dir = dirs::cache_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("tickerboard");
    let file = fs::create_dir_all(&dir).and_then(|_| File::create(dir.join("tickerboard.log")));
    let Ok(file) = file else {
        return;
    };

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Pipe(Box::new(file)))
        .init();
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut AppState,
) -> Result<()> {
    loop {
        // 1. Run a cycle if the input changed, showing a loading frame first.
        if app.dirty {
            app.set_status("Loading…");
            terminal.draw(|f| ui::draw(f, app))?;
            app.refresh();
        }

        // 2. Render
        terminal.draw(|f| ui::draw(f, app))?;

        // 3. Poll for input events
        if event::poll(Duration::from_millis(250))? {
            if let Event::Key(key) = event::read()? {
                input::handle_key(app, key);
            }
        }

        // 4. Check quit
        if !app.running {
            break;
        }
    }
    Ok(())
}
