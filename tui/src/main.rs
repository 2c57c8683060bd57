//! Flightboard TUI Entry Point
//!
//! Usage:
//!   flightboard [CONFIG]
//!
//! CONFIG is a TOML or JSON board configuration; without it
//! `~/.config/flightboard/board.toml` is used when present.
//! `FLIGHTBOARD_SPEED`, `FLIGHTBOARD_PAUSE`, `FLIGHTBOARD_SELECTION` and
//! `FLIGHTBOARD_REPEAT` override file values. Logs go to stderr and are
//! filtered with `RUST_LOG`.

use std::io::{self, IsTerminal};
use std::panic;
use std::path::PathBuf;

use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use flightboard_core::config::{load_config, load_config_from_path};
use flightboard_tui::App;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Logs to stderr so they never tear the board
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(io::stderr),
        )
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let loaded = match std::env::args().nth(1) {
        Some(path) => load_config_from_path(Some(PathBuf::from(path)))?,
        None => load_config()?,
    };

    if !io::stdin().is_terminal() || !io::stdout().is_terminal() {
        eprintln!("Error: flightboard requires a terminal (TTY)");
        eprintln!();
        eprintln!("This usually means:");
        eprintln!("  - Running in a non-interactive environment (CI, container)");
        eprintln!("  - SSH without -t flag");
        eprintln!("  - Piped stdin/stdout");
        std::process::exit(1);
    }

    // Set up panic hook to restore terminal
    let original_hook = panic::take_hook();
    panic::set_hook(Box::new(move |panic_info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        original_hook(panic_info);
    }));

    let size = crossterm::terminal::size()?;
    let mut app = App::new(loaded, size)?;

    // Initialize terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    let result = app.run(&mut terminal).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}
