mod clock;
mod config;
mod deadlines;
mod models;
mod section;
mod storage;
mod tui;
mod zones;

use anyhow::{Context, Result};
use chrono::Utc;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture, Event, KeyEvent, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use std::time::{Duration, Instant};
use tracing_subscriber::EnvFilter;

use config::Config;
use deadlines::DeadlineStore;
use storage::FileStorage;
use tui::App;

/// Upper bound on how long the loop waits for input before redrawing.
const POLL_INTERVAL: Duration = Duration::from_millis(100);

fn main() -> Result<()> {
    let args: Vec<String> = std::env::args().collect();
    if args.iter().any(|a| a == "--init") {
        let path = Config::generate_default()?;
        println!("Generated config file at: {}", path.display());
        return Ok(());
    }

    if args.iter().any(|a| a == "--help" || a == "-h") {
        println!("clockboard — world clocks and a deadline tracker for the terminal");
        println!();
        println!("USAGE:");
        println!("  clockboard           Start the dashboard");
        println!("  clockboard --init    Generate a default config file");
        println!();
        println!("CONFIG:");
        println!("  File: ~/.config/clockboard/config.toml");
        println!("  Env:  CLOCKBOARD_STORAGE (storage file), CLOCKBOARD_LOG (log filter)");
        println!();
        println!("KEYBINDINGS:");
        println!("  c / t             Toggle clocks / deadline tracker");
        println!("  a                 Add a deadline (Tab switches field, Enter saves)");
        println!("  d / Delete        Remove the selected deadline");
        println!("  j / k / Up / Down Navigate deadlines");
        println!("  r                 Re-sort by date");
        println!("  mouse drag        Reorder the visible list");
        println!("  q / Ctrl+C        Quit");
        return Ok(());
    }

    let config = Config::load()?;
    init_logging(&config)?;

    let storage = match &config.storage_path {
        Some(path) => FileStorage::new(path),
        None => FileStorage::open_default()
            .with_context(|| "Set storage_path in config.toml or CLOCKBOARD_STORAGE")?,
    };
    tracing::info!(path = %storage.path().display(), "opening deadline storage");
    let store = DeadlineStore::load(storage);

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(&mut terminal, App::new(store, Utc::now()), config.tick());

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(e) = result {
        tracing::error!(error = %e, "exited with error");
        eprintln!("Error: {e:#}");
    }

    Ok(())
}

fn init_logging(config: &Config) -> Result<()> {
    let Some(path) = Config::log_path() else {
        return Ok(());
    };
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create log directory {}", parent.display()))?;
    }
    let file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("Failed to open log file {}", path.display()))?;

    let filter = EnvFilter::try_new(&config.log_level).unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::sync::Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    mut app: App<FileStorage>,
    tick: Duration,
) -> Result<()> {
    let mut last_tick = Instant::now();

    loop {
        terminal.draw(|f| tui::ui::render(f, &mut app))?;

        let timeout = tick.saturating_sub(last_tick.elapsed()).min(POLL_INTERVAL);
        match tui::event::poll_event(timeout)? {
            Some(Event::Key(KeyEvent {
                code,
                modifiers,
                kind: KeyEventKind::Press,
                ..
            })) => tui::event::handle_key(&mut app, code, modifiers, Utc::now()),
            Some(Event::Mouse(mouse)) => tui::event::handle_mouse(&mut app, mouse, Utc::now()),
            _ => {}
        }

        if !app.running {
            break;
        }

        // No drift correction: the next tick is measured from this one.
        if last_tick.elapsed() >= tick {
            app.tick(Utc::now());
            last_tick = Instant::now();
        }
    }

    Ok(())
}
