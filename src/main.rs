//! LingoLink - Arabic/English vocabulary matching in the terminal
//!
//! Match each Arabic word to its English translation. Play against the
//! clock, practise a category, or just relax in Zen mode.

mod app;
mod config;
mod error;
mod game;
mod stats;
mod storage;
mod tui;
mod words;

use app::{AppCoordinator, Phase, Session};
use config::{Config, DEFAULT_LOG_FILTER, LOG_FILE_NAME};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use error::Error;
use game::pool::Column;
use stats::GlobalStats;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Mutex;
use std::time::{Duration, Instant};
use storage::Storage;
use tracing_subscriber::{prelude::*, EnvFilter};
use tui::Tui;
use words::Catalog;

/// How often the screen is redrawn and time is fed to the session
const FRAME_RATE: Duration = Duration::from_millis(50);

fn main() -> ExitCode {
    match try_main() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("lingolink: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn try_main() -> Result<(), Error> {
    let config = Config::from_env();
    let data_dir = config.data_dir.clone().or_else(|| Storage::data_dir().ok());

    if let Some(dir) = &data_dir {
        init_logging(dir, &config.log_filter);
    }
    tracing::info!(?config, "starting");

    let catalog = match &config.word_bank {
        Some(path) => Catalog::load(path).inspect_err(|e| {
            tracing::error!(path = %path.display(), "cannot load word bank: {}", e);
        })?,
        None => Catalog::builtin().clone(),
    };
    tracing::info!(
        categories = catalog.categories().len(),
        words = catalog.word_count(),
        "word bank ready"
    );

    let stats = GlobalStats::load(storage::open_or_memory(data_dir.as_deref()));
    let mut app = AppCoordinator::new(Session::new(catalog, stats));

    // Initialize terminal
    let mut terminal = Tui::new()?;
    terminal.enter()?;
    let result = run(&mut terminal, &mut app);
    terminal.exit()?;

    tracing::info!("exiting");
    result
}

/// Main event loop
fn run(terminal: &mut Tui, app: &mut AppCoordinator) -> Result<(), Error> {
    let mut last_frame = Instant::now();

    loop {
        // Render
        terminal.draw(|frame| tui::render(frame, app))?;

        // Calculate timeout for next frame
        let timeout = FRAME_RATE
            .checked_sub(last_frame.elapsed())
            .unwrap_or(Duration::ZERO);

        // Poll for events with timeout
        if event::poll(timeout)? {
            if let Event::Key(key) = event::read()? {
                // Only handle key press events (not release)
                if key.kind == KeyEventKind::Press {
                    handle_key(app, key);
                }
            }
        }

        // Feed elapsed time to timers and pending feedback
        let elapsed = last_frame.elapsed();
        if elapsed >= FRAME_RATE {
            app.tick(elapsed);
            last_frame = Instant::now();
        }

        // Check for quit
        if app.should_quit {
            break;
        }
    }

    Ok(())
}

/// Map a key press to an action for the current phase
fn handle_key(app: &mut AppCoordinator, key: KeyEvent) {
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        app.quit();
        return;
    }

    match app.phase() {
        Phase::Menu => match key.code {
            KeyCode::Up => app.menu_up(),
            KeyCode::Down => app.menu_down(),
            KeyCode::Enter => app.menu_select(),
            KeyCode::Esc | KeyCode::Char('q') => app.quit(),
            _ => {}
        },
        Phase::CategorySelection => match key.code {
            KeyCode::Up => app.category_up(),
            KeyCode::Down => app.category_down(),
            KeyCode::Enter => app.category_select(),
            KeyCode::Esc => app.back(),
            _ => {}
        },
        Phase::Playing => match key.code {
            KeyCode::Up => app.cursor_up(),
            KeyCode::Down => app.cursor_down(),
            KeyCode::Tab | KeyCode::BackTab => app.switch_column(),
            KeyCode::Left => app.focus_column(Column::Source),
            KeyCode::Right => app.focus_column(Column::Target),
            KeyCode::Enter | KeyCode::Char(' ') => app.select_focused(),
            KeyCode::Esc => app.back(),
            _ => {}
        },
        Phase::LevelUp => {
            if matches!(key.code, KeyCode::Enter | KeyCode::Char(' ')) {
                app.confirm();
            }
        }
        Phase::GameOver(_) => {
            if matches!(key.code, KeyCode::Enter | KeyCode::Esc) {
                app.confirm();
            }
        }
        Phase::ConfirmExit => match key.code {
            KeyCode::Enter | KeyCode::Char('y') => app.confirm(),
            KeyCode::Esc | KeyCode::Char('n') => app.cancel(),
            _ => {}
        },
    }
}

/// Log to a file in the data directory. The terminal belongs to the UI.
fn init_logging(dir: &Path, filter: &str) {
    if let Err(e) = std::fs::create_dir_all(dir) {
        eprintln!("lingolink: logging disabled, cannot create {}: {}", dir.display(), e);
        return;
    }

    let path: PathBuf = dir.join(LOG_FILE_NAME);
    let file = match std::fs::OpenOptions::new().create(true).append(true).open(&path) {
        Ok(file) => file,
        Err(e) => {
            eprintln!("lingolink: logging disabled, cannot open {}: {}", path.display(), e);
            return;
        }
    };

    let filter = EnvFilter::try_new(filter).unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_ansi(false)
        .with_writer(Mutex::new(file));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .init();
}
