//! infosphere: browse a categorized message feed from the terminal.
//!
//! `main` wires everything together: load configuration, set up logging and
//! the terminal, start the fetch worker, and run the event loop.  See the
//! library docs for the module map.

use std::fs::File;
use std::io;
use std::path::Path;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::{Context, Result};
use crossterm::{
    event::{self, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use tracing::info;
use tracing_subscriber::EnvFilter;

use infosphere::app::App;
use infosphere::config::Config;
use infosphere::fetch::FetchWorker;
use infosphere::source::{ApiClient, FeedClient};
use infosphere::{input, ui};

// ---------------------------------------------------------------------------
// RAII terminal guard, restores the terminal even on panic
// ---------------------------------------------------------------------------

/// Manages terminal raw-mode and alternate-screen lifetime via [`Drop`].
///
/// Constructing this struct enters raw mode + alternate screen.  When the
/// value is dropped (normally or during stack unwinding) it restores the
/// terminal.
struct TerminalGuard {
    terminal: Terminal<CrosstermBackend<io::Stdout>>,
}

impl TerminalGuard {
    fn new() -> Result<Self> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let terminal = Terminal::new(backend)?;
        Ok(Self { terminal })
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(self.terminal.backend_mut(), LeaveAlternateScreen);
        let _ = self.terminal.show_cursor();
    }
}

/// Install a panic hook that restores the terminal before printing the
/// panic message.
fn install_panic_hook() {
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        original_hook(info);
    }));
}

/// Send `tracing` output to `path`.  Filter with `RUST_LOG`; defaults to
/// `infosphere=info`.
fn init_tracing(path: &Path) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("creating log file {}", path.display()))?;
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("infosphere=info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

fn main() -> Result<()> {
    let config = Config::load();
    if let Some(path) = config.log_file.as_deref() {
        init_tracing(path)?;
    }
    install_panic_hook();

    // -- feed client + fetch worker ------------------------------------------
    let client = ApiClient::new(&config.api_url, "Messages", config.timeout())
        .context("building HTTP client")?;
    info!(api = client.base_url(), mode = ?config.mode, "starting");
    let client: Arc<dyn FeedClient> = Arc::new(client);
    let source_name = client.name().to_string();
    let (mut worker, rx) = FetchWorker::spawn(client).context("starting fetch worker")?;

    // -- terminal setup (Drop restores on exit or panic) ---------------------
    let mut guard = TerminalGuard::new()?;
    let mut app = App::new(config.mode, config.page_size)
        .with_spec(config.initial_spec())
        .with_source_name(source_name);

    // -- main event loop -----------------------------------------------------
    // Runs at ~10 fps (100 ms tick).  Each iteration:
    //   1. Send a fetch if the query or page changed.
    //   2. Apply finished fetches (stale ones are dropped by the app).
    //   3. Render the UI.
    //   4. Poll for keyboard input (non-blocking, up to tick_rate).
    let tick_rate = Duration::from_millis(100);

    loop {
        if let Some(request) = app.take_fetch_request() {
            worker.submit(request);
        }

        while let Ok(msg) = rx.try_recv() {
            app.apply_fetch(msg);
        }

        guard.terminal.draw(|f| ui::draw(&mut app, f))?;

        if event::poll(tick_rate)? {
            if let Event::Key(key) = event::read()? {
                input::handle_key_event(&mut app, key);
            }
        }

        if app.quit {
            break;
        }
    }

    // `guard` is dropped here, restoring the terminal; `worker` is dropped
    // after it and abandons any request still in flight.
    Ok(())
}
