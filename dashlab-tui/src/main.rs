//! DashLab TUI: the quotes and tips dashboards in a terminal.
//!
//! Screens:
//! 1. Quotes: ticker window, recent rows, Close price chart
//! 2. Tips: dataset preview and the four tips charts

mod app;
mod input;
mod panels;
mod theme;
mod ui;
mod worker;

use std::fs::{self, File};
use std::io::{self, stdout};
use std::path::PathBuf;
use std::sync::mpsc;
use std::sync::Mutex;
use std::time::Duration;

use anyhow::{Context, Result};
use chrono::Local;
use clap::Parser;
use crossterm::event::{self, Event};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use dashlab_core::config::DashConfig;
use dashlab_core::session::Session;

use crate::app::{AppState, QuotesState, TipsState};
use crate::worker::WorkerCommand;

#[derive(Parser)]
#[command(name = "dashlab-tui", about = "Terminal dashboards for stock quotes and restaurant tips")]
struct Args {
    /// Path to a TOML config file. Defaults to ./dashlab.toml when present.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Ticker to open with. Defaults to the configured ticker.
    #[arg(long)]
    ticker: Option<String>,

    /// Tips CSV to use instead of the remote demo dataset.
    #[arg(long)]
    tips_file: Option<PathBuf>,
}

fn main() -> Result<()> {
    let args = Args::parse();
    let config = DashConfig::load(args.config.as_deref()).context("load configuration")?;
    init_logging();

    let upload = match &args.tips_file {
        Some(path) => {
            Some(fs::read(path).with_context(|| format!("read {}", path.display()))?)
        }
        None => None,
    };

    let today = Local::now().date_naive();
    let ticker = args
        .ticker
        .unwrap_or_else(|| config.quotes.default_ticker.clone());
    let preview_rows = config.tips.preview_rows;

    let session = Session::from_config(config)?;
    let (start, end) = session.quote_window(today);

    // Install a panic hook that restores the terminal before printing the panic.
    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stderr(), LeaveAlternateScreen);
        default_hook(info);
    }));

    // Worker channels
    let (cmd_tx, cmd_rx) = mpsc::channel();
    let (resp_tx, resp_rx) = mpsc::channel();
    let worker_handle = worker::spawn_worker(session, cmd_rx, resp_tx)?;

    let mut app = AppState::new(
        cmd_tx.clone(),
        resp_rx,
        QuotesState {
            ticker,
            start,
            end,
            loading: false,
            report: None,
        },
        TipsState {
            upload,
            preview_rows,
            chart_index: 0,
            loading: false,
            report: None,
        },
    );
    app.request_tips();
    app.request_quotes();

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    let result = run_app(&mut terminal, &mut app);

    // Shutdown worker
    let _ = cmd_tx.send(WorkerCommand::Shutdown);
    if worker_handle.join().is_err() {
        warn!("worker thread panicked");
    }

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut AppState,
) -> Result<()> {
    loop {
        // 1. Render
        terminal.draw(|f| ui::draw(f, app))?;

        // 2. Drain worker responses (non-blocking)
        while let Ok(resp) = app.worker_rx.try_recv() {
            app.apply(resp);
        }

        // 3. Poll for input events (50ms timeout for ~20 FPS tick)
        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                input::handle_key(app, key);
            }
        }

        if !app.running {
            break;
        }
    }
    Ok(())
}

/// Log to `<cache dir>/dashlab/dashlab-tui.log`; the terminal belongs to the UI.
/// Logging is skipped when the file cannot be created.
fn init_logging() {
    let dir = dirs::cache_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("dashlab");
    if fs::create_dir_all(&dir).is_err() {
        return;
    }
    let Ok(file) = File::create(dir.join("dashlab-tui.log")) else {
        return;
    };

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("dashlab_core=info,dashlab_tui=info"));
    let installed = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .try_init()
        .is_ok();
    if installed {
        info!(log_dir = %dir.display(), "dashlab-tui starting");
    }
}
