//! StratView TUI — four-panel terminal dashboard for backtest results.
//!
//! Panels:
//! 1. Chart — price with buy/sell markers, strategy returns, optional RSI
//! 2. Trades — metrics summary and paginated trade table
//! 3. Compare — strategies ranked by total return
//! 4. Help — keyboard shortcuts

mod app;
mod chart;
mod format;
mod input;
mod persistence;
mod theme;
mod ui;
mod worker;

use std::io::{self, stdout};
use std::path::PathBuf;
use std::sync::mpsc;
use std::time::Duration;

use anyhow::Result;
use crossterm::event::{self, Event};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;

use stratview_api::DashboardConfig;

use crate::app::{AppState, SelectionState};
use crate::worker::WorkerCommand;

fn main() -> Result<()> {
    // Install a panic hook that restores the terminal before printing the panic.
    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stderr(), LeaveAlternateScreen);
        default_hook(info);
    }));

    // Config and paths
    let config = DashboardConfig::load_or_default(std::path::Path::new("stratview.toml"));
    let state_path = dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("stratview")
        .join("state.json");

    // Load persisted state
    let persisted = persistence::load(&state_path);

    // Worker channels
    let (cmd_tx, cmd_rx) = mpsc::channel();
    let (resp_tx, resp_rx) = mpsc::channel();

    // Spawn worker
    let worker_handle = worker::spawn_worker(cmd_rx, resp_tx, config.backend_url.clone());

    // Build app state
    let selection = SelectionState::new(config.symbols, config.strategies);
    let mut app = AppState::new(selection, cmd_tx.clone(), resp_rx, state_path.clone());

    // Apply persisted state
    persistence::apply(&mut app, persisted);

    // Kick off the initial fetches for the restored selection
    app.request_series();
    app.request_trades();

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    // Run the main event loop
    let result = run_app(&mut terminal, &mut app);

    // Save state before exit
    let persisted = persistence::extract(&app);
    let _ = persistence::save(&state_path, &persisted);

    // Shutdown worker
    let _ = cmd_tx.send(WorkerCommand::Shutdown);
    let _ = worker_handle.join();

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
            app.apply_response(resp);
        }

        // 3. Poll for input events (50ms timeout for ~20 FPS tick)
        if event::poll(Duration::from_millis(50))? {
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
