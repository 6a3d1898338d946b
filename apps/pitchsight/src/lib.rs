mod app;
pub mod headless;
pub mod logging;
mod tasks;
mod ui;

use crate::app::App;
use crossterm::event::{DisableMouseCapture, EnableMouseCapture};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

const TICK_INTERVAL: Duration = Duration::from_millis(33);

#[derive(Clone)]
pub struct TuiOpts {
    pub initial_config_path: Option<PathBuf>,
    pub log_store: Arc<parking_lot::Mutex<logging::LogStore>>,
}

pub fn run(opts: TuiOpts) -> Result<(), String> {
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_time()
        .build()
        .map_err(|err| format!("tokio runtime init failed: {err}"))?;
    runtime.block_on(run_async(opts))
}

async fn run_async(opts: TuiOpts) -> Result<(), String> {
    let mut terminal = setup_terminal()?;
    let result = run_loop(&mut terminal, opts).await;
    restore_terminal(terminal);
    result
}

fn setup_terminal() -> Result<Terminal<CrosstermBackend<io::Stdout>>, String> {
    enable_raw_mode().map_err(|err| format!("raw mode unavailable: {err}"))?;

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)
        .map_err(|err| format!("alternate screen unavailable: {err}"))?;

    let mut terminal = Terminal::new(CrosstermBackend::new(stdout))
        .map_err(|err| format!("terminal init failed: {err}"))?;
    terminal
        .clear()
        .map_err(|err| format!("terminal clear failed: {err}"))?;
    terminal
        .hide_cursor()
        .map_err(|err| format!("cursor hide failed: {err}"))?;
    Ok(terminal)
}

/// Best-effort teardown; a broken terminal state on exit is worse than a
/// swallowed error here.
fn restore_terminal(mut terminal: Terminal<CrosstermBackend<io::Stdout>>) {
    let _ = disable_raw_mode();
    let _ = execute!(io::stdout(), LeaveAlternateScreen, DisableMouseCapture);
    let _ = terminal.show_cursor();
}

async fn run_loop<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    opts: TuiOpts,
) -> Result<(), String> {
    let (event_tx, mut event_rx) = tokio::sync::mpsc::unbounded_channel();
    let mut app = App::new(
        opts.initial_config_path,
        opts.log_store,
        tasks::TaskRunner::new(event_tx.clone()),
    );
    app.spawn_input_reader(event_tx);

    let mut tick = tokio::time::interval(TICK_INTERVAL);

    loop {
        if app.dirty {
            terminal
                .draw(|frame| ui::draw(frame, &mut app))
                .map_err(|err| format!("terminal draw failed: {err}"))?;
            app.dirty = false;
        }

        tokio::select! {
            _ = tick.tick() => {
                app.on_tick();
            }
            maybe_event = event_rx.recv() => {
                let Some(event) = maybe_event else { return Ok(()); };
                if app.on_event(event)? { return Ok(()); }
            }
        }
    }
}
