//! Interactive dashboard.
//!
//! The clock ticker lives on a small tokio runtime owned by [`run`]; the
//! UI loop itself is synchronous and drains clock readings between key
//! polls. Both the ticker and the terminal are released on every exit path.

mod app;
mod pie;
mod view;

use std::error::Error;
use std::io::{self, Stdout};

use crossterm::event::{self, Event as CEvent, KeyEventKind};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use power1440_core::{ClockReading, ClockTicker, Config, DayPlanner, SystemClock};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;

use app::App;

type Tty = Terminal<CrosstermBackend<Stdout>>;

/// Raw mode + alternate screen for as long as the guard lives.
struct TerminalGuard {
    terminal: Tty,
}

impl TerminalGuard {
    fn enter() -> Result<Self, Box<dyn Error>> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        if let Err(e) = execute!(stdout, EnterAlternateScreen) {
            let _ = disable_raw_mode();
            return Err(e.into());
        }
        let terminal = Terminal::new(CrosstermBackend::new(stdout))?;
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

pub fn run() -> Result<(), Box<dyn Error>> {
    let config = Config::load_or_default();
    let planner = DayPlanner::with_allocation(config.initial_allocation_or_default());
    let mut app = App::new(planner, config.ui.show_legend);
    app.apply_clock(ClockReading::from_source(&SystemClock));

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(1)
        .thread_name("power1440-clock")
        .enable_time()
        .build()?;
    // Declared after the runtime so it is dropped (and aborted) first.
    let mut ticker = ClockTicker::spawn_on(runtime.handle(), SystemClock, config.tick_interval());

    tracing::info!("dashboard started");
    let result = {
        let mut guard = TerminalGuard::enter()?;
        run_event_loop(&mut guard.terminal, &mut app, &mut ticker, &config)
    };
    ticker.shutdown();
    tracing::info!(tasks = app.planner.tasks().len(), "dashboard closed");

    result
}

fn run_event_loop(
    terminal: &mut Tty,
    app: &mut App,
    ticker: &mut ClockTicker,
    config: &Config,
) -> Result<(), Box<dyn Error>> {
    let poll = config.poll_interval();

    while !app.should_quit {
        if let Some(reading) = ticker.try_latest() {
            app.apply_clock(reading);
        }
        terminal.draw(|frame| view::draw_dashboard(frame, app))?;

        if event::poll(poll)? {
            if let CEvent::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    app.handle_key(key);
                }
            }
        }
    }

    Ok(())
}
