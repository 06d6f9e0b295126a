//! Live terminal view for readtime.
//!
//! Shows the running timer, today's totals and history, and prompts for break
//! activities. Built with ratatui and crossterm.

mod app;
mod event;
mod ui;

pub use app::{App, BreakPrompt};

use std::io::{self, Write};
use std::time::Instant;

use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::prelude::*;
use tracing::{debug, info};

use crate::cli::commands::Context;
use crate::core::Clock;
use crate::error::ReadtimeError;
use crate::storage::KeyValueStore;

/// Run the live view until the user quits.
///
/// # Errors
///
/// Returns an error if the terminal cannot be set up or the tracker record
/// cannot be read or written.
pub fn run(ctx: &Context) -> Result<(), ReadtimeError> {
    let tracker = ctx.open_tracker()?;

    // Setup terminal
    enable_raw_mode()
        .map_err(|e| ReadtimeError::Terminal(format!("Failed to enable raw mode: {e}")))?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)
        .map_err(|e| ReadtimeError::Terminal(format!("Failed to setup terminal: {e}")))?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)
        .map_err(|e| ReadtimeError::Terminal(format!("Failed to create terminal: {e}")))?;

    info!("live view started");
    let mut app = App::new(
        tracker,
        &ctx.config.tracker,
        ctx.config.general.bell,
        Instant::now(),
    );
    let result = run_app(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode().ok();
    execute!(terminal.backend_mut(), LeaveAlternateScreen).ok();
    terminal.show_cursor().ok();
    info!("live view closed");

    result
}

/// Run the main application loop.
fn run_app<B, S, C>(terminal: &mut Terminal<B>, app: &mut App<S, C>) -> Result<(), ReadtimeError>
where
    B: Backend + Write,
    S: KeyValueStore,
    C: Clock,
{
    loop {
        // Each pass is woken by a key press or a due interval
        app.on_tick(Instant::now())?;

        terminal
            .draw(|frame| ui::render(frame, app))
            .map_err(|e| ReadtimeError::Terminal(format!("Failed to draw: {e}")))?;

        if app.take_bell() {
            ring_bell(terminal.backend_mut())?;
        }

        let timeout = app.poll_timeout(Instant::now());
        if let Some(action) = event::handle_events(app, timeout)? {
            debug!(?action, "key action");
            match action {
                event::Action::Quit => break,
                event::Action::Start => app.start()?,
                event::Action::Stop => app.stop()?,
                event::Action::Confirm => app.confirm_prompt()?,
                event::Action::Dismiss => app.dismiss_prompt(),
            }
        }
    }

    Ok(())
}

/// Write the terminal bell and flush it out.
fn ring_bell<W: Write>(out: &mut W) -> Result<(), ReadtimeError> {
    out.write_all(b"\x07")
        .and_then(|()| out.flush())
        .map_err(|e| ReadtimeError::Terminal(format!("Failed to ring bell: {e}")))
}
