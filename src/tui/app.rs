//! TUI application: terminal management and the event loop.
//!
//! The loop is single-threaded. Each iteration delivers every event that is
//! due, draws one frame, then blocks on the terminal until the next timer
//! deadline (at most [`MAX_POLL`]).

use std::io::{self, stdout};
use std::time::{Duration, Instant};

use crossterm::{
    ExecutableCommand,
    event::{self, Event as TermEvent, KeyEventKind},
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::prelude::*;

use crate::Result;
use crate::config::LoadedConfig;
use crate::stopwatch::IdAllocator;
use crate::storage::TaskStore;

use super::event::{Event, EventQueue};
use super::keymap::{KeyPress, Keymap};
use super::machine::Machine;
use super::notifications::StatusMessage;
use super::view;

/// Longest the loop waits for input before redrawing.
pub const MAX_POLL: Duration = Duration::from_millis(250);

/// How long to block on the terminal given the next timer deadline.
fn poll_timeout(next_deadline: Option<Instant>, now: Instant) -> Duration {
    next_deadline
        .map(|due| due.saturating_duration_since(now))
        .unwrap_or(MAX_POLL)
        .min(MAX_POLL)
}

/// Setup the terminal for TUI mode
fn setup_terminal() -> io::Result<Terminal<CrosstermBackend<io::Stdout>>> {
    enable_raw_mode()?;
    stdout().execute(EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout());
    Terminal::new(backend)
}

/// Restore the terminal to normal mode
fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) -> io::Result<()> {
    disable_raw_mode()?;
    stdout().execute(LeaveAlternateScreen)?;
    terminal.show_cursor()
}

/// Run the interactive timer until the user quits.
///
/// # Errors
/// Returns an error if the store cannot list tasks at startup or the
/// terminal cannot be driven. Store failures after startup only show up on
/// the status line.
pub fn run_tui<S: TaskStore>(store: S, loaded: &LoadedConfig) -> Result<()> {
    let keymap = Keymap::from_config(&loaded.config.keymap);
    let mut machine = Machine::new(store, keymap, IdAllocator::new())?;
    if let Some(notice) = loaded.notice() {
        machine = machine.with_status(StatusMessage::warning(notice));
    }

    let mut terminal = setup_terminal()?;
    tracing::info!("tui started");

    let result = run_event_loop(&mut terminal, &mut machine, loaded);
    let restored = restore_terminal(&mut terminal);
    tracing::info!("tui stopped");
    finish(result, restored)
}

/// Combine the loop outcome with terminal restoration. A loop error wins;
/// a restore failure behind it is only logged.
fn finish(result: Result<()>, restored: io::Result<()>) -> Result<()> {
    match (result, restored) {
        (Err(e), Err(restore)) => {
            tracing::error!("failed to restore terminal: {}", restore);
            Err(e)
        }
        (Ok(()), Err(restore)) => Err(restore.into()),
        (result, Ok(())) => result,
    }
}

fn run_event_loop<S: TaskStore>(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    machine: &mut Machine<S>,
    loaded: &LoadedConfig,
) -> Result<()> {
    let mut queue = EventQueue::new();

    loop {
        queue.dispatch_due(Instant::now(), |event| machine.update(event));
        if queue.should_quit() {
            return Ok(());
        }

        let snapshot = machine.snapshot();
        terminal.draw(|frame| view::render(frame, &snapshot, &loaded.config))?;

        let timeout = poll_timeout(queue.next_deadline(), Instant::now());
        if event::poll(timeout)? {
            if let TermEvent::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    queue.push(Event::Key(KeyPress::from(key)));
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;

    #[test]
    fn test_poll_timeout_without_timers() {
        assert_eq!(poll_timeout(None, Instant::now()), MAX_POLL);
    }

    #[test]
    fn test_poll_timeout_waits_for_next_tick() {
        let now = Instant::now();
        let due = now + Duration::from_millis(40);
        assert_eq!(poll_timeout(Some(due), now), Duration::from_millis(40));
    }

    #[test]
    fn test_poll_timeout_is_capped() {
        let now = Instant::now();
        let due = now + Duration::from_secs(5);
        assert_eq!(poll_timeout(Some(due), now), MAX_POLL);
    }

    #[test]
    fn test_poll_timeout_overdue_is_zero() {
        let now = Instant::now();
        let due = now - Duration::from_millis(5);
        assert_eq!(poll_timeout(Some(due), now), Duration::ZERO);
    }

    #[test]
    fn test_finish_prefers_loop_error() {
        let loop_err = Err(Error::Other("draw failed".to_string()));
        let restore_err = Err(io::Error::other("raw mode stuck"));
        match finish(loop_err, restore_err) {
            Err(Error::Other(msg)) => assert_eq!(msg, "draw failed"),
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn test_finish_reports_restore_failure_after_clean_exit() {
        let restore_err = Err(io::Error::other("raw mode stuck"));
        assert!(matches!(finish(Ok(()), restore_err), Err(Error::Io(_))));
        assert!(finish(Ok(()), Ok(())).is_ok());
    }
}
