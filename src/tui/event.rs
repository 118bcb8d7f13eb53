//! Events, effects, and the timer facility of the event loop.
//!
//! Everything the state machine reacts to is an [`Event`]; everything it
//! asks the loop to do is a [`Command`]. The [`EventQueue`] owns immediate
//! events and delayed ones and hands them out strictly one at a time, which
//! is what keeps the rest of the TUI free of locking.

use std::cmp::{Ordering, Reverse};
use std::collections::{BinaryHeap, VecDeque};
use std::time::{Duration, Instant};

use crate::stopwatch::{ScheduledTick, StopwatchMsg};

use super::keymap::KeyPress;

/// Input to the interaction state machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// A key press from the terminal
    Key(KeyPress),
    /// Start/stop, tick, or reset addressed to a stopwatch
    Stopwatch(StopwatchMsg),
    /// The navigator's selection changed (None = nothing selected)
    TaskSelected(Option<i64>),
}

/// Effect requested by the state machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Deliver an event as soon as the current one is done
    Emit(Event),
    /// Deliver an event after a delay
    After(Duration, Event),
    /// Leave the event loop
    Quit,
}

impl From<ScheduledTick> for Command {
    fn from(tick: ScheduledTick) -> Self {
        Command::After(tick.delay, Event::Stopwatch(tick.msg))
    }
}

#[derive(Debug)]
struct Timer {
    due: Instant,
    seq: u64,
    event: Event,
}

impl PartialEq for Timer {
    fn eq(&self, other: &Self) -> bool {
        self.due == other.due && self.seq == other.seq
    }
}

impl Eq for Timer {}

impl PartialOrd for Timer {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Timer {
    fn cmp(&self, other: &Self) -> Ordering {
        (self.due, self.seq).cmp(&(other.due, other.seq))
    }
}

/// Single-consumer queue of immediate and delayed events.
///
/// Time is passed in by the caller, so tests can drive it with a virtual clock.
#[derive(Debug, Default)]
pub struct EventQueue {
    ready: VecDeque<Event>,
    timers: BinaryHeap<Reverse<Timer>>,
    seq: u64,
    quit: bool,
}

impl EventQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue an event for immediate delivery.
    pub fn push(&mut self, event: Event) {
        self.ready.push_back(event);
    }

    /// Queue an event for delivery once `due` has passed.
    pub fn schedule(&mut self, due: Instant, event: Event) {
        self.seq += 1;
        self.timers.push(Reverse(Timer {
            due,
            seq: self.seq,
            event,
        }));
    }

    /// Apply commands returned by the state machine.
    pub fn apply(&mut self, commands: impl IntoIterator<Item = Command>, now: Instant) {
        for command in commands {
            match command {
                Command::Emit(event) => self.push(event),
                Command::After(delay, event) => self.schedule(now + delay, event),
                Command::Quit => self.quit = true,
            }
        }
    }

    pub fn should_quit(&self) -> bool {
        self.quit
    }

    /// Next deliverable event: immediate events first, then timers that are due
    /// at `now`, earliest first.
    pub fn pop(&mut self, now: Instant) -> Option<Event> {
        if let Some(event) = self.ready.pop_front() {
            return Some(event);
        }
        match self.timers.peek() {
            Some(Reverse(timer)) if timer.due <= now => {
                self.timers.pop().map(|Reverse(timer)| timer.event)
            }
            _ => None,
        }
    }

    /// Deadline of the earliest pending timer.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.timers.peek().map(|Reverse(timer)| timer.due)
    }

    pub fn pending_timers(&self) -> usize {
        self.timers.len()
    }

    /// Hand every event deliverable at `now` to `handler`, one at a time,
    /// queueing whatever each returns. Stops early on quit.
    pub fn dispatch_due<F>(&mut self, now: Instant, mut handler: F)
    where
        F: FnMut(Event) -> Vec<Command>,
    {
        while !self.quit {
            let Some(event) = self.pop(now) else {
                break;
            };
            let commands = handler(event);
            self.apply(commands, now);
        }
    }
}
