//! Stopwatch engine.
//!
//! A stopwatch never touches a clock. It is driven entirely by messages:
//! `StartStop` and `Reset` from the outside, and `Tick` messages it schedules
//! for itself one interval ahead. Each tick carries the stopwatch id, the
//! generation tag current when it was scheduled, and its place in the chain.
//! On delivery a tick only counts if all three still match and the stopwatch
//! is running, so an in-flight tick is cancelled by changing the tag instead
//! of by reaching into the timer facility, and a tick delivered twice counts
//! once. Stale ticks are dropped without rescheduling, which ends their chain.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

/// Fixed tick interval.
pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(1);

/// Reserved id that addresses every stopwatch. Never handed out.
pub const BROADCAST_ID: u64 = 0;

/// Hands out process-unique stopwatch ids.
///
/// Safe to share between threads; ids start at 1.
#[derive(Debug, Default)]
pub struct IdAllocator {
    last: AtomicU64,
}

impl IdAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    /// An allocator whose first id will be `last + 1`.
    pub fn starting_after(last: u64) -> Self {
        Self {
            last: AtomicU64::new(last),
        }
    }

    pub fn next_id(&self) -> u64 {
        self.last.fetch_add(1, Ordering::Relaxed) + 1
    }
}

/// Messages a stopwatch reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopwatchMsg {
    /// Set the running flag of stopwatch `id`.
    StartStop { id: u64, running: bool },
    /// One interval elapsed for stopwatch `id` in generation `tag`. `seq`
    /// is the tick's position in the chain.
    Tick { id: u64, tag: u64, seq: u64 },
    /// Stop and zero stopwatch `id`, invalidating its in-flight ticks.
    Reset { id: u64 },
}

/// A tick the caller must deliver back after `delay`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScheduledTick {
    pub delay: Duration,
    pub msg: StopwatchMsg,
}

/// A count-up timer advanced by tick messages.
#[derive(Debug, Clone)]
pub struct Stopwatch {
    label: String,
    id: u64,
    tag: u64,
    /// Sequence number of the tick currently armed
    seq: u64,
    running: bool,
    interval: Duration,
    elapsed: Duration,
}

impl Stopwatch {
    /// A stopped stopwatch at zero.
    pub fn new(label: impl Into<String>, ids: &IdAllocator) -> Self {
        Self {
            label: label.into(),
            id: ids.next_id(),
            tag: 0,
            seq: 0,
            running: false,
            interval: DEFAULT_INTERVAL,
            elapsed: Duration::ZERO,
        }
    }

    /// A stopwatch that is already running. Call [`Stopwatch::init`] to arm
    /// its first tick.
    pub fn new_running(label: impl Into<String>, ids: &IdAllocator) -> Self {
        let mut sw = Self::new(label, ids);
        sw.running = true;
        sw
    }

    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn tag(&self) -> u64 {
        self.tag
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn set_label(&mut self, label: impl Into<String>) {
        self.label = label.into();
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    /// First tick for a stopwatch created running.
    pub fn init(&self) -> Option<ScheduledTick> {
        self.running.then(|| self.tick())
    }

    pub fn start(&self) -> StopwatchMsg {
        StopwatchMsg::StartStop {
            id: self.id,
            running: true,
        }
    }

    pub fn stop(&self) -> StopwatchMsg {
        StopwatchMsg::StartStop {
            id: self.id,
            running: false,
        }
    }

    pub fn reset(&self) -> StopwatchMsg {
        StopwatchMsg::Reset { id: self.id }
    }

    fn tick(&self) -> ScheduledTick {
        ScheduledTick {
            delay: self.interval,
            msg: StopwatchMsg::Tick {
                id: self.id,
                tag: self.tag,
                seq: self.seq,
            },
        }
    }

    fn targets(&self, id: u64) -> bool {
        id == BROADCAST_ID || id == self.id
    }

    /// Apply a message. Returns the next tick to schedule, if any.
    ///
    /// The tag counts runs as well as resets: it is bumped on every reset and
    /// on every not-running to running transition.
    pub fn update(&mut self, msg: StopwatchMsg) -> Option<ScheduledTick> {
        match msg {
            StopwatchMsg::StartStop { id, running } => {
                if !self.targets(id) {
                    tracing::debug!(id, own = self.id, "start/stop for another stopwatch");
                    return None;
                }
                let was_running = self.running;
                self.running = running;
                if running && !was_running {
                    // New chain; anything still in flight from the last run is stale.
                    self.tag += 1;
                    return Some(self.tick());
                }
                None
            }
            StopwatchMsg::Reset { id } => {
                if self.targets(id) {
                    self.running = false;
                    self.elapsed = Duration::ZERO;
                    self.tag += 1;
                    tracing::debug!(id = self.id, tag = self.tag, "stopwatch reset");
                }
                None
            }
            StopwatchMsg::Tick { id, tag, seq } => {
                if !self.running || id != self.id || tag != self.tag || seq != self.seq {
                    tracing::debug!(id, tag, seq, own_tag = self.tag, "dropped stale tick");
                    return None;
                }
                self.elapsed += self.interval;
                self.seq += 1;
                Some(self.tick())
            }
        }
    }
}

/// Format a duration as `HH:MM:SS`.
pub fn format_elapsed(elapsed: Duration) -> String {
    let secs = elapsed.as_secs();
    format!("{:02}:{:02}:{:02}", secs / 3600, (secs / 60) % 60, secs % 60)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tick_msg(tick: Option<ScheduledTick>) -> StopwatchMsg {
        tick.expect("expected a scheduled tick").msg
    }

    #[test]
    fn test_ids_are_unique_and_start_at_one() {
        let ids = IdAllocator::new();
        let a = Stopwatch::new("a", &ids);
        let b = Stopwatch::new("b", &ids);
        assert_eq!(a.id(), 1);
        assert_eq!(b.id(), 2);
    }

    #[test]
    fn test_ids_unique_across_threads() {
        let ids = std::sync::Arc::new(IdAllocator::new());
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let ids = ids.clone();
                std::thread::spawn(move || (0..100).map(|_| ids.next_id()).collect::<Vec<_>>())
            })
            .collect();

        let mut all: Vec<u64> = handles
            .into_iter()
            .flat_map(|h| h.join().unwrap())
            .collect();
        all.sort_unstable();
        all.dedup();
        assert_eq!(all.len(), 400);
        assert!(!all.contains(&BROADCAST_ID));
    }

    #[test]
    fn test_starting_after_controls_ids() {
        let ids = IdAllocator::starting_after(41);
        assert_eq!(Stopwatch::new("x", &ids).id(), 42);
    }

    #[test]
    fn test_new_is_stopped_at_zero() {
        let sw = Stopwatch::new("focus", &IdAllocator::new());
        assert!(!sw.is_running());
        assert_eq!(sw.elapsed(), Duration::ZERO);
        assert_eq!(sw.tag(), 0);
        assert_eq!(sw.label(), "focus");
        assert!(sw.init().is_none());
    }

    #[test]
    fn test_new_running_arms_first_tick() {
        let sw = Stopwatch::new_running("focus", &IdAllocator::new());
        let tick = sw.init().unwrap();
        assert_eq!(tick.delay, DEFAULT_INTERVAL);
        assert_eq!(
            tick.msg,
            StopwatchMsg::Tick {
                id: sw.id(),
                tag: 0,
                seq: 0
            }
        );
    }

    #[test]
    fn test_start_then_ticks_advance_by_interval() {
        let mut sw = Stopwatch::new("focus", &IdAllocator::new());
        let mut next = tick_msg(sw.update(sw.start()));

        for n in 1..=3 {
            next = tick_msg(sw.update(next));
            assert_eq!(sw.elapsed(), DEFAULT_INTERVAL * n);
        }
    }

    #[test]
    fn test_start_for_other_id_is_ignored() {
        let ids = IdAllocator::new();
        let mut a = Stopwatch::new("a", &ids);
        let b = Stopwatch::new("b", &ids);

        assert!(a.update(b.start()).is_none());
        assert!(!a.is_running());
    }

    #[test]
    fn test_broadcast_start_applies() {
        let mut sw = Stopwatch::new("a", &IdAllocator::new());
        let tick = sw.update(StopwatchMsg::StartStop {
            id: BROADCAST_ID,
            running: true,
        });
        assert!(sw.is_running());
        assert!(tick.is_some());
    }

    #[test]
    fn test_start_while_running_arms_nothing() {
        let mut sw = Stopwatch::new("a", &IdAllocator::new());
        sw.update(sw.start()).unwrap();
        assert!(sw.update(sw.start()).is_none());
    }

    #[test]
    fn test_stop_ends_tick_chain() {
        let mut sw = Stopwatch::new("a", &IdAllocator::new());
        let pending = tick_msg(sw.update(sw.start()));

        assert!(sw.update(sw.stop()).is_none());
        assert!(sw.update(pending).is_none());
        assert_eq!(sw.elapsed(), Duration::ZERO);
    }

    #[test]
    fn test_reset_zeroes_and_bumps_tag() {
        let mut sw = Stopwatch::new("a", &IdAllocator::new());
        let pending = tick_msg(sw.update(sw.start()));
        sw.update(pending);
        let tag_before = sw.tag();

        assert!(sw.update(sw.reset()).is_none());

        assert!(!sw.is_running());
        assert_eq!(sw.elapsed(), Duration::ZERO);
        assert_eq!(sw.tag(), tag_before + 1);
    }

    #[test]
    fn test_stale_tick_after_reset_and_restart_is_dropped() {
        let mut sw = Stopwatch::new("a", &IdAllocator::new());
        let stale = tick_msg(sw.update(sw.start()));

        // Reset and restart before the pre-reset tick is delivered.
        sw.update(sw.reset());
        let fresh = tick_msg(sw.update(sw.start()));

        assert!(sw.update(stale).is_none());
        assert_eq!(sw.elapsed(), Duration::ZERO);

        sw.update(fresh).unwrap();
        assert_eq!(sw.elapsed(), DEFAULT_INTERVAL);
    }

    #[test]
    fn test_stale_tick_after_stop_and_restart_is_dropped() {
        let mut sw = Stopwatch::new("a", &IdAllocator::new());
        let stale = tick_msg(sw.update(sw.start()));
        sw.update(sw.stop());
        let fresh = tick_msg(sw.update(sw.start()));

        assert!(sw.update(stale).is_none());
        sw.update(fresh).unwrap();
        assert_eq!(sw.elapsed(), DEFAULT_INTERVAL);
    }

    #[test]
    fn test_duplicate_tick_counts_once() {
        let mut sw = Stopwatch::new("a", &IdAllocator::new());
        let first = tick_msg(sw.update(sw.start()));

        let next = tick_msg(sw.update(first));
        assert!(sw.update(first).is_none());
        assert_eq!(sw.elapsed(), DEFAULT_INTERVAL);

        // The chain carries on from the one accepted delivery.
        sw.update(next).unwrap();
        assert!(sw.update(next).is_none());
        assert_eq!(sw.elapsed(), DEFAULT_INTERVAL * 2);
    }

    #[test]
    fn test_tick_for_other_id_is_dropped() {
        let ids = IdAllocator::new();
        let mut a = Stopwatch::new("a", &ids);
        let b = Stopwatch::new_running("b", &ids);
        a.update(a.start());

        assert!(a.update(b.init().unwrap().msg).is_none());
        assert_eq!(a.elapsed(), Duration::ZERO);
    }

    #[test]
    fn test_elapsed_monotonic_over_mixed_sequence() {
        let mut sw =
            Stopwatch::new("a", &IdAllocator::new()).with_interval(Duration::from_millis(500));
        let mut last = Duration::ZERO;
        let mut pending: Vec<StopwatchMsg> = Vec::new();

        let script = ["start", "tick", "tick", "stop", "tick", "start", "tick", "tick", "tick"];
        for step in script {
            let was_running = sw.is_running();
            let before = sw.elapsed();
            let next = match step {
                "start" => sw.update(sw.start()),
                "stop" => sw.update(sw.stop()),
                _ => match pending.pop() {
                    Some(msg) => sw.update(msg),
                    None => None,
                },
            };
            if let Some(tick) = next {
                pending.push(tick.msg);
            }

            assert!(sw.elapsed() >= last);
            if sw.elapsed() != before {
                assert!(was_running);
                assert_eq!((sw.elapsed() - before).as_millis() % 500, 0);
            }
            last = sw.elapsed();
        }
        assert_eq!(sw.elapsed(), Duration::from_millis(2500));
    }

    #[test]
    fn test_format_elapsed() {
        assert_eq!(format_elapsed(Duration::ZERO), "00:00:00");
        assert_eq!(format_elapsed(Duration::from_secs(3725)), "01:02:05");
    }
}
