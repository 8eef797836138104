//! Second-aligned redraw tick scheduling
//!
//! At most one tick is pending at any time. Each tick is armed as a
//! single shot aligned to the next whole second of wall-clock time, so
//! the displayed seconds digit stays locked to real second boundaries
//! instead of drifting with draw latency.

use embassy_time::Duration;

/// Update rate in milliseconds for interactive mode. The face updates
/// once a second since seconds are displayed in interactive mode.
pub const INTERACTIVE_UPDATE_RATE_MS: u64 = 1_000;

/// Bookkeeper for the single pending redraw tick.
///
/// The generation counter stands in for a weak reference from the timer
/// back to the engine: a tick that fires after a cancel or teardown
/// carries a stale generation and must be discarded by its holder.
#[derive(Debug)]
pub struct UpdateScheduler {
    rate_ms: u64,
    generation: u32,
    deadline_ms: Option<u64>,
}

impl UpdateScheduler {
    /// Create a scheduler with the given tick rate
    pub fn new(rate_ms: u64) -> Self {
        Self {
            rate_ms,
            generation: 0,
            deadline_ms: None,
        }
    }

    /// Cancel any pending tick, then, only when `run` holds, arm exactly
    /// one tick at the next rate boundary. Returns the armed delay.
    pub fn reschedule(&mut self, now_ms: u64, run: bool) -> Option<Duration> {
        self.cancel();
        if !run {
            return None;
        }
        let delay = self.rate_ms - now_ms % self.rate_ms;
        self.deadline_ms = Some(now_ms + delay);
        Some(Duration::from_millis(delay))
    }

    /// Drop the pending tick. A tick already in flight becomes stale and
    /// no-ops when it fires.
    pub fn cancel(&mut self) {
        self.generation = self.generation.wrapping_add(1);
        self.deadline_ms = None;
    }

    /// Deadline of the pending tick in epoch milliseconds
    pub fn deadline_ms(&self) -> Option<u64> {
        self.deadline_ms
    }

    /// Generation of the currently armed tick
    pub fn generation(&self) -> u32 {
        self.generation
    }

    /// Whether a tick armed at `generation` may still act
    pub fn is_current(&self, generation: u32) -> bool {
        self.deadline_ms.is_some() && generation == self.generation
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn delay_aligns_to_second_boundary() {
        let mut scheduler = UpdateScheduler::new(INTERACTIVE_UPDATE_RATE_MS);
        for now_ms in [0u64, 1, 499, 999, 1_000, 59_999, 1_464_443_109_123] {
            let delay = scheduler.reschedule(now_ms, true).unwrap().as_millis();
            assert!(delay > 0 && delay <= 1_000, "delay {delay} out of range");
            assert_eq!((now_ms + delay) % 1_000, 0, "not aligned from {now_ms}");
            assert_eq!(scheduler.deadline_ms(), Some(now_ms + delay));
        }
    }

    #[test]
    fn reschedule_is_idempotent() {
        let mut scheduler = UpdateScheduler::new(INTERACTIVE_UPDATE_RATE_MS);
        scheduler.reschedule(250, true);
        let first = scheduler.generation();
        scheduler.reschedule(250, true);
        // One pending tick, and the earlier one is stale.
        assert_eq!(scheduler.deadline_ms(), Some(1_000));
        assert!(!scheduler.is_current(first));
        assert!(scheduler.is_current(scheduler.generation()));
    }

    #[test]
    fn false_predicate_clears_pending_tick() {
        let mut scheduler = UpdateScheduler::new(INTERACTIVE_UPDATE_RATE_MS);
        scheduler.reschedule(250, true);
        assert!(scheduler.deadline_ms().is_some());
        assert_eq!(scheduler.reschedule(500, false), None);
        assert_eq!(scheduler.deadline_ms(), None);
    }

    #[test]
    fn cancel_invalidates_in_flight_ticks() {
        let mut scheduler = UpdateScheduler::new(INTERACTIVE_UPDATE_RATE_MS);
        scheduler.reschedule(250, true);
        let armed = scheduler.generation();
        assert!(scheduler.is_current(armed));
        scheduler.cancel();
        assert!(!scheduler.is_current(armed));
        assert_eq!(scheduler.deadline_ms(), None);
    }
}
