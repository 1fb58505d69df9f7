use std::time::{Duration, Instant};

/// A periodic tick source driven by the caller's clock readings.
///
/// Nothing runs on its own: the game loop asks [`TickScheduler::poll`]
/// whether a tick is due and runs it to completion before asking again,
/// so two ticks can never overlap.
#[derive(Debug, Default)]
pub struct TickScheduler {
    interval: Duration,
    next_tick: Option<Instant>,
}

impl TickScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn start(&mut self, interval: Duration, now: Instant) {
        self.interval = interval;
        self.next_tick = Some(now + interval);
    }

    pub fn stop(&mut self) {
        self.next_tick = None;
    }

    /// Drops the current period and starts a new one at `interval`,
    /// counted from `now`.
    pub fn reschedule(&mut self, interval: Duration, now: Instant) {
        self.stop();
        self.start(interval, now);
    }

    /// Returns true when a tick is due and moves the deadline one interval on.
    /// A loop that fell behind gets one tick per poll, never a burst.
    pub fn poll(&mut self, now: Instant) -> bool {
        match self.next_tick {
            Some(deadline) if now >= deadline => {
                let next = deadline + self.interval;
                self.next_tick = Some(if next > now { next } else { now + self.interval });
                true
            }
            _ => false,
        }
    }

    /// How long the caller may wait for input before the next tick is due.
    pub fn time_until_next(&self, now: Instant) -> Option<Duration> {
        self.next_tick.map(|deadline| deadline.saturating_duration_since(now))
    }
}

pub fn interval_from_ms(ms: f64) -> Duration {
    Duration::from_micros((ms.max(1.0) * 1000.0).round() as u64)
}
