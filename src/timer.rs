// src/timer.rs
use std::time::{Duration, Instant};

/// Repeating redraw timer polled from the UI thread.
///
/// The first poll after `start` fires immediately; after that it fires at
/// most once per interval. Missed deadlines are not replayed.
#[derive(Debug)]
pub struct RedrawTimer {
    interval: Duration,
    next_due: Option<Instant>,
}

impl RedrawTimer {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval: interval.max(Duration::from_millis(1)),
            next_due: None,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn start(&mut self, now: Instant) {
        self.next_due = Some(now);
    }

    pub fn stop(&mut self) {
        if self.next_due.take().is_some() {
            log::debug!("redraw timer stopped");
        }
    }

    pub fn is_running(&self) -> bool {
        self.next_due.is_some()
    }

    /// Returns true when a tick is due at `now` and schedules the next one.
    pub fn poll(&mut self, now: Instant) -> bool {
        let Some(due) = self.next_due else {
            return false;
        };
        if now < due {
            return false;
        }
        let mut next = due + self.interval;
        if next <= now {
            next = now + self.interval;
        }
        self.next_due = Some(next);
        true
    }

    /// Time left until the next tick, or `None` when stopped.
    pub fn until_due(&self, now: Instant) -> Option<Duration> {
        self.next_due.map(|due| due.saturating_duration_since(now))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MS: Duration = Duration::from_millis(1);

    #[test]
    fn fires_once_per_interval() {
        let t0 = Instant::now();
        let mut timer = RedrawTimer::new(10 * MS);
        assert!(!timer.poll(t0));
        timer.start(t0);
        assert!(timer.poll(t0));
        assert!(!timer.poll(t0 + 5 * MS));
        assert!(timer.poll(t0 + 10 * MS));
        assert!(!timer.poll(t0 + 12 * MS));
        assert!(timer.poll(t0 + 20 * MS));
    }

    #[test]
    fn late_poll_does_not_burst() {
        let t0 = Instant::now();
        let mut timer = RedrawTimer::new(10 * MS);
        timer.start(t0);
        assert!(timer.poll(t0));
        assert!(timer.poll(t0 + 55 * MS));
        assert!(!timer.poll(t0 + 56 * MS));
        assert_eq!(timer.until_due(t0 + 56 * MS), Some(9 * MS));
    }

    #[test]
    fn stop_is_idempotent() {
        let t0 = Instant::now();
        let mut timer = RedrawTimer::new(Duration::ZERO);
        assert_eq!(timer.interval(), MS);
        timer.stop();
        timer.start(t0);
        assert!(timer.is_running());
        timer.stop();
        timer.stop();
        assert!(!timer.is_running());
        assert!(!timer.poll(t0 + 100 * MS));
        assert_eq!(timer.until_due(t0), None);
    }
}
