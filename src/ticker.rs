use std::time::Duration;

/// Focus countdown tick interval in milliseconds
pub const DEFAULT_TICK_MS: u64 = 1000;

/// Get tick duration
pub fn tick_duration() -> Duration {
    Duration::from_millis(DEFAULT_TICK_MS)
}

/// What a tick produced
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerEvent {
    /// Nothing to report (paused, idle, or still counting)
    Idle,
    /// Counted down one second
    Tick { remaining: u64 },
    /// Reached zero; the caller should end the focus session
    Finished,
}

/// Display-only countdown for a running focus session.
///
/// Pausing stops the countdown without touching application state; the
/// session stays current and can be resumed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FocusTimer {
    total: u64,
    remaining: u64,
    active: bool,
}

impl FocusTimer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn start(&mut self, minutes: u32) {
        self.total = u64::from(minutes) * 60;
        self.remaining = self.total;
        self.active = self.total > 0;
    }

    pub fn pause(&mut self) {
        self.active = false;
    }

    pub fn resume(&mut self) {
        if self.remaining > 0 {
            self.active = true;
        }
    }

    /// Force completion; returns `Finished` if there was anything to finish
    pub fn stop(&mut self) -> TimerEvent {
        let had_session = self.total > 0 && (self.active || self.remaining > 0);
        self.active = false;
        self.remaining = 0;
        self.total = 0;
        if had_session {
            TimerEvent::Finished
        } else {
            TimerEvent::Idle
        }
    }

    /// Advance by one second
    pub fn tick(&mut self) -> TimerEvent {
        if !self.active {
            return TimerEvent::Idle;
        }
        self.remaining = self.remaining.saturating_sub(1);
        if self.remaining == 0 {
            self.active = false;
            self.total = 0;
            return TimerEvent::Finished;
        }
        TimerEvent::Tick {
            remaining: self.remaining,
        }
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn remaining_secs(&self) -> u64 {
        self.remaining
    }

    /// Percent of the session elapsed
    pub fn progress(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        (self.total - self.remaining) as f64 / self.total as f64 * 100.0
    }

    /// Remaining time as "MM:SS"
    pub fn display(&self) -> String {
        format!("{:02}:{:02}", self.remaining / 60, self.remaining % 60)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tick_duration() {
        assert_eq!(tick_duration(), Duration::from_secs(1));
    }

    #[test]
    fn test_countdown_finishes_once() {
        let mut timer = FocusTimer::new();
        timer.start(1);
        assert_eq!(timer.display(), "01:00");

        for _ in 0..59 {
            assert!(matches!(timer.tick(), TimerEvent::Tick { .. }));
        }
        assert_eq!(timer.display(), "00:01");
        assert_eq!(timer.tick(), TimerEvent::Finished);
        assert_eq!(timer.tick(), TimerEvent::Idle);
        assert!(!timer.is_active());
    }

    #[test]
    fn test_pause_and_resume() {
        let mut timer = FocusTimer::new();
        timer.start(25);
        timer.tick();
        timer.pause();

        assert_eq!(timer.tick(), TimerEvent::Idle);
        assert_eq!(timer.remaining_secs(), 25 * 60 - 1);

        timer.resume();
        assert_eq!(
            timer.tick(),
            TimerEvent::Tick {
                remaining: 25 * 60 - 2
            }
        );
    }

    #[test]
    fn test_stop_forces_completion() {
        let mut timer = FocusTimer::new();
        assert_eq!(timer.stop(), TimerEvent::Idle);

        timer.start(15);
        timer.pause();
        assert_eq!(timer.stop(), TimerEvent::Finished);
        assert_eq!(timer.remaining_secs(), 0);
    }

    #[test]
    fn test_progress() {
        let mut timer = FocusTimer::new();
        assert_eq!(timer.progress(), 0.0);
        timer.start(1);
        for _ in 0..30 {
            timer.tick();
        }
        assert!((timer.progress() - 50.0).abs() < 1e-9);
    }
}
