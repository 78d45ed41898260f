//! Fixed-period drivers fed from the frame loop.
//!
//! `draw_web()` calls at ~60fps. These drivers turn the stream of frame
//! timestamps into "fire every N ms" events so game logic stays decoupled
//! from the frame rate and can be tested with plain numbers.

/// Fires at most once per period and reports the real time since the last fire.
///
/// Unlike an accumulator, elapsed time is never clamped: if the tab was
/// backgrounded for a minute, the next fire reports the whole minute.
pub struct TickDriver {
    period_ms: u64,
    last_fire: Option<u64>,
}

impl TickDriver {
    pub fn new(period_ms: u64) -> Self {
        Self {
            period_ms,
            last_fire: None,
        }
    }

    /// Feed a frame timestamp. Returns the elapsed seconds to simulate
    /// if at least one period has passed since the last fire.
    pub fn update(&mut self, now_ms: u64) -> Option<f64> {
        let prev = match self.last_fire {
            Some(prev) => prev,
            None => {
                // First frame only anchors the clock.
                self.last_fire = Some(now_ms);
                return None;
            }
        };
        if now_ms < prev {
            // Clock went backwards; re-anchor without simulating.
            self.last_fire = Some(now_ms);
            return None;
        }
        let delta = now_ms - prev;
        if delta < self.period_ms {
            return None;
        }
        self.last_fire = Some(now_ms);
        Some(delta as f64 / 1000.0)
    }

    /// Forget the anchor, e.g. after a reset.
    pub fn reset(&mut self, now_ms: u64) {
        self.last_fire = Some(now_ms);
    }
}

/// A repeating timer: `due()` returns true once per elapsed period.
pub struct IntervalTimer {
    period_ms: u64,
    next_due: u64,
}

impl IntervalTimer {
    pub fn new(period_ms: u64, now_ms: u64) -> Self {
        Self {
            period_ms,
            next_due: now_ms + period_ms,
        }
    }

    pub fn due(&mut self, now_ms: u64) -> bool {
        if now_ms < self.next_due {
            return false;
        }
        // Skip missed periods instead of firing a burst.
        self.next_due = now_ms + self.period_ms;
        true
    }

    /// Push the next fire a full period out (e.g. after a manual save).
    pub fn restart(&mut self, now_ms: u64) {
        self.next_due = now_ms + self.period_ms;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_frame_only_anchors() {
        let mut td = TickDriver::new(100);
        assert_eq!(td.update(5_000), None);
        assert_eq!(td.update(5_050), None);
    }

    #[test]
    fn fires_at_period() {
        let mut td = TickDriver::new(100);
        td.update(0);
        assert_eq!(td.update(99), None);
        assert_eq!(td.update(100), Some(0.1));
    }

    #[test]
    fn reports_measured_elapsed_not_period() {
        let mut td = TickDriver::new(100);
        td.update(0);
        assert_eq!(td.update(116), Some(0.116));
        // Next period measured from the last fire, not from a grid.
        assert_eq!(td.update(200), None);
        assert_eq!(td.update(216), Some(0.1));
    }

    #[test]
    fn long_gap_is_not_clamped() {
        let mut td = TickDriver::new(100);
        td.update(0);
        assert_eq!(td.update(60_000), Some(60.0));
    }

    #[test]
    fn clock_going_backwards_reanchors() {
        let mut td = TickDriver::new(100);
        td.update(1_000);
        assert_eq!(td.update(500), None);
        assert_eq!(td.update(600), Some(0.1));
    }

    #[test]
    fn steady_60fps_gives_about_ten_fires_per_second() {
        let mut td = TickDriver::new(100);
        td.update(0);
        let mut fires = 0;
        for i in 1..=60u64 {
            if td.update(i * 16_667 / 1_000).is_some() {
                fires += 1;
            }
        }
        assert!((8..=10).contains(&fires), "got {}", fires);
    }

    #[test]
    fn reset_reanchors() {
        let mut td = TickDriver::new(100);
        td.update(0);
        td.reset(1_000);
        assert_eq!(td.update(1_050), None);
        assert_eq!(td.update(1_100), Some(0.1));
    }

    #[test]
    fn interval_fires_once_per_period() {
        let mut t = IntervalTimer::new(30_000, 0);
        assert!(!t.due(29_999));
        assert!(t.due(30_000));
        assert!(!t.due(30_001));
        assert!(t.due(60_000));
    }

    #[test]
    fn interval_skips_missed_periods() {
        let mut t = IntervalTimer::new(30_000, 0);
        assert!(t.due(200_000));
        assert!(!t.due(200_001));
        assert!(t.due(230_000));
    }

    #[test]
    fn interval_restart_pushes_deadline() {
        let mut t = IntervalTimer::new(30_000, 0);
        t.restart(20_000);
        assert!(!t.due(30_000));
        assert!(t.due(50_000));
    }
}
