//! Golden sundae scheduling: random wait, short on-screen lifetime, repeat.

use super::config::{SUNDAE_LIFETIME_MS, SUNDAE_MAX_WAIT_MS, SUNDAE_MIN_WAIT_MS};
use super::random::RandomSource;

/// What changed during a [`BonusScheduler::poll`].
#[derive(Clone, Debug, PartialEq)]
pub enum SchedulerEvent {
    /// A sundae is now claimable.
    Spawned,
    /// The sundae timed out unclaimed.
    Expired,
}

pub struct BonusScheduler {
    /// When the next sundae should appear. `None` while one is visible.
    next_spawn_at: Option<u64>,
    /// Despawn deadline of the visible sundae.
    visible_until: Option<u64>,
}

impl BonusScheduler {
    /// Start the first wait at `now_ms`.
    pub fn new(now_ms: u64, rng: &mut dyn RandomSource) -> Self {
        let mut scheduler = Self {
            next_spawn_at: None,
            visible_until: None,
        };
        scheduler.schedule_next(now_ms, rng);
        scheduler
    }

    pub fn is_visible(&self) -> bool {
        self.visible_until.is_some()
    }

    /// Milliseconds until the visible sundae disappears.
    pub fn remaining_ms(&self, now_ms: u64) -> Option<u64> {
        self.visible_until.map(|until| until.saturating_sub(now_ms))
    }

    #[cfg(test)]
    pub fn next_spawn_at(&self) -> Option<u64> {
        self.next_spawn_at
    }

    /// Uniform wait in `[SUNDAE_MIN_WAIT_MS, SUNDAE_MAX_WAIT_MS)`.
    pub fn random_wait(rng: &mut dyn RandomSource) -> u64 {
        let span = (SUNDAE_MAX_WAIT_MS - SUNDAE_MIN_WAIT_MS) as f64;
        let offset = (rng.next_f64() * span).floor() as u64;
        SUNDAE_MIN_WAIT_MS + offset.min(SUNDAE_MAX_WAIT_MS - SUNDAE_MIN_WAIT_MS - 1)
    }

    fn schedule_next(&mut self, now_ms: u64, rng: &mut dyn RandomSource) {
        self.next_spawn_at = Some(now_ms + Self::random_wait(rng));
    }

    /// Make a sundae claimable. If one is already visible this only reschedules.
    pub fn spawn(&mut self, now_ms: u64, rng: &mut dyn RandomSource) -> bool {
        if self.is_visible() {
            self.schedule_next(now_ms, rng);
            return false;
        }
        self.next_spawn_at = None;
        self.visible_until = Some(now_ms + SUNDAE_LIFETIME_MS);
        true
    }

    /// Advance timers. At most one event is reported per call.
    pub fn poll(&mut self, now_ms: u64, rng: &mut dyn RandomSource) -> Option<SchedulerEvent> {
        if let Some(until) = self.visible_until {
            if now_ms >= until {
                self.visible_until = None;
                self.schedule_next(now_ms, rng);
                return Some(SchedulerEvent::Expired);
            }
        }
        match self.next_spawn_at {
            Some(at) if now_ms >= at => {
                if self.spawn(now_ms, rng) {
                    Some(SchedulerEvent::Spawned)
                } else {
                    None
                }
            }
            _ => None,
        }
    }

    /// Consume the visible sundae. Returns false if there is none.
    /// The next wait starts immediately.
    pub fn claim(&mut self, now_ms: u64, rng: &mut dyn RandomSource) -> bool {
        if self.visible_until.take().is_none() {
            return false;
        }
        self.schedule_next(now_ms, rng);
        true
    }
}
