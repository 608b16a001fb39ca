//! Periodic plugin timers.
//!
//! Timers are polled: the event loop sleeps until [`TimerScheduler::next_deadline`]
//! and then asks for the owners that are [`due`](TimerScheduler::due).
//! Each timer belongs to one plugin and is cancelled when that plugin
//! unloads, so no tick ever reaches a destroyed plugin.

use std::time::{Duration, Instant};

use tracing::debug;

#[derive(Debug, Clone)]
struct Timer {
    owner: String,
    interval: Duration,
    next: Instant,
}

#[derive(Debug, Default)]
pub struct TimerScheduler {
    timers: Vec<Timer>,
}

const MIN_INTERVAL: Duration = Duration::from_millis(10);

impl TimerScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fire every `interval` for `owner`, first at `now + interval`.
    pub fn schedule(&mut self, owner: &str, interval: Duration, now: Instant) {
        let interval = interval.max(MIN_INTERVAL);
        self.timers.push(Timer {
            owner: owner.to_string(),
            interval,
            next: now + interval,
        });
        debug!(owner, ?interval, "timer scheduled");
    }

    /// Cancel all timers of `owner`. Returns how many were cancelled.
    pub fn cancel_owner(&mut self, owner: &str) -> usize {
        let before = self.timers.len();
        self.timers.retain(|t| t.owner != owner);
        before - self.timers.len()
    }

    pub fn len(&self) -> usize {
        self.timers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timers.is_empty()
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.timers.iter().map(|t| t.next).min()
    }

    /// Owners whose timers expired by `now`, in scheduling order. A timer
    /// that fell several periods behind fires once and skips ahead.
    pub fn due(&mut self, now: Instant) -> Vec<String> {
        let mut owners = Vec::new();
        for timer in &mut self.timers {
            if timer.next > now {
                continue;
            }
            while timer.next <= now {
                timer.next += timer.interval;
            }
            owners.push(timer.owner.clone());
        }
        owners
    }
}
