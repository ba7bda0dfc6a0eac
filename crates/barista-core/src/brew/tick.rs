//! Tick sources that turn wall-clock time into engine ticks.
//!
//! The engine only understands "one more second". [`WallClockTicker`] keeps
//! an anchor timestamp and, when polled, replays however many whole seconds
//! have passed since, carrying the sub-second remainder forward. It is plain
//! data so a front end can persist it next to the engine between runs.

use serde::{Deserialize, Serialize};

use super::engine::{BrewState, BrewTimerEngine};
use crate::events::Event;

/// Millisecond wall clock.
pub trait Clock {
    fn now_ms(&self) -> u64;
}

/// The real system clock.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_ms(&self) -> u64 {
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap_or_default()
            .as_millis() as u64
    }
}

/// A clock that only moves when told to.
#[derive(Debug, Default)]
pub struct FixedClock {
    now: std::cell::Cell<u64>,
}

impl FixedClock {
    pub fn at(ms: u64) -> Self {
        Self {
            now: std::cell::Cell::new(ms),
        }
    }

    pub fn advance_ms(&self, ms: u64) {
        self.now.set(self.now.get().saturating_add(ms));
    }

    pub fn advance_secs(&self, secs: u64) {
        self.advance_ms(secs.saturating_mul(1000));
    }
}

impl Clock for FixedClock {
    fn now_ms(&self) -> u64 {
        self.now.get()
    }
}

/// Converts elapsed wall-clock time into whole-second ticks.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct WallClockTicker {
    /// Wall-clock time the next second is counted from, while armed.
    #[serde(default)]
    anchor_ms: Option<u64>,
}

impl WallClockTicker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_armed(&self) -> bool {
        self.anchor_ms.is_some()
    }

    pub fn arm(&mut self, now_ms: u64) {
        self.anchor_ms = Some(now_ms);
    }

    pub fn disarm(&mut self) {
        self.anchor_ms = None;
    }

    /// Whole seconds since the anchor. The anchor moves forward by exactly
    /// that many seconds so the remainder counts toward the next poll.
    pub fn due(&mut self, now_ms: u64) -> u32 {
        let Some(anchor) = self.anchor_ms else {
            return 0;
        };
        let secs = now_ms.saturating_sub(anchor) / 1000;
        self.anchor_ms = Some(anchor + secs * 1000);
        u32::try_from(secs).unwrap_or(u32::MAX)
    }

    /// Apply every due tick to `engine` and return the events they produced.
    ///
    /// All ticks in one catch-up share a token, so once the brew finishes
    /// the rest are dropped by the engine.
    pub fn catch_up(&mut self, engine: &mut BrewTimerEngine, clock: &dyn Clock) -> Vec<Event> {
        let due = self.due(clock.now_ms());
        let Some(token) = engine.tick_token() else {
            self.follow(engine, clock);
            return Vec::new();
        };
        let events = (0..due).filter_map(|_| engine.tick_with(token)).collect();
        self.follow(engine, clock);
        events
    }

    /// Arm while the engine runs, disarm otherwise. Call after every command.
    pub fn follow(&mut self, engine: &BrewTimerEngine, clock: &dyn Clock) {
        match (engine.state(), self.is_armed()) {
            (BrewState::Running, false) => self.arm(clock.now_ms()),
            (BrewState::Running, true) => {}
            (_, _) => self.disarm(),
        }
    }
}
