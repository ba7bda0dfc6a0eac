//! Brew timer engine.
//!
//! A second-granularity state machine over a recipe's step timeline. It does
//! not own a clock: a tick source calls `tick()` once per elapsed second
//! while the brew is running (see [`super::tick`] and [`super::driver`]).
//!
//! ## State Transitions
//!
//! ```text
//! Idle --start--> Running --pause--> Paused --resume--> Running
//! Running --tick (elapsed >= last step end + grace)--> Finished
//! any --reset--> Idle
//! ```
//!
//! ## Usage
//!
//! ```ignore
//! let mut engine = BrewTimerEngine::new(recipe);
//! engine.start()?;
//! // Once per second:
//! engine.tick(); // Some(Event) when a step begins or the brew finishes
//! ```

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, trace};

use super::recipe::Recipe;
use super::step::BrewStep;
use crate::error::ValidationError;
use crate::events::Event;

/// Extra seconds after the last step before the brew counts as finished.
pub const DEFAULT_GRACE_SECS: u32 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BrewState {
    Idle,
    Running,
    Paused,
    Finished,
}

/// Proof that a tick was scheduled against a particular run of the timer.
///
/// Every transition bumps the engine's generation, so a token captured
/// before a pause, reset or recipe change no longer applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickToken {
    generation: u64,
}

/// The read-only state a presentation layer renders.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BrewView {
    pub state: BrewState,
    pub elapsed: u32,
    pub current_step_index: usize,
    pub progress_fraction: f64,
}

/// Core brew timer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BrewTimerEngine {
    recipe: Recipe,
    state: BrewState,
    elapsed: u32,
    step_index: usize,
    #[serde(default = "default_grace")]
    grace_secs: u32,
    #[serde(default)]
    generation: u64,
}

fn default_grace() -> u32 {
    DEFAULT_GRACE_SECS
}

impl BrewTimerEngine {
    /// Create an idle engine for `recipe` with the default grace period.
    pub fn new(recipe: Recipe) -> Self {
        Self {
            recipe,
            state: BrewState::Idle,
            elapsed: 0,
            step_index: 0,
            grace_secs: DEFAULT_GRACE_SECS,
            generation: 0,
        }
    }

    pub fn with_grace(mut self, grace_secs: u32) -> Self {
        self.grace_secs = grace_secs;
        self
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn state(&self) -> BrewState {
        self.state
    }

    pub fn elapsed(&self) -> u32 {
        self.elapsed
    }

    pub fn current_step_index(&self) -> usize {
        self.step_index
    }

    pub fn current_step(&self) -> Option<&BrewStep> {
        self.recipe.steps.get(self.step_index)
    }

    pub fn next_step(&self) -> Option<&BrewStep> {
        if self.state == BrewState::Finished {
            return None;
        }
        self.recipe.steps.get(self.step_index + 1)
    }

    pub fn recipe(&self) -> &Recipe {
        &self.recipe
    }

    pub fn grace_secs(&self) -> u32 {
        self.grace_secs
    }

    pub fn is_finished(&self) -> bool {
        self.state == BrewState::Finished
    }

    /// End of the last step's window.
    pub fn brew_end(&self) -> u32 {
        self.recipe.steps.last().map(BrewStep::end).unwrap_or(0)
    }

    /// Elapsed second at which the engine declares the brew finished.
    pub fn finish_at(&self) -> u32 {
        self.brew_end().saturating_add(self.grace_secs)
    }

    /// 0.0 ..= 1.0 progress within the current step.
    pub fn progress_fraction(&self) -> f64 {
        self.current_step()
            .map(|step| step_progress(step, self.elapsed))
            .unwrap_or(0.0)
    }

    pub fn remaining_in_step(&self) -> u32 {
        self.current_step()
            .map(|step| step.end().saturating_sub(self.elapsed))
            .unwrap_or(0)
    }

    /// 0.0 ..= 100.0 progress across the whole brew (grace period excluded).
    pub fn brew_progress_pct(&self) -> f64 {
        let total = self.brew_end();
        if total == 0 {
            return 0.0;
        }
        (f64::from(self.elapsed) / f64::from(total) * 100.0).min(100.0)
    }

    /// Token for the tick a source is about to schedule, if the timer is running.
    pub fn tick_token(&self) -> Option<TickToken> {
        (self.state == BrewState::Running).then_some(TickToken {
            generation: self.generation,
        })
    }

    pub fn view(&self) -> BrewView {
        BrewView {
            state: self.state,
            elapsed: self.elapsed,
            current_step_index: self.step_index,
            progress_fraction: self.progress_fraction(),
        }
    }

    /// Build a full state snapshot event.
    pub fn snapshot(&self) -> Event {
        Event::StateSnapshot {
            state: self.state,
            elapsed_secs: self.elapsed,
            step_index: self.step_index,
            step_count: self.recipe.steps.len(),
            step_action: self
                .current_step()
                .map(|s| s.action.clone())
                .unwrap_or_default(),
            progress_fraction: self.progress_fraction(),
            remaining_in_step_secs: self.remaining_in_step(),
            total_secs: self.brew_end(),
            brew_progress_pct: self.brew_progress_pct(),
            at: Utc::now(),
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Begin brewing from idle.
    ///
    /// # Errors
    /// Returns [`ValidationError::EmptyCollection`] when the recipe has no steps.
    pub fn start(&mut self) -> Result<Option<Event>, ValidationError> {
        if self.recipe.steps.is_empty() {
            return Err(ValidationError::EmptyCollection("recipe steps".into()));
        }
        if self.state != BrewState::Idle {
            return Ok(None);
        }
        self.transition(BrewState::Running);
        self.refresh_step();
        debug!(method = %self.recipe.method, total = self.brew_end(), "brew started");
        Ok(Some(Event::BrewStarted {
            method: self.recipe.method.clone(),
            total_secs: self.brew_end(),
            step_count: self.recipe.steps.len(),
            at: Utc::now(),
        }))
    }

    pub fn pause(&mut self) -> Option<Event> {
        if self.state != BrewState::Running {
            return None;
        }
        self.transition(BrewState::Paused);
        debug!(elapsed = self.elapsed, "brew paused");
        Some(Event::BrewPaused {
            elapsed_secs: self.elapsed,
            at: Utc::now(),
        })
    }

    pub fn resume(&mut self) -> Option<Event> {
        if self.state != BrewState::Paused {
            return None;
        }
        self.transition(BrewState::Running);
        debug!(elapsed = self.elapsed, "brew resumed");
        Some(Event::BrewResumed {
            elapsed_secs: self.elapsed,
            at: Utc::now(),
        })
    }

    /// Single play/pause control: start when idle, pause when running,
    /// resume when paused. Does nothing once finished.
    pub fn toggle(&mut self) -> Result<Option<Event>, ValidationError> {
        match self.state {
            BrewState::Idle => self.start(),
            BrewState::Running => Ok(self.pause()),
            BrewState::Paused => Ok(self.resume()),
            BrewState::Finished => Ok(None),
        }
    }

    /// Back to idle at 0:00 on the first step, from any state.
    pub fn reset(&mut self) -> Option<Event> {
        self.transition(BrewState::Idle);
        self.elapsed = 0;
        self.step_index = 0;
        debug!("brew reset");
        Some(Event::BrewReset { at: Utc::now() })
    }

    /// Swap in a new step set (for example a rescaled copy) mid-brew.
    ///
    /// Elapsed time and state carry over; the current step is recomputed
    /// against the new timeline. Returns `Event::BrewFinished` when the
    /// brew is already past the new finish mark, `Event::RecipeChanged`
    /// otherwise.
    pub fn set_recipe(&mut self, recipe: Recipe) -> Event {
        self.recipe = recipe;
        self.generation = self.generation.wrapping_add(1);
        self.refresh_step();

        let active = matches!(self.state, BrewState::Running | BrewState::Paused);
        if active && self.elapsed >= self.finish_at() {
            self.transition(BrewState::Finished);
            info!(
                elapsed = self.elapsed,
                method = %self.recipe.method,
                "brew finished after recipe change"
            );
            return Event::BrewFinished {
                elapsed_secs: self.elapsed,
                at: Utc::now(),
            };
        }

        debug!(total = self.brew_end(), index = self.step_index, "recipe changed");
        Event::RecipeChanged {
            total_secs: self.brew_end(),
            step_count: self.recipe.steps.len(),
            at: Utc::now(),
        }
    }

    /// Advance one second. Ignored unless running.
    ///
    /// Returns `Some(Event::StepAdvanced)` when a new step begins and
    /// `Some(Event::BrewFinished)` when the grace period runs out.
    pub fn tick(&mut self) -> Option<Event> {
        if self.state != BrewState::Running {
            trace!(state = ?self.state, "tick ignored");
            return None;
        }

        self.elapsed = self.elapsed.saturating_add(1);
        let previous = self.step_index;
        self.refresh_step();

        if self.elapsed >= self.finish_at() {
            self.transition(BrewState::Finished);
            info!(elapsed = self.elapsed, method = %self.recipe.method, "brew finished");
            return Some(Event::BrewFinished {
                elapsed_secs: self.elapsed,
                at: Utc::now(),
            });
        }

        if self.step_index != previous {
            let step = self.current_step()?;
            debug!(index = self.step_index, action = %step.action, "step advanced");
            return Some(Event::StepAdvanced {
                step_index: self.step_index,
                action: step.action.clone(),
                time_start: step.time_start,
                water_amount: step.water_amount,
                at: Utc::now(),
            });
        }
        None
    }

    /// Apply a tick scheduled earlier; dropped if any transition happened since.
    pub fn tick_with(&mut self, token: TickToken) -> Option<Event> {
        if token.generation != self.generation {
            trace!(
                token = token.generation,
                current = self.generation,
                "stale tick dropped"
            );
            return None;
        }
        self.tick()
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn transition(&mut self, to: BrewState) {
        self.state = to;
        self.generation = self.generation.wrapping_add(1);
    }

    fn refresh_step(&mut self) {
        self.step_index = self
            .recipe
            .steps
            .iter()
            .rposition(|s| s.time_start <= self.elapsed)
            .unwrap_or(0);
    }
}

fn step_progress(step: &BrewStep, elapsed: u32) -> f64 {
    if step.duration == 0 {
        return if elapsed >= step.time_start { 1.0 } else { 0.0 };
    }
    let into = f64::from(elapsed) - f64::from(step.time_start);
    (into / f64::from(step.duration)).clamp(0.0, 1.0)
}
