use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::brew::BrewState;

/// Every brew state change produces an Event.
/// Front ends poll snapshots or print the events they receive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    BrewStarted {
        method: String,
        total_secs: u32,
        step_count: usize,
        at: DateTime<Utc>,
    },
    BrewPaused {
        elapsed_secs: u32,
        at: DateTime<Utc>,
    },
    BrewResumed {
        elapsed_secs: u32,
        at: DateTime<Utc>,
    },
    /// A tick moved the timeline into a new step.
    StepAdvanced {
        step_index: usize,
        action: String,
        time_start: u32,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        water_amount: Option<f64>,
        at: DateTime<Utc>,
    },
    /// Elapsed time passed the last step plus the grace period.
    BrewFinished {
        elapsed_secs: u32,
        at: DateTime<Utc>,
    },
    BrewReset {
        at: DateTime<Utc>,
    },
    /// The step set was replaced (for example after a rescale).
    RecipeChanged {
        total_secs: u32,
        step_count: usize,
        at: DateTime<Utc>,
    },
    StateSnapshot {
        state: BrewState,
        elapsed_secs: u32,
        step_index: usize,
        step_count: usize,
        step_action: String,
        progress_fraction: f64,
        remaining_in_step_secs: u32,
        total_secs: u32,
        brew_progress_pct: f64,
        at: DateTime<Utc>,
    },
}

impl Event {
    /// Short machine-friendly name, matching the serialized `type` tag.
    pub fn kind(&self) -> &'static str {
        match self {
            Event::BrewStarted { .. } => "brew_started",
            Event::BrewPaused { .. } => "brew_paused",
            Event::BrewResumed { .. } => "brew_resumed",
            Event::StepAdvanced { .. } => "step_advanced",
            Event::BrewFinished { .. } => "brew_finished",
            Event::BrewReset { .. } => "brew_reset",
            Event::RecipeChanged { .. } => "recipe_changed",
            Event::StateSnapshot { .. } => "state_snapshot",
        }
    }
}
