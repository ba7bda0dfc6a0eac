mod driver;
mod engine;
mod recipe;
mod rescale;
mod session;
mod step;
mod tick;

pub use driver::{BrewDriver, BrewHandle};
pub use engine::{BrewState, BrewTimerEngine, BrewView, TickToken, DEFAULT_GRACE_SECS};
pub use recipe::Recipe;
pub use rescale::rescale_steps;
pub use session::{BrewSession, RescaleBounds};
pub use step::{normalize_timeline, total_duration, validate_timeline, BrewStep};
pub use tick::{Clock, FixedClock, SystemClock, WallClockTicker};
