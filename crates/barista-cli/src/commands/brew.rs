use std::time::Duration;

use barista_core::brew::SystemClock;
use barista_core::storage::{Config, Database, RecipeStore};
use barista_core::{
    BrewDriver, BrewSession, BrewState, BrewTimerEngine, Event, Recipe, WallClockTicker,
};
use clap::Subcommand;
use serde::{Deserialize, Serialize};

use super::{clock, lookup_method, print_json, runtime};

const BREW_KEY: &str = "brew_state";

#[derive(Subcommand)]
pub enum BrewAction {
    /// Start brewing (optionally loading a method's default recipe first)
    Start {
        /// Brew method id or name
        method: Option<String>,
    },
    /// Pause the running brew
    Pause,
    /// Resume a paused brew
    Resume,
    /// Start, pause or resume depending on the current state
    Toggle,
    /// Back to 0:00 on the first step
    Reset,
    /// Print current brew state as JSON
    Status,
    /// Run the timer live in the foreground until the brew finishes
    Run {
        /// Brew method id or name
        method: Option<String>,
    },
}

/// The recipe being brewed plus timer state, persisted between invocations.
#[derive(Serialize, Deserialize)]
pub struct ActiveBrew {
    pub session: BrewSession,
    pub engine: BrewTimerEngine,
    #[serde(default)]
    pub ticker: WallClockTicker,
}

impl ActiveBrew {
    pub fn new(recipe: Recipe, grace_secs: u32) -> Self {
        Self {
            engine: BrewTimerEngine::new(recipe.clone()).with_grace(grace_secs),
            session: BrewSession::new(recipe),
            ticker: WallClockTicker::new(),
        }
    }

    pub fn load(db: &Database) -> Result<Option<Self>, Box<dyn std::error::Error>> {
        let Some(json) = db.kv_get(BREW_KEY)? else {
            return Ok(None);
        };
        match serde_json::from_str(&json) {
            Ok(active) => Ok(Some(active)),
            Err(e) => {
                tracing::warn!("discarding unreadable brew state: {e}");
                Ok(None)
            }
        }
    }

    pub fn require(db: &Database) -> Result<Self, Box<dyn std::error::Error>> {
        Self::load(db)?.ok_or_else(|| {
            "no recipe loaded; pass a method or run `barista recipe generate` first".into()
        })
    }

    pub fn save(&self, db: &Database) -> Result<(), Box<dyn std::error::Error>> {
        let json = serde_json::to_string(self)?;
        db.kv_set(BREW_KEY, &json)?;
        Ok(())
    }

    /// Make `recipe` the one being brewed, keeping the grace period.
    pub fn replace(
        db: &Database,
        recipe: Recipe,
        config: &Config,
    ) -> Result<Self, Box<dyn std::error::Error>> {
        let active = Self::new(recipe, config.timer.grace_secs);
        active.save(db)?;
        Ok(active)
    }

    /// Push the engine forward to the wall clock.
    fn catch_up(&mut self) -> Vec<Event> {
        self.ticker.catch_up(&mut self.engine, &SystemClock)
    }

    fn follow(&mut self) {
        self.ticker.follow(&self.engine, &SystemClock);
    }

    /// Swap in the session's current recipe after an adjustment.
    ///
    /// The engine is caught up to the wall clock first so the new timeline
    /// is applied at the true elapsed second.
    pub fn sync_recipe(&mut self) -> Vec<Event> {
        let mut events = self.catch_up();
        events.push(self.engine.set_recipe(self.session.current().clone()));
        self.follow();
        events
    }
}

pub fn record_history(
    db: &Database,
    config: &Config,
    recipe: &Recipe,
) -> Result<(), Box<dyn std::error::Error>> {
    let store = RecipeStore::new(db).with_history_limit(config.history.limit);
    let entry = store.add_history(recipe)?;
    tracing::info!(id = entry.id.as_deref().unwrap_or_default(), "brew logged to history");
    Ok(())
}

pub fn log_finished(
    db: &Database,
    config: &Config,
    active: &ActiveBrew,
    events: &[Event],
) -> Result<(), Box<dyn std::error::Error>> {
    if events.iter().any(|e| matches!(e, Event::BrewFinished { .. })) {
        record_history(db, config, active.session.current())?;
    }
    Ok(())
}

fn print_events(events: &[Event]) -> Result<(), Box<dyn std::error::Error>> {
    for event in events {
        print_json(event)?;
    }
    Ok(())
}

pub fn run(action: BrewAction) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;
    let db = Database::open()?;

    let mut active = match &action {
        BrewAction::Start { method: Some(key) } | BrewAction::Run { method: Some(key) } => {
            ActiveBrew::replace(&db, lookup_method(key)?.default_recipe(), &config)?
        }
        _ => ActiveBrew::require(&db)?,
    };

    if let BrewAction::Run { .. } = action {
        return run_live(&db, &config, active);
    }

    let ticked = active.catch_up();
    print_events(&ticked)?;
    log_finished(&db, &config, &active, &ticked)?;

    let event = match action {
        BrewAction::Start { .. } => active.engine.start()?,
        BrewAction::Pause => active.engine.pause(),
        BrewAction::Resume => active.engine.resume(),
        BrewAction::Toggle => active.engine.toggle()?,
        BrewAction::Reset => active.engine.reset(),
        BrewAction::Status | BrewAction::Run { .. } => None,
    };
    active.follow();

    match event {
        Some(event) => print_json(&event)?,
        None => print_json(&active.engine.snapshot())?,
    }

    active.save(&db)?;
    Ok(())
}

fn run_live(
    db: &Database,
    config: &Config,
    mut active: ActiveBrew,
) -> Result<(), Box<dyn std::error::Error>> {
    let ticked = active.catch_up();
    print_events(&ticked)?;
    log_finished(db, config, &active, &ticked)?;
    // The driver owns the clock from here; hand it a paused engine so resuming arms its interval.
    active.engine.pause();

    let ActiveBrew { session, engine, .. } = active;
    let period = Duration::from_millis(config.timer.tick_interval_ms.max(1));
    let rt = runtime()?;

    let (engine, finished) = rt.block_on(async {
        let (mut handle, task) = BrewDriver::spawn(engine, period);

        let opening = match handle.view().state {
            BrewState::Paused => handle.resume().await?,
            BrewState::Finished => {
                handle.reset().await?;
                handle.start().await?
            }
            _ => handle.start().await?,
        };
        if let Some(event) = opening {
            print_json(&event)?;
        }
        if let Some(step) = session.current().steps.get(handle.view().current_step_index) {
            println!("{} {}", clock(step.time_start), step.action);
        }

        let mut finished = false;
        loop {
            tokio::select! {
                event = handle.next_event() => {
                    let Some(event) = event else { break };
                    match &event {
                        Event::StepAdvanced { step_index, .. } => {
                            if let Some(step) = session.current().steps.get(*step_index) {
                                println!("{} {}", clock(step.time_start), step.action);
                                if !step.description.is_empty() {
                                    println!("    {}", step.description);
                                }
                            }
                        }
                        Event::BrewFinished { elapsed_secs, .. } => {
                            println!("{} Done. Enjoy your coffee.", clock(*elapsed_secs));
                            finished = true;
                            break;
                        }
                        _ => {}
                    }
                }
                _ = tokio::signal::ctrl_c() => {
                    if let Some(event) = handle.pause().await? {
                        print_json(&event)?;
                    }
                    break;
                }
            }
        }

        drop(handle);
        let engine = task.await?;
        Ok::<_, Box<dyn std::error::Error>>((engine, finished))
    })?;

    let mut active = ActiveBrew {
        session,
        engine,
        ticker: WallClockTicker::new(),
    };
    active.follow();
    if finished {
        record_history(db, config, active.session.current())?;
    }
    active.save(db)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v60_brew() -> ActiveBrew {
        ActiveBrew::new(lookup_method("v60").unwrap().default_recipe(), 5)
    }

    #[test]
    fn load_returns_none_when_nothing_saved() {
        let db = Database::open_memory().unwrap();
        assert!(ActiveBrew::load(&db).unwrap().is_none());
    }

    #[test]
    fn load_discards_unreadable_state() {
        let db = Database::open_memory().unwrap();
        db.kv_set(BREW_KEY, "{not json").unwrap();
        assert!(ActiveBrew::load(&db).unwrap().is_none());
    }

    #[test]
    fn load_propagates_database_errors() {
        let db = Database::open_memory().unwrap();
        v60_brew().save(&db).unwrap();
        db.conn().execute_batch("DROP TABLE kv").unwrap();
        assert!(ActiveBrew::load(&db).is_err());
        assert!(ActiveBrew::require(&db)
            .err()
            .is_some_and(|e| !e.to_string().contains("no recipe loaded")));
    }

    #[test]
    fn sync_recipe_keeps_a_running_brew_going() {
        let mut active = v60_brew();
        active.engine.start().unwrap();
        active.session.adjust_total(330, Default::default()).unwrap();
        let events = active.sync_recipe();
        assert!(matches!(events.last(), Some(Event::RecipeChanged { total_secs: 330, .. })));
        assert_eq!(active.engine.state(), BrewState::Running);
    }
}
