//! Real-time driver for a [`BrewTimerEngine`].
//!
//! One tokio task owns the engine and `select!`s between user commands and a
//! periodic interval, so a command and a tick are never applied out of order.
//! The interval exists only while the engine is running: it is re-armed on
//! start/resume and dropped on pause, reset and finish, which means no tick
//! scheduled before a transition can land after it.

use std::time::Duration;

use tokio::sync::{mpsc, oneshot, watch};
use tokio::task::JoinHandle;
use tokio::time::{Instant, Interval};
use tracing::{debug, warn};

use super::engine::{BrewState, BrewTimerEngine, BrewView};
use super::recipe::Recipe;
use crate::error::{CoreError, ValidationError};
use crate::events::Event;

type Reply = oneshot::Sender<Result<Option<Event>, ValidationError>>;

enum Command {
    Start(Reply),
    Pause(Reply),
    Resume(Reply),
    Toggle(Reply),
    Reset(Reply),
    SetRecipe(Box<Recipe>, Reply),
}

/// Owns the engine inside the driver task.
pub struct BrewDriver {
    engine: BrewTimerEngine,
    period: Duration,
    commands: mpsc::UnboundedReceiver<Command>,
    views: watch::Sender<BrewView>,
    events: mpsc::UnboundedSender<Event>,
    interval: Option<Interval>,
}

/// Front-end side of a running driver.
pub struct BrewHandle {
    commands: mpsc::UnboundedSender<Command>,
    views: watch::Receiver<BrewView>,
    events: mpsc::UnboundedReceiver<Event>,
}

impl BrewDriver {
    /// Spawn the driver task. `period` is one engine second (normally 1s).
    ///
    /// The task ends when every [`BrewHandle`] is dropped and hands the
    /// engine back through the join handle.
    pub fn spawn(
        engine: BrewTimerEngine,
        period: Duration,
    ) -> (BrewHandle, JoinHandle<BrewTimerEngine>) {
        let (command_tx, command_rx) = mpsc::unbounded_channel();
        let (event_tx, event_rx) = mpsc::unbounded_channel();
        let (view_tx, view_rx) = watch::channel(engine.view());

        let driver = BrewDriver {
            engine,
            period,
            commands: command_rx,
            views: view_tx,
            events: event_tx,
            interval: None,
        };
        let task = tokio::spawn(driver.run());

        let handle = BrewHandle {
            commands: command_tx,
            views: view_rx,
            events: event_rx,
        };
        (handle, task)
    }

    async fn run(mut self) -> BrewTimerEngine {
        loop {
            tokio::select! {
                biased;
                command = self.commands.recv() => {
                    let Some(command) = command else { break };
                    self.handle(command);
                }
                _ = next_tick(&mut self.interval) => {
                    if let Some(event) = self.engine.tick() {
                        let _ = self.events.send(event);
                    }
                    if self.engine.state() != BrewState::Running {
                        self.interval = None;
                    }
                }
            }
            self.views.send_replace(self.engine.view());
        }
        debug!("brew driver stopped");
        self.engine
    }

    fn handle(&mut self, command: Command) {
        let (result, reply) = match command {
            Command::Start(reply) => (self.engine.start(), reply),
            Command::Pause(reply) => (Ok(self.engine.pause()), reply),
            Command::Resume(reply) => (Ok(self.engine.resume()), reply),
            Command::Toggle(reply) => (self.engine.toggle(), reply),
            Command::Reset(reply) => (Ok(self.engine.reset()), reply),
            Command::SetRecipe(recipe, reply) => {
                (Ok(Some(self.engine.set_recipe(*recipe))), reply)
            }
        };

        let transitioned = matches!(result, Ok(Some(_)));
        match self.engine.state() {
            BrewState::Running if transitioned => {
                let first = Instant::now() + self.period;
                self.interval = Some(tokio::time::interval_at(first, self.period));
            }
            BrewState::Running => {}
            _ => self.interval = None,
        }

        // Publish before replying so the caller sees the new state immediately.
        self.views.send_replace(self.engine.view());
        if reply.send(result).is_err() {
            warn!("brew command caller went away before the reply");
        }
    }
}

async fn next_tick(interval: &mut Option<Interval>) {
    match interval {
        Some(interval) => {
            interval.tick().await;
        }
        None => std::future::pending::<()>().await,
    }
}

impl BrewHandle {
    pub async fn start(&self) -> Result<Option<Event>, CoreError> {
        self.request(Command::Start).await
    }

    pub async fn pause(&self) -> Result<Option<Event>, CoreError> {
        self.request(Command::Pause).await
    }

    pub async fn resume(&self) -> Result<Option<Event>, CoreError> {
        self.request(Command::Resume).await
    }

    pub async fn toggle(&self) -> Result<Option<Event>, CoreError> {
        self.request(Command::Toggle).await
    }

    /// Reset to idle. When this returns, ticking has stopped.
    pub async fn reset(&self) -> Result<Option<Event>, CoreError> {
        self.request(Command::Reset).await
    }

    pub async fn set_recipe(&self, recipe: Recipe) -> Result<Option<Event>, CoreError> {
        self.request(|reply| Command::SetRecipe(Box::new(recipe), reply))
            .await
    }

    /// Latest published state.
    pub fn view(&self) -> BrewView {
        *self.views.borrow()
    }

    /// Wait until the state changes, then return it.
    pub async fn changed(&mut self) -> Result<BrewView, CoreError> {
        self.views
            .changed()
            .await
            .map_err(|_| CoreError::Custom("brew driver stopped".into()))?;
        Ok(*self.views.borrow_and_update())
    }

    /// Next event produced by a tick (step changes and the finish).
    pub async fn next_event(&mut self) -> Option<Event> {
        self.events.recv().await
    }

    /// Tick events already produced, without waiting.
    pub fn drain_events(&mut self) -> Vec<Event> {
        let mut out = Vec::new();
        while let Ok(event) = self.events.try_recv() {
            out.push(event);
        }
        out
    }

    async fn request<F>(&self, make: F) -> Result<Option<Event>, CoreError>
    where
        F: FnOnce(Reply) -> Command,
    {
        let (tx, rx) = oneshot::channel();
        self.commands
            .send(make(tx))
            .map_err(|_| CoreError::Custom("brew driver stopped".into()))?;
        let result = rx
            .await
            .map_err(|_| CoreError::Custom("brew driver stopped".into()))?;
        Ok(result?)
    }
}
