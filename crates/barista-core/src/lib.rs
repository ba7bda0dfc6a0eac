//! # Barista Core Library
//!
//! Core logic for the Barista brew companion. Every operation is reachable
//! from the `barista` CLI; the library itself has no presentation layer.
//!
//! ## Architecture
//!
//! - **Brew**: recipe model, proportional time rescaling and a tick-driven
//!   timer state machine, plus a tokio driver for live sessions
//! - **Catalog / Profile**: static brew methods, latte-art patterns and the
//!   bean profile used to tailor recipes
//! - **Storage**: TOML configuration and a SQLite key/value store holding
//!   favorites and brew history
//! - **Assistant**: Gemini client for recipes, explanations, tutoring and video
//!
//! ## Key Components
//!
//! - [`BrewTimerEngine`]: brew timer state machine
//! - [`rescale_steps`]: proportional step rescaling
//! - [`RecipeStore`]: favorites and history persistence
//! - [`Config`]: application configuration management
//! - [`BrewAssistant`]: trait for the generative assistant

pub mod assistant;
pub mod brew;
pub mod catalog;
pub mod error;
pub mod events;
pub mod profile;
pub mod storage;

pub use assistant::{BrewAssistant, ChatMessage, ChatRole, GeminiClient, ImageInput};
pub use brew::{
    rescale_steps, BrewDriver, BrewHandle, BrewSession, BrewState, BrewStep, BrewTimerEngine,
    BrewView, Recipe, RescaleBounds, WallClockTicker,
};
pub use catalog::{BrewMethod, LatteArtPattern};
pub use error::{AssistantError, ConfigError, CoreError, DatabaseError, ValidationError};
pub use events::Event;
pub use profile::{CoffeeProfile, Process, RoastLevel};
pub use storage::{Config, Database, FavoriteItem, RecipeStore};
