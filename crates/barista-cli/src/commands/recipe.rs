use barista_core::catalog;
use barista_core::storage::{Config, Database, RecipeStore};
use barista_core::{BrewAssistant, BrewSession, GeminiClient};
use clap::Subcommand;

use super::brew::{log_finished, ActiveBrew};
use super::profile::ProfileOverrides;
use super::{lookup_method, print_json, runtime};

#[derive(Subcommand)]
pub enum RecipeAction {
    /// Print a method's default recipe, or the recipe being brewed
    Show {
        /// Brew method id or name
        method: Option<String>,
    },
    /// Ask the assistant for a recipe tuned to the bean profile and load it
    Generate {
        /// Brew method id or name
        method: String,
        /// Flavor to emphasize in the cup (repeatable)
        #[arg(long = "flavor")]
        flavors: Vec<String>,
        #[command(flatten)]
        profile: ProfileOverrides,
        /// Print only; keep the current brew
        #[arg(long)]
        no_load: bool,
    },
    /// Stretch or squeeze the total brew time
    Rescale {
        /// Target total in seconds
        total: u32,
        /// Rescale this method's default instead of the loaded recipe
        #[arg(long)]
        method: Option<String>,
    },
    /// Undo time adjustments on the loaded recipe
    Restore,
}

pub fn run(action: RecipeAction) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;
    match action {
        RecipeAction::Show { method: Some(key) } => {
            let method = lookup_method(&key)?;
            print_json(&method.default_recipe())?;
        }
        RecipeAction::Show { method: None } => {
            let db = Database::open()?;
            let active = ActiveBrew::require(&db)?;
            print_json(active.session.current())?;
        }
        RecipeAction::Generate {
            method,
            flavors,
            profile,
            no_load,
        } => {
            let method_name = catalog::find_method(&method)
                .map(|m| m.name.to_string())
                .unwrap_or(method);
            let profile = profile.apply(config.profile.clone());
            let client = GeminiClient::from_config(config.assistant.clone())?;

            eprintln!("Designing a {method_name} recipe for {}...", profile.origin);
            let recipe = runtime()?
                .block_on(client.generate_recipe(&method_name, &profile, &flavors))?;
            print_json(&recipe)?;

            let db = Database::open()?;
            let logged = RecipeStore::new(&db)
                .with_history_limit(config.history.limit)
                .add_history(&recipe)?;
            tracing::info!(
                id = logged.id.as_deref().unwrap_or_default(),
                "generated recipe logged"
            );

            if !no_load {
                ActiveBrew::replace(&db, recipe, &config)?;
            }
        }
        RecipeAction::Rescale {
            total,
            method: Some(key),
        } => {
            let mut session = BrewSession::new(lookup_method(&key)?.default_recipe());
            let rescaled = session.adjust_total(total, config.rescale)?;
            print_json(rescaled)?;
        }
        RecipeAction::Rescale { total, method: None } => {
            let db = Database::open()?;
            let mut active = ActiveBrew::require(&db)?;
            active.session.adjust_total(total, config.rescale)?;
            let events = active.sync_recipe();
            log_finished(&db, &config, &active, &events)?;
            active.save(&db)?;
            print_json(active.session.current())?;
        }
        RecipeAction::Restore => {
            let db = Database::open()?;
            let mut active = ActiveBrew::require(&db)?;
            active.session.restore_original();
            let events = active.sync_recipe();
            log_finished(&db, &config, &active, &events)?;
            active.save(&db)?;
            print_json(active.session.current())?;
        }
    }
    Ok(())
}
