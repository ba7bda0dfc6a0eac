use barista_core::storage::{Config, Database, RecipeStore};
use barista_core::ValidationError;
use clap::Subcommand;

use super::brew::ActiveBrew;
use super::favorites::saved_label;
use super::{clock, print_json};

#[derive(Subcommand)]
pub enum HistoryAction {
    /// List recently brewed recipes, newest first
    List {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Load a history entry as the current brew
    Load {
        id: String,
    },
    /// Forget all history
    Clear,
}

pub fn run(action: HistoryAction) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load_or_default();
    let db = Database::open()?;
    let store = RecipeStore::new(&db).with_history_limit(config.history.limit);

    match action {
        HistoryAction::List { json } => {
            let history = store.history()?;
            if json {
                print_json(&history)?;
            } else if history.is_empty() {
                println!("no brews logged yet");
            } else {
                for r in &history {
                    println!(
                        "{:<38} {:<16} {:>6} {}",
                        r.id.as_deref().unwrap_or_default(),
                        r.method,
                        clock(r.total_duration()),
                        saved_label(r.date_saved)
                    );
                }
            }
        }
        HistoryAction::Load { id } => {
            let recipe = store.history_entry(&id)?.ok_or_else(|| ValidationError::NotFound {
                kind: "history entry".into(),
                id: id.clone(),
            })?;
            let active = ActiveBrew::replace(&db, recipe, &config)?;
            print_json(active.session.current())?;
        }
        HistoryAction::Clear => {
            store.clear_history()?;
            println!("history cleared");
        }
    }
    Ok(())
}
