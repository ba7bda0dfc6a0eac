use barista_core::storage::{Config, Database, RecipeStore};
use barista_core::{FavoriteItem, ValidationError};
use clap::Subcommand;

use super::brew::ActiveBrew;
use super::{latte_art, lookup_method, print_json};

#[derive(Subcommand)]
pub enum FavoritesAction {
    /// List saved recipes and patterns
    List {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Save (or unsave, if already saved) the loaded recipe, a method default or a pattern
    Save {
        /// Latte-art pattern id or name
        #[arg(long, conflicts_with = "method")]
        latte_art: Option<String>,
        /// Brew method whose default recipe to save
        #[arg(long)]
        method: Option<String>,
    },
    /// Remove a favorite by id
    Remove {
        id: String,
    },
    /// Load a saved recipe as the current brew
    Load {
        id: String,
    },
}

pub fn saved_label(date_saved: Option<i64>) -> String {
    date_saved
        .and_then(chrono::DateTime::from_timestamp_millis)
        .map(|d| d.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_default()
}

pub fn run(action: FavoritesAction) -> Result<(), Box<dyn std::error::Error>> {
    let db = Database::open()?;
    let store = RecipeStore::new(&db);

    match action {
        FavoritesAction::List { json } => {
            let favorites = store.favorites()?;
            if json {
                print_json(&favorites)?;
            } else if favorites.is_empty() {
                println!("no favorites yet");
            } else {
                for item in &favorites {
                    println!(
                        "{:<38} {:<32} {}",
                        item.id().unwrap_or_default(),
                        item.title(),
                        saved_label(item.date_saved())
                    );
                }
            }
        }
        FavoritesAction::Save { latte_art, method } => {
            let mut active = None;
            let item: FavoriteItem = match (latte_art, method) {
                (Some(key), _) => latte_art::lookup(&key)?.into(),
                (None, Some(key)) => lookup_method(&key)?.default_recipe().into(),
                (None, None) => {
                    let brew = ActiveBrew::require(&db)?;
                    let recipe = brew.session.current().clone();
                    active = Some(brew);
                    recipe.into()
                }
            };

            match store.toggle_favorite(item)? {
                Some(saved) => {
                    if let (Some(brew), FavoriteItem::Recipe(r)) = (active.as_mut(), &saved) {
                        brew.session.set_identity(r.id.clone(), r.date_saved);
                        brew.save(&db)?;
                    }
                    println!("saved {}", saved.id().unwrap_or_default());
                }
                None => {
                    if let Some(brew) = active.as_mut() {
                        brew.session.set_identity(None, None);
                        brew.save(&db)?;
                    }
                    println!("removed from favorites");
                }
            }
        }
        FavoritesAction::Remove { id } => {
            if !store.remove_favorite(&id)? {
                return Err(not_found(&id).into());
            }
            if let Some(mut brew) = ActiveBrew::load(&db)? {
                if brew.session.current().id.as_deref() == Some(id.as_str()) {
                    brew.session.set_identity(None, None);
                    brew.save(&db)?;
                }
            }
            println!("removed {id}");
        }
        FavoritesAction::Load { id } => match store.favorite(&id)? {
            Some(FavoriteItem::Recipe(recipe)) => {
                let config = Config::load_or_default();
                let active = ActiveBrew::replace(&db, recipe, &config)?;
                print_json(active.session.current())?;
            }
            Some(FavoriteItem::LatteArt(_)) => {
                return Err(format!("{id} is a latte-art pattern, not a recipe").into());
            }
            None => return Err(not_found(&id).into()),
        },
    }
    Ok(())
}

fn not_found(id: &str) -> ValidationError {
    ValidationError::NotFound {
        kind: "favorite".into(),
        id: id.to_string(),
    }
}
