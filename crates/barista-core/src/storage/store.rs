//! Favorites and brew history, persisted as JSON lists in the kv table.

use chrono::Utc;
use serde::{de::DeserializeOwned, Deserialize, Serialize};

use super::database::Database;
use crate::brew::Recipe;
use crate::catalog::LatteArtPattern;
use crate::error::CoreError;

pub const FAVORITES_KEY: &str = "barista-ai-favorites";
pub const HISTORY_KEY: &str = "barista-ai-history";

const DEFAULT_HISTORY_LIMIT: usize = 20;

/// Something the user can star: a recipe or a latte-art pattern.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FavoriteItem {
    Recipe(Recipe),
    LatteArt(LatteArtPattern),
}

impl FavoriteItem {
    pub fn id(&self) -> Option<&str> {
        match self {
            FavoriteItem::Recipe(r) => r.id.as_deref(),
            FavoriteItem::LatteArt(p) => Some(p.id.as_str()),
        }
    }

    pub fn date_saved(&self) -> Option<i64> {
        match self {
            FavoriteItem::Recipe(r) => r.date_saved,
            FavoriteItem::LatteArt(p) => p.date_saved,
        }
    }

    /// Short human label for listings.
    pub fn title(&self) -> String {
        match self {
            FavoriteItem::Recipe(r) => format!("{} ({}s)", r.method, r.total_duration()),
            FavoriteItem::LatteArt(p) => format!("Latte art: {}", p.name),
        }
    }

    fn stamp(&mut self, id: String, date_saved: i64) {
        match self {
            FavoriteItem::Recipe(r) => {
                r.id = Some(id);
                r.date_saved = Some(date_saved);
            }
            FavoriteItem::LatteArt(p) => {
                p.id = id;
                p.date_saved = Some(date_saved);
            }
        }
    }
}

impl From<Recipe> for FavoriteItem {
    fn from(recipe: Recipe) -> Self {
        FavoriteItem::Recipe(recipe)
    }
}

impl From<LatteArtPattern> for FavoriteItem {
    fn from(pattern: LatteArtPattern) -> Self {
        FavoriteItem::LatteArt(pattern)
    }
}

/// Favorites and history on top of a [`Database`].
pub struct RecipeStore<'a> {
    db: &'a Database,
    history_limit: usize,
}

impl<'a> RecipeStore<'a> {
    pub fn new(db: &'a Database) -> Self {
        Self {
            db,
            history_limit: DEFAULT_HISTORY_LIMIT,
        }
    }

    pub fn with_history_limit(mut self, limit: usize) -> Self {
        self.history_limit = limit;
        self
    }

    fn read_list<T: DeserializeOwned>(&self, key: &str) -> Result<Vec<T>, CoreError> {
        let Some(raw) = self.db.kv_get(key)? else {
            return Ok(Vec::new());
        };
        match serde_json::from_str(&raw) {
            Ok(items) => Ok(items),
            Err(e) => {
                tracing::warn!(key, "ignoring unreadable stored list: {e}");
                Ok(Vec::new())
            }
        }
    }

    fn write_list<T: Serialize>(&self, key: &str, items: &[T]) -> Result<(), CoreError> {
        let raw = serde_json::to_string(items)?;
        self.db.kv_set(key, &raw)?;
        Ok(())
    }

    // ── Favorites ──────────────────────────────────────────────────

    pub fn favorites(&self) -> Result<Vec<FavoriteItem>, CoreError> {
        self.read_list(FAVORITES_KEY)
    }

    pub fn favorite(&self, id: &str) -> Result<Option<FavoriteItem>, CoreError> {
        Ok(self
            .favorites()?
            .into_iter()
            .find(|item| item.id() == Some(id)))
    }

    /// Save `item`, or unsave it if an item with the same id is already stored.
    ///
    /// Returns the stored item, or `None` when the call removed it.
    pub fn toggle_favorite(
        &self,
        item: impl Into<FavoriteItem>,
    ) -> Result<Option<FavoriteItem>, CoreError> {
        let mut item = item.into();
        let mut favorites = self.favorites()?;

        if let Some(id) = item.id() {
            if let Some(pos) = favorites.iter().position(|f| f.id() == Some(id)) {
                let removed = favorites.remove(pos);
                tracing::debug!(id = removed.id(), "favorite removed");
                self.write_list(FAVORITES_KEY, &favorites)?;
                return Ok(None);
            }
        }

        let now = Utc::now().timestamp_millis();
        let id = match item.id() {
            Some(id) => id.to_string(),
            None => {
                let candidate = now.to_string();
                if favorites.iter().any(|f| f.id() == Some(candidate.as_str())) {
                    uuid::Uuid::new_v4().to_string()
                } else {
                    candidate
                }
            }
        };
        item.stamp(id, now);
        favorites.insert(0, item.clone());
        self.write_list(FAVORITES_KEY, &favorites)?;
        tracing::debug!(id = item.id(), "favorite saved");
        Ok(Some(item))
    }

    /// Remove a favorite by id. Returns whether anything was removed.
    pub fn remove_favorite(&self, id: &str) -> Result<bool, CoreError> {
        let mut favorites = self.favorites()?;
        let before = favorites.len();
        favorites.retain(|f| f.id() != Some(id));
        if favorites.len() == before {
            return Ok(false);
        }
        self.write_list(FAVORITES_KEY, &favorites)?;
        Ok(true)
    }

    // ── History ────────────────────────────────────────────────────

    pub fn history(&self) -> Result<Vec<Recipe>, CoreError> {
        self.read_list(HISTORY_KEY)
    }

    pub fn history_entry(&self, id: &str) -> Result<Option<Recipe>, CoreError> {
        Ok(self
            .history()?
            .into_iter()
            .find(|r| r.id.as_deref() == Some(id)))
    }

    /// Log a brewed recipe. Most recent first, capped at the history limit.
    pub fn add_history(&self, recipe: &Recipe) -> Result<Recipe, CoreError> {
        let entry = Recipe {
            id: Some(uuid::Uuid::new_v4().to_string()),
            date_saved: Some(Utc::now().timestamp_millis()),
            ..recipe.clone()
        };
        let mut history = self.history()?;
        history.insert(0, entry.clone());
        history.truncate(self.history_limit);
        self.write_list(HISTORY_KEY, &history)?;
        Ok(entry)
    }

    pub fn clear_history(&self) -> Result<(), CoreError> {
        self.db.kv_delete(HISTORY_KEY)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog;

    fn v60() -> Recipe {
        catalog::find_method("v60").unwrap().default_recipe()
    }

    #[test]
    fn toggle_saves_then_removes() {
        let db = Database::open_memory().unwrap();
        let store = RecipeStore::new(&db);

        let saved = store.toggle_favorite(v60()).unwrap().unwrap();
        let id = saved.id().unwrap().to_string();
        assert!(saved.date_saved().is_some());
        assert_eq!(store.favorites().unwrap().len(), 1);

        assert!(store.toggle_favorite(saved).unwrap().is_none());
        assert!(store.favorites().unwrap().is_empty());
        assert!(store.favorite(&id).unwrap().is_none());
    }

    #[test]
    fn latte_art_keeps_its_id() {
        let db = Database::open_memory().unwrap();
        let store = RecipeStore::new(&db);
        let heart = catalog::find_latte_art("heart").unwrap();

        store.toggle_favorite(heart.clone()).unwrap();
        let stored = store.favorite(&heart.id).unwrap().unwrap();
        assert!(matches!(stored, FavoriteItem::LatteArt(ref p) if p.name == heart.name));
        assert!(store.remove_favorite(&heart.id).unwrap());
        assert!(!store.remove_favorite(&heart.id).unwrap());
    }

    #[test]
    fn newest_favorite_first() {
        let db = Database::open_memory().unwrap();
        let store = RecipeStore::new(&db);
        store.toggle_favorite(v60()).unwrap();
        store
            .toggle_favorite(catalog::find_latte_art("tulip").unwrap())
            .unwrap();
        let favorites = store.favorites().unwrap();
        assert!(matches!(favorites[0], FavoriteItem::LatteArt(_)));
        assert!(matches!(favorites[1], FavoriteItem::Recipe(_)));
    }

    #[test]
    fn history_is_capped_and_most_recent_first() {
        let db = Database::open_memory().unwrap();
        let store = RecipeStore::new(&db).with_history_limit(3);
        let mut last = None;
        for total in [120, 150, 180, 210] {
            last = Some(store.add_history(&v60().rescaled(total)).unwrap());
        }
        let history = store.history().unwrap();
        assert_eq!(history.len(), 3);
        assert_eq!(history[0].total_duration(), 210);
        assert_eq!(history[2].total_duration(), 150);

        let last = last.unwrap();
        let id = last.id.as_deref().unwrap();
        assert_eq!(store.history_entry(id).unwrap(), Some(last.clone()));
    }

    #[test]
    fn history_entries_get_fresh_ids() {
        let db = Database::open_memory().unwrap();
        let store = RecipeStore::new(&db);
        let a = store.add_history(&v60()).unwrap();
        let b = store.add_history(&a).unwrap();
        assert_ne!(a.id, b.id);
        store.clear_history().unwrap();
        assert!(store.history().unwrap().is_empty());
    }

    #[test]
    fn corrupt_list_reads_as_empty() {
        let db = Database::open_memory().unwrap();
        db.kv_set(HISTORY_KEY, "{not json").unwrap();
        let store = RecipeStore::new(&db);
        assert!(store.history().unwrap().is_empty());
        store.add_history(&v60()).unwrap();
        assert_eq!(store.history().unwrap().len(), 1);
    }
}
