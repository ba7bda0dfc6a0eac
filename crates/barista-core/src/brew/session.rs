use serde::{Deserialize, Serialize};

use super::recipe::Recipe;
use crate::error::ValidationError;

/// Allowed total brew time for adjustments, in seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RescaleBounds {
    pub min_total_secs: u32,
    pub max_total_secs: u32,
}

impl Default for RescaleBounds {
    fn default() -> Self {
        Self {
            min_total_secs: 60,
            max_total_secs: 600,
        }
    }
}

impl RescaleBounds {
    pub fn check(&self, target: u32) -> Result<(), ValidationError> {
        if target < self.min_total_secs || target > self.max_total_secs {
            return Err(ValidationError::OutOfRange {
                field: "total brew time".into(),
                value: u64::from(target),
                min: u64::from(self.min_total_secs),
                max: u64::from(self.max_total_secs),
            });
        }
        Ok(())
    }
}

/// The recipe being brewed, next to the baseline it was derived from.
///
/// Time adjustments are always computed from `original`, so moving the
/// slider back and forth never accumulates rounding error in `current`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BrewSession {
    original: Recipe,
    current: Recipe,
}

impl BrewSession {
    pub fn new(recipe: Recipe) -> Self {
        Self {
            current: recipe.clone(),
            original: recipe,
        }
    }

    pub fn original(&self) -> &Recipe {
        &self.original
    }

    pub fn current(&self) -> &Recipe {
        &self.current
    }

    pub fn into_current(self) -> Recipe {
        self.current
    }

    pub fn total_duration(&self) -> u32 {
        self.current.total_duration()
    }

    pub fn is_adjusted(&self) -> bool {
        self.current.steps != self.original.steps
    }

    /// Rescale the baseline to `target_total_secs` and make that the current recipe.
    pub fn adjust_total(
        &mut self,
        target_total_secs: u32,
        bounds: RescaleBounds,
    ) -> Result<&Recipe, ValidationError> {
        bounds.check(target_total_secs)?;
        self.current = Recipe {
            id: self.current.id.clone(),
            date_saved: self.current.date_saved,
            ..self.original.rescaled(target_total_secs)
        };
        Ok(&self.current)
    }

    pub fn restore_original(&mut self) -> &Recipe {
        self.current = self.original.clone();
        &self.current
    }

    /// Record a persisted identity on both copies (after saving as a favorite).
    pub fn set_identity(&mut self, id: Option<String>, date_saved: Option<i64>) {
        for recipe in [&mut self.original, &mut self.current] {
            recipe.id = id.clone();
            recipe.date_saved = date_saved;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog;

    fn v60_session() -> BrewSession {
        BrewSession::new(catalog::find_method("v60").unwrap().default_recipe())
    }

    #[test]
    fn adjust_rescales_from_original() {
        let mut session = v60_session();
        let recipe = session.adjust_total(330, RescaleBounds::default()).unwrap();
        let starts: Vec<u32> = recipe.steps.iter().map(|s| s.time_start).collect();
        assert_eq!(starts, vec![0, 90, 150, 210]);
        assert_eq!(session.original().total_duration(), 165);
        assert!(session.is_adjusted());
    }

    #[test]
    fn repeated_adjustments_do_not_compound() {
        let mut session = v60_session();
        let bounds = RescaleBounds::default();
        for target in [97, 431, 61, 577, 203] {
            session.adjust_total(target, bounds).unwrap();
        }
        session.adjust_total(165, bounds).unwrap();
        assert_eq!(session.current(), session.original());
        assert!(!session.is_adjusted());
    }

    #[test]
    fn out_of_range_target_is_rejected() {
        let mut session = v60_session();
        let err = session.adjust_total(30, RescaleBounds::default()).unwrap_err();
        assert!(matches!(err, ValidationError::OutOfRange { value: 30, min: 60, max: 600, .. }));
        assert!(session.adjust_total(601, RescaleBounds::default()).is_err());
        assert!(!session.is_adjusted());
    }

    #[test]
    fn restore_original_discards_adjustment() {
        let mut session = v60_session();
        session.adjust_total(600, RescaleBounds::default()).unwrap();
        assert_eq!(session.restore_original().total_duration(), 165);
    }

    #[test]
    fn identity_survives_adjustment() {
        let mut session = v60_session();
        session.set_identity(Some("fav-1".into()), Some(42));
        let adjusted = session.adjust_total(200, RescaleBounds::default()).unwrap();
        assert_eq!(adjusted.id.as_deref(), Some("fav-1"));
        assert_eq!(adjusted.date_saved, Some(42));
    }
}
