use serde::{Deserialize, Serialize};

use super::rescale::rescale_steps;
use super::step::{self, BrewStep};
use crate::error::ValidationError;

/// A complete brew recipe.
///
/// Field names follow the camelCase JSON shape the assistant produces and the
/// recipe store persists.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recipe {
    /// Present once the recipe has been saved or logged to history.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Epoch milliseconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_saved: Option<i64>,
    pub method: String,
    /// Grams of coffee.
    pub coffee_amount: f64,
    /// Total grams of water.
    pub water_amount: f64,
    /// Celsius.
    pub water_temp: f64,
    pub grind_size: String,
    pub ratio: String,
    pub steps: Vec<BrewStep>,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub flavor_expectation: String,
}

impl Recipe {
    pub fn total_duration(&self) -> u32 {
        step::total_duration(&self.steps)
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        step::validate_timeline(&self.steps)
    }

    pub fn normalize_timeline(&mut self) {
        step::normalize_timeline(&mut self.steps);
    }

    /// Copy of this recipe with its steps stretched or squeezed to `target_total_secs`.
    pub fn rescaled(&self, target_total_secs: u32) -> Recipe {
        Recipe {
            steps: rescale_steps(&self.steps, target_total_secs),
            ..self.clone()
        }
    }

    /// Copy without `id` / `date_saved`, as if never persisted.
    pub fn without_identity(&self) -> Recipe {
        Recipe {
            id: None,
            date_saved: None,
            ..self.clone()
        }
    }

    pub fn is_saved(&self) -> bool {
        self.id.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog;

    #[test]
    fn parses_assistant_payload() {
        let json = r#"{
            "method": "Hario V60",
            "coffeeAmount": 20,
            "waterAmount": 320.0,
            "waterTemp": 94,
            "grindSize": "Medium-Fine",
            "ratio": "1:16",
            "description": "Bright and clean",
            "flavorExpectation": "Citrus, floral",
            "steps": [
                {"timeStart": 0, "duration": 45, "action": "Bloom", "description": "Wet the bed", "waterAmount": 40},
                {"timeStart": 45, "duration": 120.0, "action": "Pour", "description": "Pour to 320g"}
            ]
        }"#;
        let recipe: Recipe = serde_json::from_str(json).unwrap();
        assert_eq!(recipe.id, None);
        assert_eq!(recipe.total_duration(), 165);
        assert_eq!(recipe.steps[0].water_amount, Some(40.0));
        assert!(recipe.validate().is_ok());
    }

    #[test]
    fn rescaled_keeps_descriptive_fields() {
        let original = catalog::find_method("v60").unwrap().default_recipe();
        let longer = original.rescaled(330);
        assert_eq!(longer.method, original.method);
        assert_eq!(longer.grind_size, original.grind_size);
        assert_eq!(longer.total_duration(), 330);
        assert_eq!(original.total_duration(), 165);
    }

    #[test]
    fn without_identity_strips_id_and_date() {
        let mut recipe = catalog::find_method("aeropress").unwrap().default_recipe();
        recipe.id = Some("abc".into());
        recipe.date_saved = Some(1_700_000_000_000);
        let plain = recipe.without_identity();
        assert!(!plain.is_saved());
        assert_eq!(plain.date_saved, None);
        assert_eq!(plain.steps, recipe.steps);
    }

    #[test]
    fn serializes_camel_case_and_skips_missing_identity() {
        let recipe = catalog::find_method("espresso").unwrap().default_recipe();
        let value = serde_json::to_value(&recipe).unwrap();
        assert!(value.get("coffeeAmount").is_some());
        assert!(value.get("id").is_none());
        assert_eq!(value["steps"][1]["timeStart"], 5);
    }
}
