use serde::{Deserialize, Deserializer, Serialize};

use crate::error::ValidationError;

/// One timed phase of a brew.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BrewStep {
    /// Offset from brew start, in seconds.
    #[serde(deserialize_with = "whole_seconds")]
    pub time_start: u32,
    /// How long the step stays active, in seconds.
    #[serde(deserialize_with = "whole_seconds")]
    pub duration: u32,
    pub action: String,
    #[serde(default)]
    pub description: String,
    /// Cumulative target water weight in grams.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub water_amount: Option<f64>,
}

impl BrewStep {
    pub fn new(time_start: u32, duration: u32, action: impl Into<String>) -> Self {
        Self {
            time_start,
            duration,
            action: action.into(),
            description: String::new(),
            water_amount: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_water(mut self, grams: f64) -> Self {
        self.water_amount = Some(grams);
        self
    }

    /// Second at which the step window closes.
    pub fn end(&self) -> u32 {
        self.time_start.saturating_add(self.duration)
    }

    /// Whether `elapsed` falls inside `[time_start, end)`.
    pub fn contains(&self, elapsed: u32) -> bool {
        elapsed >= self.time_start && elapsed < self.end()
    }
}

/// Total brew time of an ordered step sequence.
///
/// Equal to the last step's end for a contiguous sequence.
pub fn total_duration(steps: &[BrewStep]) -> u32 {
    steps.iter().map(|s| s.duration).fold(0u32, u32::saturating_add)
}

/// Check that steps start at zero, have positive durations and leave no gaps.
pub fn validate_timeline(steps: &[BrewStep]) -> Result<(), ValidationError> {
    if steps.is_empty() {
        return Err(ValidationError::EmptyCollection("steps".into()));
    }
    let mut expected = 0u32;
    for (index, step) in steps.iter().enumerate() {
        if step.duration == 0 {
            return Err(ValidationError::InvalidValue {
                field: format!("steps[{index}].duration"),
                message: "must be at least 1 second".into(),
            });
        }
        if step.time_start != expected {
            return Err(ValidationError::BrokenTimeline {
                index,
                expected,
                found: step.time_start,
            });
        }
        expected = step.end();
    }
    Ok(())
}

/// Recompute start offsets from durations so the sequence is contiguous.
///
/// Zero durations are raised to one second.
pub fn normalize_timeline(steps: &mut [BrewStep]) {
    let mut cursor = 0u32;
    for step in steps.iter_mut() {
        step.duration = step.duration.max(1);
        step.time_start = cursor;
        cursor = cursor.saturating_add(step.duration);
    }
}

/// Accept integer or floating JSON numbers for second fields.
fn whole_seconds<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = f64::deserialize(deserializer)?;
    if !raw.is_finite() || raw < 0.0 || raw > f64::from(u32::MAX) {
        return Err(serde::de::Error::custom(format!(
            "expected a non-negative number of seconds, got {raw}"
        )));
    }
    Ok(raw.round() as u32)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v60_steps() -> Vec<BrewStep> {
        vec![
            BrewStep::new(0, 45, "Bloom"),
            BrewStep::new(45, 30, "First Pour"),
            BrewStep::new(75, 30, "Second Pour"),
            BrewStep::new(105, 60, "Draw Down"),
        ]
    }

    #[test]
    fn total_duration_sums_steps() {
        assert_eq!(total_duration(&v60_steps()), 165);
        assert_eq!(total_duration(&[]), 0);
    }

    #[test]
    fn validate_accepts_contiguous_steps() {
        assert!(validate_timeline(&v60_steps()).is_ok());
    }

    #[test]
    fn validate_rejects_gap() {
        let mut steps = v60_steps();
        steps[2].time_start = 80;
        assert_eq!(
            validate_timeline(&steps),
            Err(ValidationError::BrokenTimeline {
                index: 2,
                expected: 75,
                found: 80
            })
        );
    }

    #[test]
    fn validate_rejects_empty_and_zero_duration() {
        assert!(matches!(
            validate_timeline(&[]),
            Err(ValidationError::EmptyCollection(_))
        ));
        let steps = vec![BrewStep::new(0, 0, "Nothing")];
        assert!(matches!(
            validate_timeline(&steps),
            Err(ValidationError::InvalidValue { .. })
        ));
    }

    #[test]
    fn normalize_repairs_overlap() {
        let mut steps = vec![
            BrewStep::new(0, 30, "Pour"),
            BrewStep::new(20, 10, "Stir"),
            BrewStep::new(40, 0, "Press"),
        ];
        normalize_timeline(&mut steps);
        let starts: Vec<u32> = steps.iter().map(|s| s.time_start).collect();
        assert_eq!(starts, vec![0, 30, 40]);
        assert_eq!(steps[2].duration, 1);
        assert!(validate_timeline(&steps).is_ok());
    }

    #[test]
    fn deserializes_float_seconds_from_wire() {
        let json = r#"{"timeStart": 45.0, "duration": 29.6, "action": "Pour", "description": "", "waterAmount": 200}"#;
        let step: BrewStep = serde_json::from_str(json).unwrap();
        assert_eq!(step.time_start, 45);
        assert_eq!(step.duration, 30);
        assert_eq!(step.water_amount, Some(200.0));
    }

    #[test]
    fn rejects_negative_seconds() {
        let json = r#"{"timeStart": -1, "duration": 10, "action": "Pour"}"#;
        assert!(serde_json::from_str::<BrewStep>(json).is_err());
    }

    #[test]
    fn contains_is_half_open() {
        let step = BrewStep::new(45, 30, "First Pour");
        assert!(step.contains(45));
        assert!(step.contains(74));
        assert!(!step.contains(75));
    }
}
