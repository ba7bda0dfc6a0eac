//! Proportional brew-time rescaling.
//!
//! Always rescale from the pristine baseline steps, never from a previously
//! rescaled copy; each adjustment is then a single rounding away from the
//! original proportions.

use tracing::debug;

use super::step::{total_duration, BrewStep};

/// Stretch or squeeze `original` so the brew lasts about `target_total_secs`.
///
/// Each step's original end mark is scaled and rounded (half up), then the
/// step spans from the running cursor to that mark, floored at one second.
/// The result starts at zero and is contiguous. Its total can overshoot the
/// target when the one-second floor kicks in on trailing steps.
///
/// Returns `original` unchanged when its total duration or the target is zero.
pub fn rescale_steps(original: &[BrewStep], target_total_secs: u32) -> Vec<BrewStep> {
    let original_total = u64::from(total_duration(original));
    if original_total == 0 || target_total_secs == 0 {
        debug!(original_total, target_total_secs, "rescale skipped");
        return original.to_vec();
    }

    let target = u64::from(target_total_secs);
    let mut cursor = 0u32;
    original
        .iter()
        .map(|step| {
            let new_end = scale_round(u64::from(step.end()), target, original_total);
            let new_duration = new_end.saturating_sub(cursor).max(1);
            let scaled = BrewStep {
                time_start: cursor,
                duration: new_duration,
                ..step.clone()
            };
            cursor = cursor.saturating_add(new_duration);
            scaled
        })
        .collect()
}

/// `round(value * numerator / denominator)` with halves rounded up, in exact
/// integer arithmetic.
fn scale_round(value: u64, numerator: u64, denominator: u64) -> u32 {
    let doubled = value
        .saturating_mul(numerator)
        .saturating_mul(2)
        .saturating_add(denominator);
    let rounded = doubled / denominator.saturating_mul(2);
    u32::try_from(rounded).unwrap_or(u32::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::brew::step::validate_timeline;
    use proptest::prelude::*;

    fn v60_steps() -> Vec<BrewStep> {
        vec![
            BrewStep::new(0, 45, "Bloom").with_water(40.0),
            BrewStep::new(45, 30, "First Pour").with_water(200.0),
            BrewStep::new(75, 30, "Second Pour").with_water(320.0),
            BrewStep::new(105, 60, "Draw Down"),
        ]
    }

    fn starts(steps: &[BrewStep]) -> Vec<u32> {
        steps.iter().map(|s| s.time_start).collect()
    }

    fn durations(steps: &[BrewStep]) -> Vec<u32> {
        steps.iter().map(|s| s.duration).collect()
    }

    #[test]
    fn doubling_v60() {
        let scaled = rescale_steps(&v60_steps(), 330);
        assert_eq!(durations(&scaled), vec![90, 60, 60, 120]);
        assert_eq!(starts(&scaled), vec![0, 90, 150, 210]);
    }

    #[test]
    fn copies_labels_and_water() {
        let scaled = rescale_steps(&v60_steps(), 100);
        assert_eq!(scaled[1].action, "First Pour");
        assert_eq!(scaled[1].water_amount, Some(200.0));
        assert_eq!(scaled[3].water_amount, None);
    }

    #[test]
    fn rounding_goes_half_up() {
        // 45 * 60/165 = 16.36 -> 16; 75 * 60/165 = 27.27 -> 27; 105 * 60/165 = 38.18 -> 38
        let scaled = rescale_steps(&v60_steps(), 60);
        assert_eq!(durations(&scaled), vec![16, 11, 11, 22]);
        // 1 * 3/2 = 1.5 -> 2
        assert_eq!(scale_round(1, 3, 2), 2);
        assert_eq!(scale_round(5, 1, 2), 3);
    }

    #[test]
    fn zero_total_returns_input() {
        let steps = vec![BrewStep::new(0, 0, "Nothing"), BrewStep::new(0, 0, "Still nothing")];
        assert_eq!(rescale_steps(&steps, 120), steps);
        assert!(rescale_steps(&[], 120).is_empty());
    }

    #[test]
    fn zero_target_returns_input() {
        assert_eq!(rescale_steps(&v60_steps(), 0), v60_steps());
    }

    #[test]
    fn floor_can_overshoot_tiny_targets() {
        let scaled = rescale_steps(&v60_steps(), 2);
        assert!(scaled.iter().all(|s| s.duration >= 1));
        assert_eq!(total_duration(&scaled), 4);
        assert!(validate_timeline(&scaled).is_ok());
    }

    #[test]
    fn repeated_adjustments_do_not_drift() {
        let original = v60_steps();
        let mut current = original.clone();
        for target in [61, 97, 233, 599, 77, 165] {
            current = rescale_steps(&original, target);
        }
        assert_eq!(current, original);
    }

    fn arb_steps() -> impl Strategy<Value = Vec<BrewStep>> {
        prop::collection::vec(1u32..400, 1..12).prop_map(|durations| {
            let mut cursor = 0;
            durations
                .into_iter()
                .enumerate()
                .map(|(i, d)| {
                    let step = BrewStep::new(cursor, d, format!("Step {i}"));
                    cursor += d;
                    step
                })
                .collect()
        })
    }

    proptest! {
        #[test]
        fn rescaled_steps_stay_contiguous(steps in arb_steps(), target in 1u32..3600) {
            let scaled = rescale_steps(&steps, target);
            prop_assert_eq!(scaled.len(), steps.len());
            prop_assert_eq!(scaled[0].time_start, 0);
            for pair in scaled.windows(2) {
                prop_assert_eq!(pair[0].time_start + pair[0].duration, pair[1].time_start);
            }
        }

        #[test]
        fn rescaled_durations_are_at_least_one(steps in arb_steps(), target in 1u32..3600) {
            prop_assert!(rescale_steps(&steps, target).iter().all(|s| s.duration >= 1));
        }

        #[test]
        fn identity_rescale_is_exact(steps in arb_steps()) {
            let total = total_duration(&steps);
            prop_assert_eq!(rescale_steps(&steps, total), steps);
        }

        #[test]
        fn total_never_undershoots_target(steps in arb_steps(), target in 1u32..3600) {
            let scaled = rescale_steps(&steps, target);
            // The last end mark rounds to exactly the target; the floor only adds time.
            prop_assert!(total_duration(&scaled) >= target);
        }
    }
}
