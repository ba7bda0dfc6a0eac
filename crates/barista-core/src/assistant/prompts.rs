use indoc::formatdoc;

use crate::brew::Recipe;
use crate::profile::CoffeeProfile;

pub const BARISTA_SYSTEM_INSTRUCTION: &str = "You are a world-class coffee barista and sensory expert. \
You help users troubleshoot brew issues, understand extraction theory, and improve their coffee making. \
Keep answers practical and encouraging.";

pub const EXPLANATION_FALLBACK: &str = "Could not generate explanation.";

pub fn recipe_prompt(
    method: &str,
    profile: &CoffeeProfile,
    emphasized_flavors: &[String],
) -> String {
    let process = profile
        .process
        .map(|p| p.to_string())
        .unwrap_or_else(|| "Unspecified".to_string());
    let emphasis = if emphasized_flavors.is_empty() {
        String::new()
    } else {
        format!(
            "The user specifically wants to emphasize the following flavors in the final cup: {}. \
             Adjust the brewing variables (ratio, temperature, grind, agitation) to maximize these characteristics.",
            emphasized_flavors.join(", ")
        )
    };

    formatdoc! {"
        Create a detailed coffee brewing recipe for a {method}.
        The coffee bean profile is:
        Origin: {origin}
        Roast: {roast}
        Process: {process}
        Notes: {notes}

        {emphasis}

        Adjust the temperature, grind size, and technique to best highlight these specific qualities.
        For example, if it's an Ethiopian light roast, aim for higher temps to extract acidity.
        If it's a Brazilian dark roast, lower temp to avoid bitterness.
        Steps must be back to back: the first starts at 0 and each starts where the previous one ends.
        ",
        method = method,
        origin = profile.origin,
        roast = profile.roast_level,
        process = process,
        notes = profile.tasting_notes.join(", "),
        emphasis = emphasis,
    }
}

pub fn explanation_prompt(profile: &CoffeeProfile) -> String {
    formatdoc! {"
        Explain the flavor profile of a {roast} roast coffee from {origin}.
        It has tasting notes of: {notes}.
        Explain WHY this origin and roast produce these flavors (e.g. altitude, soil, processing, Maillard reaction).
        Keep it engaging and educational, under 200 words.
        ",
        roast = profile.roast_level,
        origin = profile.origin,
        notes = profile.notes_label(),
    }
}

/// Prompt for a short instructional clip of the first few steps of `recipe`.
pub fn recipe_video_prompt(recipe: &Recipe) -> String {
    let preview = recipe
        .steps
        .iter()
        .take(3)
        .map(|s| s.action.as_str())
        .collect::<Vec<_>>()
        .join(", ");
    format!(
        "Instructional close-up video showing how to brew {}. Demonstrating key steps: {preview}. \
         Professional barista technique, 4k, detailed, photorealistic.",
        recipe.method
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog;
    use crate::profile::RoastLevel;

    #[test]
    fn recipe_prompt_mentions_profile_and_emphasis() {
        let profile = CoffeeProfile {
            origin: "Brazil".into(),
            roast_level: RoastLevel::Dark,
            process: None,
            tasting_notes: vec!["Chocolate".into(), "Nutty".into()],
        };
        let prompt = recipe_prompt("French Press", &profile, &["Chocolate".into()]);
        assert!(prompt.starts_with("Create a detailed coffee brewing recipe for a French Press."));
        assert!(prompt.contains("Roast: Dark"));
        assert!(prompt.contains("Process: Unspecified"));
        assert!(prompt.contains("Notes: Chocolate, Nutty"));
        assert!(prompt.contains("emphasize the following flavors in the final cup: Chocolate."));
    }

    #[test]
    fn recipe_prompt_without_emphasis() {
        let prompt = recipe_prompt("V60", &CoffeeProfile::default(), &[]);
        assert!(!prompt.contains("emphasize"));
        assert!(prompt.contains("Process: Washed"));
    }

    #[test]
    fn video_prompt_previews_three_steps() {
        let recipe = catalog::find_method("v60").unwrap().default_recipe();
        let prompt = recipe_video_prompt(&recipe);
        let actions: Vec<_> = recipe.steps.iter().take(3).map(|s| s.action.clone()).collect();
        assert!(prompt.contains(&actions.join(", ")));
        assert!(prompt.contains(&recipe.method));
    }
}
