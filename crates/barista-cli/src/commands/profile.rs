use barista_core::catalog::{ORIGINS, TASTING_NOTES};
use barista_core::storage::Config;
use barista_core::{CoffeeProfile, Process, RoastLevel};
use clap::{Args, Subcommand};

use super::print_json;

#[derive(Subcommand)]
pub enum ProfileAction {
    /// Print the saved bean profile
    Show {
        /// Also list suggested origins and tasting notes
        #[arg(long)]
        options: bool,
    },
    /// Update origin, roast level or process
    Set(ProfileOverrides),
    /// Toggle a tasting note on or off
    Note {
        /// Tasting note (e.g. "Citrus")
        note: String,
    },
}

/// One-off overrides on top of the saved profile.
#[derive(Args, Default)]
pub struct ProfileOverrides {
    /// Origin country or region
    #[arg(long)]
    pub origin: Option<String>,
    /// Light, Medium or Dark
    #[arg(long)]
    pub roast: Option<RoastLevel>,
    /// Washed, Natural, Honey or Experimental
    #[arg(long)]
    pub process: Option<Process>,
    /// Replace tasting notes (repeatable)
    #[arg(long = "note")]
    pub notes: Vec<String>,
}

impl ProfileOverrides {
    pub fn apply(&self, mut profile: CoffeeProfile) -> CoffeeProfile {
        if let Some(origin) = &self.origin {
            profile.origin = origin.clone();
        }
        if let Some(roast) = self.roast {
            profile.roast_level = roast;
        }
        if let Some(process) = self.process {
            profile.process = Some(process);
        }
        if !self.notes.is_empty() {
            profile.tasting_notes = self.notes.clone();
        }
        profile
    }
}

pub fn run(action: ProfileAction) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = Config::load()?;
    match action {
        ProfileAction::Show { options } => {
            print_json(&config.profile)?;
            if options {
                println!("origins: {}", ORIGINS.join(", "));
                println!("tasting notes: {}", TASTING_NOTES.join(", "));
            }
        }
        ProfileAction::Set(overrides) => {
            config.profile = overrides.apply(config.profile.clone());
            config.save()?;
            print_json(&config.profile)?;
        }
        ProfileAction::Note { note } => {
            let selected = config.profile.toggle_note(&note);
            config.save()?;
            println!("{note}: {}", if selected { "added" } else { "removed" });
            println!("notes: {}", config.profile.notes_label());
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overrides_replace_only_given_fields() {
        let overrides = ProfileOverrides {
            roast: Some(RoastLevel::Dark),
            notes: vec!["Chocolate".into()],
            ..ProfileOverrides::default()
        };
        let profile = overrides.apply(CoffeeProfile::default());
        assert_eq!(profile.origin, "Ethiopia");
        assert_eq!(profile.roast_level, RoastLevel::Dark);
        assert_eq!(profile.process, Some(Process::Washed));
        assert_eq!(profile.tasting_notes, vec!["Chocolate".to_string()]);
    }
}
