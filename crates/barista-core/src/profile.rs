//! Bean profile used to tailor generated recipes and flavor explanations.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoastLevel {
    Light,
    Medium,
    Dark,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Process {
    Washed,
    Natural,
    Honey,
    Experimental,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoffeeProfile {
    pub origin: String,
    pub roast_level: RoastLevel,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub process: Option<Process>,
    #[serde(default)]
    pub tasting_notes: Vec<String>,
}

impl Default for CoffeeProfile {
    fn default() -> Self {
        Self {
            origin: "Ethiopia".into(),
            roast_level: RoastLevel::Light,
            process: Some(Process::Washed),
            tasting_notes: Vec::new(),
        }
    }
}

impl CoffeeProfile {
    /// Add `note` if absent, remove it if present. Returns whether it is now selected.
    pub fn toggle_note(&mut self, note: &str) -> bool {
        if let Some(pos) = self
            .tasting_notes
            .iter()
            .position(|n| n.eq_ignore_ascii_case(note))
        {
            self.tasting_notes.remove(pos);
            false
        } else {
            self.tasting_notes.push(note.to_string());
            true
        }
    }

    pub fn notes_label(&self) -> String {
        if self.tasting_notes.is_empty() {
            "None specified".to_string()
        } else {
            self.tasting_notes.join(", ")
        }
    }
}

impl fmt::Display for RoastLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            RoastLevel::Light => "Light",
            RoastLevel::Medium => "Medium",
            RoastLevel::Dark => "Dark",
        };
        f.write_str(s)
    }
}

impl fmt::Display for Process {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Process::Washed => "Washed",
            Process::Natural => "Natural",
            Process::Honey => "Honey",
            Process::Experimental => "Experimental",
        };
        f.write_str(s)
    }
}

impl FromStr for RoastLevel {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "light" => Ok(RoastLevel::Light),
            "medium" => Ok(RoastLevel::Medium),
            "dark" => Ok(RoastLevel::Dark),
            _ => Err(ValidationError::InvalidValue {
                field: "roast_level".into(),
                message: format!("expected Light, Medium or Dark, got '{s}'"),
            }),
        }
    }
}

impl FromStr for Process {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "washed" => Ok(Process::Washed),
            "natural" => Ok(Process::Natural),
            "honey" => Ok(Process::Honey),
            "experimental" => Ok(Process::Experimental),
            _ => Err(ValidationError::InvalidValue {
                field: "process".into(),
                message: format!("expected Washed, Natural, Honey or Experimental, got '{s}'"),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toggle_adds_then_removes() {
        let mut profile = CoffeeProfile::default();
        assert!(profile.toggle_note("Citrus"));
        assert!(profile.toggle_note("Floral"));
        assert_eq!(profile.notes_label(), "Citrus, Floral");
        assert!(!profile.toggle_note("citrus"));
        assert_eq!(profile.tasting_notes, vec!["Floral".to_string()]);
    }

    #[test]
    fn parses_levels_case_insensitively() {
        assert_eq!("DARK".parse::<RoastLevel>().unwrap(), RoastLevel::Dark);
        assert_eq!("honey".parse::<Process>().unwrap(), Process::Honey);
        assert!("burnt".parse::<RoastLevel>().is_err());
    }

    #[test]
    fn empty_notes_label() {
        assert_eq!(CoffeeProfile::default().notes_label(), "None specified");
    }
}
